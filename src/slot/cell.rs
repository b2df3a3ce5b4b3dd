/*!
 * Slot Cell
 * Type-erased storage and dispatch for a single registered callback
 */

use crate::core::errors::SlotError;
use crate::core::types::SlotResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Weak};

/// Discriminant for the payload held by a [`SlotCell`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotKind {
    /// Nothing bound; never executes
    Empty,
    /// Plain function pointer
    Function,
    /// Weakly-held receiver plus method pointer
    Method,
    /// Arbitrary captured closure
    Closure,
}

/// Dispatch interface behind the erased `Method` and `Closure` payloads
trait ErasedInvoke<A>: Send + Sync {
    fn invoke(&self, args: &A) -> SlotResult<()>;

    /// False once a weak receiver has been dropped
    fn receiver_alive(&self) -> bool;
}

struct MethodInvoker<R, A> {
    receiver: Weak<R>,
    method: fn(&R, &A) -> SlotResult<()>,
}

impl<R: Send + Sync, A> ErasedInvoke<A> for MethodInvoker<R, A> {
    fn invoke(&self, args: &A) -> SlotResult<()> {
        // The receiver may die between snapshot and dispatch; that race is
        // an expected no-op, not a fault.
        match self.receiver.upgrade() {
            Some(receiver) => (self.method)(&receiver, args),
            None => Ok(()),
        }
    }

    fn receiver_alive(&self) -> bool {
        self.receiver.strong_count() > 0
    }
}

struct ClosureInvoker<F>(F);

impl<F, A> ErasedInvoke<A> for ClosureInvoker<F>
where
    F: Fn(&A) -> SlotResult<()> + Send + Sync,
{
    fn invoke(&self, args: &A) -> SlotResult<()> {
        (self.0)(args)
    }

    fn receiver_alive(&self) -> bool {
        true
    }
}

enum CellRepr<A: 'static> {
    Empty,
    Function(fn(&A) -> SlotResult<()>),
    Method {
        target: Arc<dyn ErasedInvoke<A>>,
        receiver_key: usize,
        method_key: usize,
    },
    Closure(Arc<dyn ErasedInvoke<A>>),
}

/// One registered callback in type-erased form.
///
/// The two common shapes stay allocation-free or near it: a `Function` cell
/// is a bare pointer, a `Method` cell keeps its equality keys inline and
/// erases only the typed dispatch behind a shared `Arc`. Closures always go
/// through the erased path.
///
/// Equality is defined for `Function` (same address) and `Method` (same
/// receiver address and method address) cells. `Closure` cells compare by
/// payload identity, so a cell equals only clones of itself. `Empty` equals
/// nothing, including other `Empty` cells.
pub struct SlotCell<A: 'static> {
    repr: CellRepr<A>,
}

impl<A: 'static> SlotCell<A> {
    /// Wrap a plain function pointer
    pub fn function(func: fn(&A) -> SlotResult<()>) -> Self {
        Self {
            repr: CellRepr::Function(func),
        }
    }

    /// Bind a method to a weakly-held receiver.
    ///
    /// Fails with [`SlotError::InvalidCallable`] when the receiver is
    /// already dead at construction time.
    pub fn method<R>(receiver: &Weak<R>, method: fn(&R, &A) -> SlotResult<()>) -> SlotResult<Self>
    where
        R: Send + Sync + 'static,
    {
        if receiver.strong_count() == 0 {
            return Err(SlotError::InvalidCallable(
                "method receiver has already been dropped".to_string(),
            ));
        }

        let receiver_key = receiver.as_ptr() as *const () as usize;
        let method_key = method as usize;

        Ok(Self {
            repr: CellRepr::Method {
                target: Arc::new(MethodInvoker {
                    receiver: receiver.clone(),
                    method,
                }),
                receiver_key,
                method_key,
            },
        })
    }

    /// Wrap an arbitrary closure
    pub fn closure<F>(func: F) -> Self
    where
        F: Fn(&A) -> SlotResult<()> + Send + Sync + 'static,
    {
        Self {
            repr: CellRepr::Closure(Arc::new(ClosureInvoker(func))),
        }
    }

    /// Get the payload discriminant
    pub fn kind(&self) -> SlotKind {
        match &self.repr {
            CellRepr::Empty => SlotKind::Empty,
            CellRepr::Function(_) => SlotKind::Function,
            CellRepr::Method { .. } => SlotKind::Method,
            CellRepr::Closure(_) => SlotKind::Closure,
        }
    }

    /// True for a `Method` cell whose receiver has been dropped
    pub fn is_expired(&self) -> bool {
        match &self.repr {
            CellRepr::Method { target, .. } => !target.receiver_alive(),
            _ => false,
        }
    }

    /// Execute the stored callback.
    ///
    /// An `Empty` cell yields [`SlotError::UnboundSlot`]; table invariants
    /// keep empty cells out of every registry, so this is defensive only.
    pub fn invoke(&self, args: &A) -> SlotResult<()> {
        match &self.repr {
            CellRepr::Empty => Err(SlotError::UnboundSlot),
            CellRepr::Function(func) => func(args),
            CellRepr::Method { target, .. } | CellRepr::Closure(target) => target.invoke(args),
        }
    }
}

impl<A: 'static> Default for SlotCell<A> {
    fn default() -> Self {
        Self {
            repr: CellRepr::Empty,
        }
    }
}

impl<A: 'static> Clone for SlotCell<A> {
    fn clone(&self) -> Self {
        let repr = match &self.repr {
            CellRepr::Empty => CellRepr::Empty,
            CellRepr::Function(func) => CellRepr::Function(*func),
            CellRepr::Method {
                target,
                receiver_key,
                method_key,
            } => CellRepr::Method {
                target: Arc::clone(target),
                receiver_key: *receiver_key,
                method_key: *method_key,
            },
            CellRepr::Closure(target) => CellRepr::Closure(Arc::clone(target)),
        };
        Self { repr }
    }
}

impl<A: 'static> PartialEq for SlotCell<A> {
    fn eq(&self, other: &Self) -> bool {
        match (&self.repr, &other.repr) {
            (CellRepr::Function(a), CellRepr::Function(b)) => *a as usize == *b as usize,
            (
                CellRepr::Method {
                    receiver_key: ra,
                    method_key: ma,
                    ..
                },
                CellRepr::Method {
                    receiver_key: rb,
                    method_key: mb,
                    ..
                },
            ) => ra == rb && ma == mb,
            (CellRepr::Closure(a), CellRepr::Closure(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<A: 'static> fmt::Debug for SlotCell<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            CellRepr::Method {
                receiver_key,
                method_key,
                ..
            } => f
                .debug_struct("SlotCell")
                .field("kind", &SlotKind::Method)
                .field("receiver", &(*receiver_key as *const ()))
                .field("method", &(*method_key as *const ()))
                .finish(),
            _ => f.debug_struct("SlotCell").field("kind", &self.kind()).finish(),
        }
    }
}
