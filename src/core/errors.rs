/*!
 * Error Types
 * Signal/slot error taxonomy with serialization support
 */

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Signal/slot errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotError {
    #[error("invalid callable: {0}")]
    InvalidCallable(String),

    #[error("slot has no callable bound")]
    UnboundSlot,

    #[error("handler error: {0}")]
    HandlerError(String),
}
