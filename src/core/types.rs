/*!
 * Core Types
 * Common types used across the crate
 */

/// Slot identity. Monotonically increasing within a registry, never reused.
pub type SlotId = u64;

/// Common result type for signal/slot operations
pub type SlotResult<T> = Result<T, super::errors::SlotError>;
