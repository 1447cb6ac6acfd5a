//! Operation-specific types.

pub mod invalidate;

pub use invalidate::{ClearOneRequest, InvalidationResponse, InvalidationStatus, PurgeSummary};

/// Known operation names.
pub mod names {
    pub const CLEAR_ONE: &str = "clear_one";
    pub const CLEAR_ALL: &str = "clear_all";
    pub const CLEAR_OBJECT: &str = "clear_object";

    /// Every operation the worker dispatches.
    pub const ALL: [&str; 3] = [CLEAR_ONE, CLEAR_ALL, CLEAR_OBJECT];
}
