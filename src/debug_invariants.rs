//! Invariant checks for shape state.
//!
//! Shapes validate their liquid and vapor masks (length matches the mesh,
//! values in `[0, 1]`, `liquid + vapor <= 1`) after every `calculate()`. The
//! checks run in debug builds, or in release builds with the
//! `check-invariants` feature.

use crate::shape_error::ShapeError;

/// Consistency checks on computed mask state.
pub trait DebugInvariants {
    /// Panic on a broken mask in debug builds or with `check-invariants`.
    fn debug_assert_invariants(&self);
    /// Return the first broken mask invariant.
    fn validate_invariants(&self) -> Result<(), ShapeError>;
}

/// Run a fallible mask check and panic with `$ctx` on error, when invariant
/// checking is compiled in.
#[macro_export]
macro_rules! debug_invariants {
    ($expr:expr, $($ctx:tt)*) => {
        #[cfg(any(debug_assertions, feature = "check-invariants"))]
        if let Err(e) = $expr {
            panic!(concat!("[invariants] ", $($ctx)*, ": {}"), e);
        }
    };
}
