use core::fmt;

use crate::ListRange;

/// Usage errors reported by the windowing engine.
///
/// These indicate a programming defect in the integration layer (for example, attaching a
/// strategy twice). They are never produced for transient states such as unmeasured items.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WindowError {
    /// A strategy or controller was attached while already attached.
    AlreadyAttached,
    /// An operation that requires an attachment was called while unattached, or with a stale
    /// attach token.
    NotAttached,
    /// A range measurement was requested for indexes that are not currently rendered.
    UnrenderedRange {
        requested: ListRange,
        rendered: ListRange,
    },
}

impl fmt::Display for WindowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyAttached => f.write_str("viewport is already attached"),
            Self::NotAttached => f.write_str("viewport is not attached"),
            Self::UnrenderedRange {
                requested,
                rendered,
            } => write!(
                f,
                "attempted to measure range {}..{} outside of the rendered range {}..{}",
                requested.start, requested.end, rendered.start, rendered.end
            ),
        }
    }
}

impl core::error::Error for WindowError {}
