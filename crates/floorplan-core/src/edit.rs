//! Outcomes of model mutations.
//!
//! Invalid or unresolvable mutations are not errors: they are reported as
//! [`Edit::Ignored`] and leave the model untouched.

use std::fmt;

/// Why a mutation left the model untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The element's layer is locked and the caller is not the system.
    LayerLocked,
    /// The default layer cannot be removed.
    ProtectedLayer,
    ElementNotFound,
    LayerNotFound,
    /// A pointer drag is in progress.
    InteractionInProgress,
    /// The mutation would not change anything.
    Unchanged,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            IgnoreReason::LayerLocked => "layer is locked",
            IgnoreReason::ProtectedLayer => "default layer is protected",
            IgnoreReason::ElementNotFound => "element not found",
            IgnoreReason::LayerNotFound => "layer not found",
            IgnoreReason::InteractionInProgress => "interaction in progress",
            IgnoreReason::Unchanged => "nothing changed",
        };
        f.write_str(text)
    }
}

/// Result of a model mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "an edit may have been ignored"]
pub enum Edit {
    Applied,
    Ignored(IgnoreReason),
}

impl Edit {
    pub fn is_applied(self) -> bool {
        matches!(self, Edit::Applied)
    }

    /// Log an ignored edit at debug level and pass the outcome through.
    pub fn logged(self, what: &str) -> Self {
        if let Edit::Ignored(reason) = self {
            log::debug!("{} ignored: {}", what, reason);
        }
        self
    }
}
