#![allow(clippy::module_name_repetitions)]

use std::fmt;

use thiserror::Error;

/// Convenience alias for engine results.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors surfaced by the verband engine.
///
/// Builders fail the whole operation on [`Error::CycleDetected`] and
/// [`Error::SelfRelation`] — a partial tree is never returned as if it were
/// complete. Recoverable findings (orphans, type-order violations) are
/// reported as data on the built index, not as errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A parent chain revisits an id before reaching a root.
    #[error("hierarchy contains a cycle through id {id}")]
    CycleDetected { id: i64 },

    /// The requested id is absent from the built index.
    #[error("id {id} not found")]
    NotFound { id: i64 },

    /// A family edge relates a member to itself.
    #[error("member {member} cannot be related to itself")]
    SelfRelation { member: i64 },

    /// A family edge validity window ends before it starts.
    #[error("validity window for edge {child}->{parent} ends before it starts")]
    InvalidValidityWindow { child: i64, parent: i64 },

    /// A family traversal was requested with a depth limit of zero.
    #[error("family traversal depth limit must be at least 1")]
    DepthLimitZero,
}

impl Error {
    /// Stable machine code for this error kind.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::CycleDetected { .. } => ErrorCode::CycleDetected,
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::SelfRelation { .. } => ErrorCode::SelfRelation,
            Self::InvalidValidityWindow { .. } => ErrorCode::InvalidValidityWindow,
            Self::DepthLimitZero => ErrorCode::DepthLimitZero,
        }
    }
}

/// Machine-readable error codes so the transport layer can map kinds to
/// status codes without string matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    CycleDetected,
    NotFound,
    SelfRelation,
    InvalidValidityWindow,
    DepthLimitZero,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::CycleDetected => "E2101",
            Self::NotFound => "E2102",
            Self::SelfRelation => "E2103",
            Self::InvalidValidityWindow => "E2104",
            Self::DepthLimitZero => "E2105",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::CycleDetected => "Hierarchy contains a cycle",
            Self::NotFound => "Requested id not found",
            Self::SelfRelation => "Member related to itself",
            Self::InvalidValidityWindow => "Validity window inverted",
            Self::DepthLimitZero => "Depth limit must be at least 1",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::CycleDetected => {
                Some("Fix the parent pointer of the named unit so every chain reaches a root.")
            }
            Self::NotFound => None,
            Self::SelfRelation => Some("Remove the edge whose child and parent ids are equal."),
            Self::InvalidValidityWindow => Some("Swap or clear the from/until dates on the edge."),
            Self::DepthLimitZero => Some("Request a traversal depth of 1 or more."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
