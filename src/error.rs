use std::fmt;

/// Represents errors that can occur when registering a new route.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum InsertError {
    /// Routes must begin with `/`.
    MalformedRoute,
    /// Parameters must be registered with a non-empty name, and braces
    /// may not nest.
    InvalidParam,
    /// Only one parameter is allowed per path segment.
    InvalidParamSegment,
    /// Catch-all parameters are only allowed in the final segment of a
    /// route, directly following a `/`.
    InvalidCatchAll,
    /// The regex attached to a parameter failed to compile.
    InvalidRegex {
        /// The name of the parameter carrying the regex.
        param: String,
        /// The compile error reported by the regex engine.
        reason: String,
    },
    /// Attempted to register a wildcard that differs from the one
    /// already stored at the same tree position.
    Conflict {
        /// The wildcard the insertion is conflicting with.
        with: String,
    },
}

impl fmt::Display for InsertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedRoute => write!(f, "routes must begin with '/'"),
            Self::InvalidParam => {
                write!(f, "parameters must be registered with a non-empty name")
            }
            Self::InvalidParamSegment => {
                write!(f, "only one parameter is allowed per path segment")
            }
            Self::InvalidCatchAll => write!(
                f,
                "catch-all parameters are only allowed in the final segment of a route, directly following a '/'"
            ),
            Self::InvalidRegex { param, reason } => {
                write!(f, "the regex for parameter '{}' failed to compile: {}", param, reason)
            }
            Self::Conflict { with } => {
                write!(
                    f,
                    "insertion failed due to conflict with previously registered wildcard '{}'",
                    with
                )
            }
        }
    }
}

impl std::error::Error for InsertError {}

/// A failed match attempt.
///
/// Carries a trailing slash recommendation: when [`tsr`](MatchError::tsr)
/// returns `true`, the same path with one trailing `/` added or removed
/// would have matched, and a `301` redirect to that variant is in order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MatchError {
    pub(crate) tsr: bool,
}

impl MatchError {
    pub(crate) fn new(tsr: bool) -> Self {
        MatchError { tsr }
    }

    /// Returns `true` if a route exists for the same path with the
    /// trailing slash added or removed.
    pub fn tsr(&self) -> bool {
        self.tsr
    }
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "matching route not found")
    }
}

impl std::error::Error for MatchError {}
