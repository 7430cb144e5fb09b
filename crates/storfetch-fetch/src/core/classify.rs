use crate::error::Error;

/// Which configured endpoint served an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Primary,
    Secondary,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::Primary => write!(f, "primary"),
            Endpoint::Secondary => write!(f, "secondary"),
        }
    }
}

/// What to do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Try again against the same choice of endpoint.
    Retry,
    /// Stop using the secondary for this digest, then try again.
    FallBack,
    /// Stop retrying.
    GiveUp,
}

/// Classify a failed attempt by the endpoint it actually hit.
///
/// A 404 from the secondary only means the fast path lacks the object; a 404
/// from the primary is definitive.
pub fn classify(error: &Error, endpoint: Endpoint) -> Verdict {
    match (error.is_not_found(), endpoint) {
        (true, Endpoint::Secondary) => Verdict::FallBack,
        (true, Endpoint::Primary) => Verdict::GiveUp,
        (false, _) => Verdict::Retry,
    }
}
