use serde_json::Value;

/// Monotonically increasing request token.
///
/// Every fetch is stamped with the generation that was current when it was
/// issued; a result is only applied while its generation is still the latest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct Generation(u64);

impl Generation {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

/// A fetch result on its way from the upstream to the application state.
#[derive(Debug, Clone)]
pub struct Envelope<T> {
    pub payload: T,
    pub generation: Generation,
}

impl<T> Envelope<T> {
    pub fn new(payload: T, generation: Generation) -> Self {
        Self {
            payload,
            generation,
        }
    }
}

/// Outcome of handing an envelope to its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyOutcome {
    Applied,
    /// A newer request was issued after this one; the result was ignored.
    Stale,
}

/// Boundary conversion from a raw upstream document to a canonical value.
///
/// Implementations never fail: an unrecognised shape yields the empty
/// canonical result.
pub trait Normalize<O>: Send + Sync {
    fn normalize(&self, raw: Option<&Value>) -> O;
}
