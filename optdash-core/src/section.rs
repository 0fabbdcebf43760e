//! Tagged outcome of one dashboard section.
//!
//! Each stage of a deep dive validates its inputs and returns a `Section`
//! instead of nesting early exits, so front-ends can pattern-match on it.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum Section<T> {
    /// The section computed normally.
    Ready(T),
    /// Not enough price history to warm up the indicators.
    InsufficientData { available: usize, required: usize },
    /// A prerequisite does not exist (e.g. the ticker lists no option expiries).
    Unavailable(String),
    /// Retrieval failed; the message carries the underlying cause.
    Failed(String),
}

impl<T> Section<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Section::Ready(_))
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Section::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_ref(&self) -> Section<&T> {
        match self {
            Section::Ready(v) => Section::Ready(v),
            Section::InsufficientData {
                available,
                required,
            } => Section::InsufficientData {
                available: *available,
                required: *required,
            },
            Section::Unavailable(reason) => Section::Unavailable(reason.clone()),
            Section::Failed(message) => Section::Failed(message.clone()),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Section<U> {
        self.and_then(|v| Section::Ready(f(v)))
    }

    pub fn and_then<U>(self, f: impl FnOnce(T) -> Section<U>) -> Section<U> {
        match self.into_ready() {
            Ok(v) => f(v),
            Err(other) => other,
        }
    }

    /// The ready value, or the non-ready outcome retagged for another type.
    pub fn into_ready<U>(self) -> Result<T, Section<U>> {
        match self {
            Section::Ready(v) => Ok(v),
            Section::InsufficientData {
                available,
                required,
            } => Err(Section::InsufficientData {
                available,
                required,
            }),
            Section::Unavailable(reason) => Err(Section::Unavailable(reason)),
            Section::Failed(message) => Err(Section::Failed(message)),
        }
    }
}
