//! # Request ID Tracking
//!
//! Identifiers attached to every HTTP request so log lines can be correlated.
//! Uses CUID2 for collision-resistant, URL-safe identifiers.

use std::{fmt, str::FromStr};

/// Header carrying the request identifier in both directions.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// A request ID type using CUID2.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a new random request ID.
    #[inline]
    pub fn new() -> Self { Self(cuid2::cuid()) }

    /// Reuse a caller-supplied identifier when it is well formed.
    ///
    /// Accepts 20 to 64 characters of ASCII alphanumerics, `-` and `_`.
    pub fn try_from_header(value: &str) -> Option<Self> {
        let value = value.trim();
        let valid = (20 ..= 64).contains(&value.len()) &&
            value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        valid.then(|| Self(value.to_string()))
    }

    /// Use the incoming header value if valid, otherwise generate a fresh ID.
    pub fn from_header_or_new(value: Option<&str>) -> Self { value.and_then(Self::try_from_header).unwrap_or_default() }

    /// Get the request ID as a string.
    #[inline]
    pub fn as_str(&self) -> &str { &self.0 }
}

impl Default for RequestId {
    #[inline]
    fn default() -> Self { Self::new() }
}

impl FromStr for RequestId {
    type Err = InvalidRequestId;

    fn from_str(s: &str) -> Result<Self, Self::Err> { Self::try_from_header(s).ok_or(InvalidRequestId) }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

/// Returned when a string is not an acceptable request ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidRequestId;

impl fmt::Display for InvalidRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str("Invalid request ID format") }
}

impl std::error::Error for InvalidRequestId {}
