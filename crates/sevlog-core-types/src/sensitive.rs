//! Sensitive data marker for automatic redaction
//!
//! Wrap secrets in `Sensitive<T>` before handing them to a logger; the
//! engine converts the wrapper into the redaction placeholder so the value
//! never reaches a handler.

use std::fmt;

use crate::schema::REDACTED;

/// Wrapper for sensitive data that redacts itself in Debug and Display
///
/// # Example
///
/// ```
/// use sevlog_core_types::Sensitive;
///
/// let token = Sensitive::new("hunter2");
/// assert_eq!(format!("{}", token), "***REDACTED***");
/// assert_eq!(token.expose(), &"hunter2");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Access the wrapped value
    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T> From<T> for Sensitive<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}
