//! Call-site helpers

/// Build an attribute array from `key => value` pairs
///
/// # Example
///
/// ```
/// use sevlog_core::{attrs, Attr};
///
/// let attrs = attrs!["user" => "ada", "attempt" => 3i64];
/// assert_eq!(attrs[1], Attr::new("attempt", 3i64));
/// ```
#[macro_export]
macro_rules! attrs {
    () => {
        [] as [$crate::Attr; 0]
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        [$($crate::Attr::new($key, $value)),+]
    };
}
