/// Panic with an internal assertion message when the condition is false.
///
/// Internal assertions guard caller contracts (for example a collection group
/// mismatch in the index matcher). They are programmer errors, so they are not
/// surfaced as [`crate::error::FirestoreError`] values.
pub fn hard_assert(condition: bool, message: impl AsRef<str>) {
    if !condition {
        fail(message);
    }
}

/// Unconditionally panic with an internal assertion message.
pub fn fail(message: impl AsRef<str>) -> ! {
    panic!("{}", assertion_error(message));
}

/// Build the string used for internal assertion failures.
pub fn assertion_error(message: impl AsRef<str>) -> String {
    format!("INTERNAL ASSERTION FAILED: {}", message.as_ref())
}
