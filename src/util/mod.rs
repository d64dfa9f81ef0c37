pub mod assert;
pub mod compare;

pub use assert::{assertion_error, fail, hard_assert};
pub use compare::{compare_doubles, compare_mixed, compare_utf16};
