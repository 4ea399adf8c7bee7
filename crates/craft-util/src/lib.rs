//! Miscellaneous support code shared across craft, mirroring the role
//! `cargo-util` plays for cargo: small, dependency-light, no business logic.

mod split;
mod url_escape;

pub use split::{split_all, split_whitespace_list};
pub use url_escape::escape_for_filename;
