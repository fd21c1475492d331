//! Stable JSON for files under the config directory.
//!
//! Output is pretty-printed with 2-space indentation and ends with a
//! newline, so hand edits and diffs stay readable.

mod json;

pub use json::*;
