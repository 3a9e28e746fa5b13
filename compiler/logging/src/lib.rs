#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Simple logging utilities for the schema compiler.

/// Prints a trace message to stderr with module prefix.
pub fn trace(module: &str, msg: &str) {
    eprintln!("[TRACE][{}] {}", module, msg);
}

/// Prints a warning to stderr with module prefix.
///
/// Warnings are diagnostics the compiler recovers from, such as duplicate
/// definitions that are resolved by last-write-wins.
pub fn warn(module: &str, msg: &str) {
    eprintln!("[WARN][{}] {}", module, msg);
}
