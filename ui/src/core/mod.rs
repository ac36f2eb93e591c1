//! Small shared helpers.

pub mod format;
