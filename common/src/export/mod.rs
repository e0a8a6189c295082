//! Export core modules shared across CLI and desktop wrappers.

pub mod pdf_core;
