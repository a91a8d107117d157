//! Cross-cutting service ports.

pub mod fs;
