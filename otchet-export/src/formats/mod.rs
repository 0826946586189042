//! Format backends.

pub mod docx;
pub mod pdf;
