//! UI components.

pub mod contact;
pub mod magic_text;
