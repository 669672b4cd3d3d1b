//! Common conversion code
//!
//! Grammar helpers that both conversion directions depend on: the image attribute block,
//! the code fence info string, and text escaping/normalization.

pub mod attributes;
pub mod code_block;
pub mod escape;
