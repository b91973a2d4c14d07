//! Assessment Core
//!
//! Pure alignment and scoring logic. Everything in here is synchronous,
//! side-effect free and total over well-typed input: malformed recognizer
//! output degrades to omissions and unscored words, never to a panic.

pub mod aligner;
pub mod gate;
pub mod normalizer;
pub mod report;
pub mod scoring;
