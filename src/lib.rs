//! Patch-based texture synthesis with minimum-error seam compositing
//!
//! A small source texture is copied repeatedly into a larger canvas. Each new
//! copy is placed where it best matches the content already there, and the
//! overlap is resolved along minimum-error seams so the copies blend together.

#![forbid(unsafe_code)]

/// Synthesis loop, placement search, seam carving and compositing
pub mod algorithm;
/// Input/output operations and error handling
pub mod io;
/// Canvas storage and fill-state tracking
pub mod spatial;

pub use io::error::{Result, SynthesisError};
