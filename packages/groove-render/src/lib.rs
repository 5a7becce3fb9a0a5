//! groove-render — a Wasmtime host for compiled song modules.
//!
//! Loads a precompiled WebAssembly module (a song renderer compiled ahead of
//! time), supplies the small numeric import table such modules may require,
//! invokes the exported `render` entry point, and writes a byte range of the
//! module's linear memory to an output file as raw audio.
//!
//! The pipeline is a single fail-fast pass:
//!
//! ```text
//! read module → instantiate → call render → slice memory → write output
//! ```

pub mod config;
pub mod error;
pub mod host;
pub mod render;
pub mod runtime;

pub use config::{ImportTable, LengthSource, RenderConfig};
pub use error::{RenderError, Result};
pub use render::{render, RenderSummary};
