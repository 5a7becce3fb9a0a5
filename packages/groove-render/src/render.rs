//! The render pipeline: read, instantiate, invoke, extract, write.

use std::fs;

use tracing::{debug, info};

use crate::config::{LengthSource, RenderConfig};
use crate::error::{RenderError, Result};
use crate::runtime::SongInstance;

/// Names of the exported start offset and byte length the extraction range
/// is bounded by when the module provides them.
const START_EXPORT: &str = "s";
const LENGTH_EXPORT: &str = "l";

/// Name of the render entry point.
const RENDER_EXPORT: &str = "render";

/// What one run did, for logging and for callers that care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSummary {
    /// Whether the module had a `render` export to invoke.
    pub invoked_render: bool,
    /// Start offset of the extracted range in linear memory.
    pub start: usize,
    /// Number of bytes written to the output file.
    pub bytes_written: usize,
}

/// Run one render: load the module at `cfg.input`, instantiate it with the
/// configured import table, invoke `render` when exported, and write the
/// configured memory range to `cfg.output`.
///
/// Fail-fast: any stage error aborts the run and no output file is written.
pub fn render(cfg: &RenderConfig) -> Result<RenderSummary> {
    let bytes = fs::read(&cfg.input).map_err(|e| RenderError::io(&cfg.input, e))?;
    debug!(module = %cfg.input.display(), size = bytes.len(), "loaded module binary");

    let mut instance = SongInstance::instantiate(&bytes, cfg.imports)?;
    debug!(imports = ?cfg.imports, "instantiated module");

    let invoked_render = instance.call(RENDER_EXPORT)?;
    if invoked_render {
        debug!("render() ran to completion");
    } else {
        debug!("module has no render export, extracting memory as-is");
    }

    let (start, len) = extraction_range(&mut instance, cfg.length_source)?;
    let data = instance.read_memory(start, len)?;

    fs::write(&cfg.output, &data).map_err(|e| RenderError::io(&cfg.output, e))?;
    info!(
        output = %cfg.output.display(),
        start,
        bytes = data.len(),
        "wrote rendered audio"
    );

    Ok(RenderSummary {
        invoked_render,
        start,
        bytes_written: data.len(),
    })
}

/// Decide the byte range to extract. With `Exports`, the module's `s` and
/// `l` exports bound the range; when either is missing the whole buffer is
/// used. `FullBuffer` ignores the exports entirely.
fn extraction_range(
    instance: &mut SongInstance,
    source: LengthSource,
) -> Result<(usize, usize)> {
    if source == LengthSource::Exports {
        if let (Some(start), Some(len)) = (
            instance.exported_int(START_EXPORT),
            instance.exported_int(LENGTH_EXPORT),
        ) {
            debug!(start, len, "bounding extraction by s/l exports");
            return Ok((start as usize, len as usize));
        }
    }
    let size = instance.memory_size()?;
    debug!(size, "extracting full memory buffer");
    Ok((0, size))
}
