//! Error types for the render pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while rendering a song module.
///
/// Every failure in the pipeline maps onto one of three kinds: the file
/// system (`Io`), building an instance out of the binary (`Module`), or
/// executing inside the instance (`Runtime`). All are fatal; the pipeline
/// never retries and never leaves a partial output file behind.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("module error: {0}")]
    Module(#[source] anyhow::Error),

    #[error("runtime error: {0}")]
    Runtime(#[source] anyhow::Error),
}

impl RenderError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RenderError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, RenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_display_includes_path() {
        let err = RenderError::io(
            "no/such/file.wasm",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        let msg = err.to_string();
        assert!(msg.contains("no/such/file.wasm"), "got: {msg}");
        assert!(msg.contains("not found"), "got: {msg}");
    }

    #[test]
    fn module_and_runtime_are_distinct() {
        let module = RenderError::Module(anyhow::anyhow!("unknown import"));
        let runtime = RenderError::Runtime(anyhow::anyhow!("unreachable"));
        assert!(matches!(module, RenderError::Module(_)));
        assert!(matches!(runtime, RenderError::Runtime(_)));
    }
}
