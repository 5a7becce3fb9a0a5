//! Render configuration.
//!
//! A single `RenderConfig` describes one run: which module to load, where to
//! write the rendered bytes, which import table to supply, and how to bound
//! the extracted memory range. Historically these were two near-identical
//! host scripts differing only in the last two choices; here both are
//! options on one configuration.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Which host import table to supply at instantiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportTable {
    /// No imports at all. Instantiation fails if the module declares any.
    None,
    /// `pow`, `log2` and `sin` under the `"m"` namespace. Definitions the
    /// module does not import are simply unused, so this is the default.
    #[default]
    Math3,
}

impl FromStr for ImportTable {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "none" => Ok(ImportTable::None),
            "math3" => Ok(ImportTable::Math3),
            other => Err(format!(
                "unknown import table {other:?} (expected \"none\" or \"math3\")"
            )),
        }
    }
}

/// How to bound the memory range written to the output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LengthSource {
    /// Use the module's exported `s` (start) and `l` (length) values,
    /// falling back to the full buffer when either is missing.
    #[default]
    Exports,
    /// Always write the memory's entire current byte extent.
    FullBuffer,
}

impl FromStr for LengthSource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "exports" => Ok(LengthSource::Exports),
            "full-buffer" => Ok(LengthSource::FullBuffer),
            other => Err(format!(
                "unknown length source {other:?} (expected \"exports\" or \"full-buffer\")"
            )),
        }
    }
}

/// Configuration for one render run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RenderConfig {
    /// Path to the compiled WebAssembly song module.
    pub input: PathBuf,
    /// Path the raw rendered bytes are written to.
    pub output: PathBuf,
    /// Host import table supplied at instantiation.
    #[serde(default)]
    pub imports: ImportTable,
    /// How the extracted memory range is bounded.
    #[serde(default)]
    pub length_source: LengthSource,
}

impl RenderConfig {
    /// Build a configuration with default import table and length source.
    /// When `output` is `None` it is derived from `input` by swapping the
    /// extension for `.raw`.
    pub fn new(input: impl Into<PathBuf>, output: Option<PathBuf>) -> Self {
        let input = input.into();
        let output = output.unwrap_or_else(|| input.with_extension("raw"));
        RenderConfig {
            input,
            output,
            imports: ImportTable::default(),
            length_source: LengthSource::default(),
        }
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }
}
