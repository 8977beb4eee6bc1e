//! Host adapter running one typist round over a declaration manifest.
//!
//! A manifest is the JSON form of what an annotation host would hand the
//! compiler: an optional configuration and the ordered declarations.
//!
//! ```json
//! {
//!   "config": { "generation": { "suffix": "_tree" } },
//!   "declarations": [
//!     {
//!       "element": { "name": "Teleport", "kind": "type" },
//!       "annotation": { "kind": "command", "path": "tp <player>" }
//!     }
//!   ]
//! }
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::ValueEnum;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};
use typist::error::TracingSink;
use typist::foundation::Declaration;
use typist::{Config, Diagnostic, DiagnosticFormatter, Output};

#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub config: Config,
    pub declarations: Vec<Declaration>,
}

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid manifest {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let text = fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest: Manifest = serde_json::from_str(&text).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(
            path = %path.display(),
            declarations = manifest.declarations.len(),
            "manifest loaded"
        );
        Ok(manifest)
    }

    /// Runs one round over the manifest's declarations.
    pub fn compile(&self) -> Result<Output, Vec<Diagnostic>> {
        typist::compile(&self.declarations, &self.config)
    }
}

/// How diagnostics are reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Rendered with the offending namespace underlined, on stderr
    #[default]
    Pretty,
    /// One tracing event per diagnostic
    Log,
}

/// Reports `diagnostics` in `format`.
pub fn report(diagnostics: &[Diagnostic], format: Format, out: &mut dyn Write) -> io::Result<()> {
    match format {
        Format::Pretty => {
            if !diagnostics.is_empty() {
                writeln!(out, "{}", DiagnosticFormatter::new().format_all(diagnostics))?;
            }
        }
        Format::Log => {
            let mut sink = TracingSink;
            for diagnostic in diagnostics {
                diagnostic.report(&mut sink);
            }
        }
    }
    Ok(())
}

/// Writes generated source to `path`, or to stdout without one.
pub fn emit(source: &str, path: Option<&Path>) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            fs::write(path, source).with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), bytes = source.len(), "source written");
        }
        None => {
            io::stdout()
                .write_all(source.as_bytes())
                .context("failed to write to stdout")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_config_defaults() {
        let manifest: Manifest = serde_json::from_str(r#"{ "declarations": [] }"#).unwrap();
        assert_eq!(manifest.config, Config::default());
        assert!(manifest.declarations.is_empty());
    }

    #[test]
    fn test_pretty_report() {
        let manifest: Manifest = serde_json::from_str(
            r#"{
                "declarations": [
                    {
                        "element": { "name": "Cases", "kind": "type" },
                        "annotation": { "kind": "command", "path": "a <b" }
                    }
                ]
            }"#,
        )
        .unwrap();

        let diagnostics = manifest.compile().unwrap_err();
        let mut out = Vec::new();
        report(&diagnostics, Format::Pretty, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("error: lex error: \"<b\" contains an unmatched \"<\""));
        assert!(text.contains("   | a <b"));
    }

    #[test]
    fn test_empty_pretty_report_writes_nothing() {
        let mut out = Vec::new();
        report(&[], Format::Pretty, &mut out).unwrap();
        assert!(out.is_empty());
    }
}
