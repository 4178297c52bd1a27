use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use plus_common::manifest::{self, ManifestError};
use plus_common::{Diagnostic, MinusStyle, PlusManifest};
use plus_lexer::{LexemeLimits, Lexer, Listing, TokenKind};
use tracing::{debug, info};

/// What the command line asked for, before configuration is applied.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub base: PathBuf,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub minus: Option<MinusStyle>,
}

/// A fully resolved lexing job.
#[derive(Debug, Clone)]
pub struct Job {
    pub input: PathBuf,
    pub output: PathBuf,
    pub limits: LexemeLimits,
    pub listing: Listing,
}

/// Result of a successful listing run.
#[derive(Debug, Default)]
pub struct Summary {
    pub lines: usize,
    pub warnings: Vec<Diagnostic>,
}

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("could not open input file '{}': {source}", .path.display())]
    OpenInput { path: PathBuf, source: io::Error },
    #[error("could not create output file '{}': {source}", .path.display())]
    CreateOutput { path: PathBuf, source: io::Error },
    #[error("could not write '{}': {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    #[error("failed to serialize tokens: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("lexical analysis failed")]
    Lexical { diagnostics: Vec<Diagnostic> },
}

/// `base` with `extension` appended verbatim (`prog` + `.plus` = `prog.plus`).
pub fn with_extension_appended(base: &Path, extension: &str) -> PathBuf {
    let mut path = OsString::from(base.as_os_str());
    path.push(extension);
    PathBuf::from(path)
}

impl Job {
    /// Apply configuration to the command-line options. An explicit
    /// `--config` must load; otherwise a Plus.toml next to (or above) the
    /// base path is used when present.
    pub fn resolve(options: &Options) -> Result<Job, DriverError> {
        let manifest = match options.config {
            Some(ref path) => manifest::load_manifest(path)?,
            None => match manifest::find_and_load_manifest(&options.base) {
                Ok(m) => m,
                Err(ManifestError::NotFound(dir)) => {
                    debug!(searched_from = %dir, "no Plus.toml found, using defaults");
                    PlusManifest::default()
                }
                Err(e) => return Err(e.into()),
            },
        };

        let input = with_extension_appended(&options.base, &manifest.output.input_extension);
        let output = options.output.clone().unwrap_or_else(|| {
            with_extension_appended(&options.base, &manifest.output.output_extension)
        });
        let minus = options.minus.unwrap_or(manifest.output.minus);

        Ok(Job {
            input,
            output,
            limits: LexemeLimits::from(&manifest.lexer),
            listing: Listing::new(minus),
        })
    }

    pub fn file_name(&self) -> String {
        self.input
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }

    pub fn read_input(&self) -> Result<Vec<u8>, DriverError> {
        fs::read(&self.input).map_err(|source| DriverError::OpenInput {
            path: self.input.clone(),
            source,
        })
    }

    /// Stream the listing of `source` into the output file, one line per
    /// token. Lines written before a lexical error stay in the file.
    pub fn write_listing(&self, source: &[u8]) -> Result<Summary, DriverError> {
        let file = File::create(&self.output).map_err(|source| DriverError::CreateOutput {
            path: self.output.clone(),
            source,
        })?;
        let mut out = BufWriter::new(file);
        let write_err = |source| DriverError::Write {
            path: self.output.clone(),
            source,
        };

        let mut lexer = Lexer::with_limits(source, self.file_name(), self.limits);
        let mut summary = Summary::default();
        loop {
            let token = lexer.next_token();
            match token.kind {
                TokenKind::EndOfInput => break,
                TokenKind::Error => {
                    out.flush().map_err(write_err)?;
                    return Err(DriverError::Lexical {
                        diagnostics: lexer.into_diagnostics().into_diagnostics(),
                    });
                }
                _ => {}
            }

            if self.listing.write_token(&mut out, &token).map_err(write_err)? {
                summary.lines += 1;
            } else if token.kind == TokenKind::Minus {
                summary.warnings.push(
                    Diagnostic::warning("'-' is not written to the listing")
                        .with_span(token.span.clone())
                        .with_suggestion("set `minus = \"operator\"` in Plus.toml to list it"),
                );
            }
        }
        out.flush().map_err(write_err)?;

        info!(
            input = %self.input.display(),
            output = %self.output.display(),
            lines = summary.lines,
            "listing written"
        );
        Ok(summary)
    }

    /// The whole token stream as pretty JSON, terminal token included.
    pub fn token_dump(&self, source: &[u8]) -> Result<String, DriverError> {
        let (tokens, diags) = Lexer::with_limits(source, self.file_name(), self.limits).tokenize();
        if diags.has_errors() {
            return Err(DriverError::Lexical {
                diagnostics: diags.into_diagnostics(),
            });
        }
        Ok(serde_json::to_string_pretty(&tokens)?)
    }
}
