use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

/// File name searched for when no explicit configuration is given.
pub const MANIFEST_FILE: &str = "Plus.toml";

/// The parsed Plus.toml manifest. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlusManifest {
    pub lexer: LexerSection,
    pub output: OutputSection,
}

/// `[lexer]`: maximum lexeme lengths per bounded category.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LexerSection {
    #[serde(default = "default_word_len")]
    pub max_identifier_len: usize,
    #[serde(default = "default_word_len")]
    pub max_integer_len: usize,
    #[serde(default = "default_string_len")]
    pub max_string_len: usize,
}

impl Default for LexerSection {
    fn default() -> Self {
        Self {
            max_identifier_len: default_word_len(),
            max_integer_len: default_word_len(),
            max_string_len: default_string_len(),
        }
    }
}

fn default_word_len() -> usize {
    63
}
fn default_string_len() -> usize {
    255
}

/// `[output]`: listing format and file naming.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    #[serde(default)]
    pub minus: MinusStyle,
    #[serde(default = "default_input_extension")]
    pub input_extension: String,
    #[serde(default = "default_output_extension")]
    pub output_extension: String,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            minus: MinusStyle::default(),
            input_extension: default_input_extension(),
            output_extension: default_output_extension(),
        }
    }
}

fn default_input_extension() -> String {
    ".plus".to_string()
}
fn default_output_extension() -> String {
    ".lx".to_string()
}

/// How a standalone `-` appears in the token listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MinusStyle {
    /// Written as `Operator(-)`.
    #[default]
    Operator,
    /// No line is written for it.
    Omit,
}

impl FromStr for MinusStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "operator" => Ok(MinusStyle::Operator),
            "omit" => Ok(MinusStyle::Omit),
            other => Err(format!(
                "unknown minus style '{}' (expected 'operator' or 'omit')",
                other
            )),
        }
    }
}

/// Raw TOML structure for deserialization.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawManifest {
    #[serde(default)]
    lexer: LexerSection,
    #[serde(default)]
    output: OutputSection,
}

/// Errors that can occur when loading a manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("no Plus.toml found (searched from {0})")]
    NotFound(String),
    #[error("failed to read Plus.toml: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("invalid Plus.toml: {0}")]
    ParseError(String),
    #[error("invalid Plus.toml: [lexer] {0} must be at least 1")]
    ZeroLimit(&'static str),
    #[error("invalid Plus.toml: [output] {0} must not be empty")]
    EmptyExtension(&'static str),
}

/// Walk up from `start_dir` looking for `Plus.toml`.
pub fn find_manifest(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    loop {
        let candidate = current.join(MANIFEST_FILE);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Load and validate a manifest from a file path.
pub fn load_manifest(path: &Path) -> Result<PlusManifest, ManifestError> {
    let content = std::fs::read_to_string(path)?;
    parse_manifest(&content)
}

/// Parse and validate a manifest from a string.
pub fn parse_manifest(content: &str) -> Result<PlusManifest, ManifestError> {
    let raw: RawManifest =
        toml::from_str(content).map_err(|e| ManifestError::ParseError(e.to_string()))?;

    validate_lexer(&raw.lexer)?;
    validate_output(&raw.output)?;

    Ok(PlusManifest {
        lexer: raw.lexer,
        output: raw.output,
    })
}

/// Find and load the manifest governing a source file. Relative paths are
/// resolved against the working directory before walking up.
pub fn find_and_load_manifest(source_file: &Path) -> Result<PlusManifest, ManifestError> {
    let start_dir = search_start(source_file, &std::env::current_dir()?);
    let manifest_path = find_manifest(&start_dir)
        .ok_or_else(|| ManifestError::NotFound(start_dir.display().to_string()))?;
    load_manifest(&manifest_path)
}

/// Absolute directory of `source_file`, taking `cwd` as the base.
fn search_start(source_file: &Path, cwd: &Path) -> PathBuf {
    match source_file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => cwd.join(dir),
        _ => cwd.to_path_buf(),
    }
}

fn validate_lexer(lexer: &LexerSection) -> Result<(), ManifestError> {
    let limits = [
        ("max_identifier_len", lexer.max_identifier_len),
        ("max_integer_len", lexer.max_integer_len),
        ("max_string_len", lexer.max_string_len),
    ];
    for (key, value) in limits {
        if value == 0 {
            return Err(ManifestError::ZeroLimit(key));
        }
    }
    Ok(())
}

fn validate_output(output: &OutputSection) -> Result<(), ManifestError> {
    if output.input_extension.is_empty() {
        return Err(ManifestError::EmptyExtension("input_extension"));
    }
    if output.output_extension.is_empty() {
        return Err(ManifestError::EmptyExtension("output_extension"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_manifest_uses_defaults() {
        let manifest = parse_manifest("").unwrap();
        assert_eq!(manifest.lexer, LexerSection::default());
        assert_eq!(manifest.lexer.max_identifier_len, 63);
        assert_eq!(manifest.lexer.max_string_len, 255);
        assert_eq!(manifest.output.minus, MinusStyle::Operator);
        assert_eq!(manifest.output.input_extension, ".plus");
        assert_eq!(manifest.output.output_extension, ".lx");
    }

    #[test]
    fn parse_full_manifest() {
        let toml = r#"
[lexer]
max_identifier_len = 16
max_integer_len = 10
max_string_len = 80

[output]
minus = "omit"
input_extension = ".src"
output_extension = ".tokens"
"#;
        let manifest = parse_manifest(toml).unwrap();
        assert_eq!(manifest.lexer.max_identifier_len, 16);
        assert_eq!(manifest.lexer.max_integer_len, 10);
        assert_eq!(manifest.lexer.max_string_len, 80);
        assert_eq!(manifest.output.minus, MinusStyle::Omit);
        assert_eq!(manifest.output.input_extension, ".src");
        assert_eq!(manifest.output.output_extension, ".tokens");
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let toml = "[lexer]\nmax_string_len = 1000\n";
        let manifest = parse_manifest(toml).unwrap();
        assert_eq!(manifest.lexer.max_string_len, 1000);
        assert_eq!(manifest.lexer.max_identifier_len, 63);
        assert_eq!(manifest.output, OutputSection::default());
    }

    #[test]
    fn zero_limit_rejected() {
        let err = parse_manifest("[lexer]\nmax_integer_len = 0\n")
            .unwrap_err()
            .to_string();
        assert!(err.contains("max_integer_len"), "got: {}", err);
    }

    #[test]
    fn empty_extension_rejected() {
        let err = parse_manifest("[output]\noutput_extension = \"\"\n")
            .unwrap_err()
            .to_string();
        assert!(err.contains("output_extension"), "got: {}", err);
    }

    #[test]
    fn unknown_minus_style_rejected() {
        let err = parse_manifest("[output]\nminus = \"dash\"\n")
            .unwrap_err()
            .to_string();
        assert!(err.contains("invalid Plus.toml"), "got: {}", err);
    }

    #[test]
    fn unknown_key_rejected() {
        let result = parse_manifest("[lexer]\nmax_len = 4\n");
        assert!(matches!(result, Err(ManifestError::ParseError(_))));
    }

    #[test]
    fn minus_style_from_str() {
        assert_eq!("operator".parse::<MinusStyle>(), Ok(MinusStyle::Operator));
        assert_eq!("omit".parse::<MinusStyle>(), Ok(MinusStyle::Omit));
        assert!("Omit".parse::<MinusStyle>().is_err());
    }

    #[test]
    fn find_manifest_walks_up() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        std::fs::create_dir_all(root.join("src/nested")).unwrap();
        std::fs::write(root.join(MANIFEST_FILE), "[output]\nminus = \"omit\"\n").unwrap();

        let found = find_manifest(&root.join("src/nested"));
        assert_eq!(found, Some(root.join(MANIFEST_FILE)));

        let manifest = find_and_load_manifest(&root.join("src/nested/prog.plus")).unwrap();
        assert_eq!(manifest.output.minus, MinusStyle::Omit);
    }

    #[test]
    #[cfg(unix)]
    fn search_starts_from_absolute_directory() {
        let cwd = Path::new("/work/project/src");
        assert_eq!(search_start(Path::new("prog"), cwd), cwd);
        assert_eq!(search_start(Path::new("lib/prog"), cwd), cwd.join("lib"));
        assert_eq!(
            search_start(Path::new("/abs/prog"), cwd),
            PathBuf::from("/abs")
        );
    }

    #[test]
    fn bare_file_name_finds_manifest_above_cwd() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(tmp.path().join("a").join(MANIFEST_FILE), "").unwrap();

        let start = search_start(Path::new("prog"), &nested);
        assert_eq!(
            find_manifest(&start),
            Some(tmp.path().join("a").join(MANIFEST_FILE))
        );
    }
}
