//! Configuration file loading.
//!
//! The file is a list of `KEY=VALUE` lines; blank lines and lines starting
//! with `#` are ignored.
//!
//! ```text
//! WIDTH=20
//! HEIGHT=15
//! ENTRY=0,0
//! EXIT=19,14
//! OUTPUT_FILE=maze.txt
//! PERFECT=True
//! SEED=42            # optional
//! ALGORITHM=prim     # optional: dfs, prim, kruskal
//! PATTERN=false      # optional, defaults to true
//! ```
//!
//! Only syntax and positivity are checked here; bounds and entry/exit
//! distinctness are the generator's job.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::carve::Algorithm;
use crate::generator::GeneratorConfig;
use crate::grid::Coord;

const MANDATORY_KEYS: [&str; 6] = ["WIDTH", "HEIGHT", "ENTRY", "EXIT", "OUTPUT_FILE", "PERFECT"];

#[derive(Debug)]
pub enum ConfigFileError {
    Io { path: PathBuf, source: std::io::Error },
    /// A non-comment line without `=`.
    Syntax { line: usize, text: String },
    DuplicateKey { line: usize, key: String },
    MissingKeys(Vec<&'static str>),
    InvalidValue {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl fmt::Display for ConfigFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigFileError::Io { path, source } => {
                write!(f, "cannot read config file {}: {}", path.display(), source)
            }
            ConfigFileError::Syntax { line, text } => {
                write!(f, "invalid format at line {}: {}", line, text)
            }
            ConfigFileError::DuplicateKey { line, key } => {
                write!(f, "duplicate key {} at line {}", key, line)
            }
            ConfigFileError::MissingKeys(keys) => {
                write!(f, "missing configuration keys: {}", keys.join(", "))
            }
            ConfigFileError::InvalidValue { key, value, reason } => {
                write!(f, "invalid value for {}: '{}' ({})", key, value, reason)
            }
        }
    }
}

impl std::error::Error for ConfigFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigFileError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Parsed configuration of one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MazeConfig {
    pub width: usize,
    pub height: usize,
    pub entry: Coord,
    pub exit: Coord,
    pub output_file: PathBuf,
    pub perfect: bool,
    pub seed: Option<u64>,
    pub algorithm: Algorithm,
    pub include_pattern: bool,
}

impl MazeConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigFileError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        text.parse()
    }

    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            width: self.width,
            height: self.height,
            entry: self.entry,
            exit: self.exit,
            perfect: self.perfect,
            seed: self.seed,
            include_pattern: self.include_pattern,
            algorithm: self.algorithm,
        }
    }
}

fn invalid(key: &'static str, value: &str, reason: &'static str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        key,
        value: value.to_string(),
        reason,
    }
}

fn value_of<'a>(raw: &'a HashMap<String, String>, key: &str) -> &'a str {
    raw.get(key).map(String::as_str).unwrap_or_default()
}

fn parse_positive(key: &'static str, value: &str) -> Result<usize, ConfigFileError> {
    match value.parse::<usize>() {
        Ok(0) | Err(_) => Err(invalid(key, value, "expected a positive integer")),
        Ok(n) => Ok(n),
    }
}

fn parse_coord(key: &'static str, value: &str) -> Result<Coord, ConfigFileError> {
    let bad = || invalid(key, value, "expected x,y with non-negative integers");
    let (x, y) = value.split_once(',').ok_or_else(bad)?;
    let x = x.trim().parse().map_err(|_| bad())?;
    let y = y.trim().parse().map_err(|_| bad())?;
    Ok(Coord::new(x, y))
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigFileError> {
    match value.to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(invalid(key, value, "expected true or false")),
    }
}

impl std::str::FromStr for MazeConfig {
    type Err = ConfigFileError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut raw: HashMap<String, String> = HashMap::new();
        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (key, value) = line.split_once('=').ok_or_else(|| ConfigFileError::Syntax {
                line: index + 1,
                text: line.to_string(),
            })?;
            // trailing comments are allowed on value lines
            let value = value.split('#').next().unwrap_or_default().trim();
            let key = key.trim().to_ascii_uppercase();
            if raw.contains_key(&key) {
                return Err(ConfigFileError::DuplicateKey {
                    line: index + 1,
                    key,
                });
            }
            raw.insert(key, value.to_string());
        }

        let missing: Vec<&'static str> = MANDATORY_KEYS
            .into_iter()
            .filter(|k| !raw.contains_key(*k))
            .collect();
        if !missing.is_empty() {
            return Err(ConfigFileError::MissingKeys(missing));
        }

        let seed = match raw.get("SEED") {
            Some(v) => Some(
                v.parse::<u64>()
                    .map_err(|_| invalid("SEED", v, "expected a non-negative integer"))?,
            ),
            None => None,
        };
        let algorithm = match raw.get("ALGORITHM") {
            Some(v) => v
                .parse::<Algorithm>()
                .map_err(|_| invalid("ALGORITHM", v, "expected dfs, prim or kruskal"))?,
            None => Algorithm::default(),
        };
        let include_pattern = match raw.get("PATTERN") {
            Some(v) => parse_bool("PATTERN", v)?,
            None => true,
        };

        let output_file = value_of(&raw, "OUTPUT_FILE");
        if output_file.is_empty() {
            return Err(invalid("OUTPUT_FILE", output_file, "expected a file path"));
        }

        Ok(MazeConfig {
            width: parse_positive("WIDTH", value_of(&raw, "WIDTH"))?,
            height: parse_positive("HEIGHT", value_of(&raw, "HEIGHT"))?,
            entry: parse_coord("ENTRY", value_of(&raw, "ENTRY"))?,
            exit: parse_coord("EXIT", value_of(&raw, "EXIT"))?,
            output_file: PathBuf::from(output_file),
            perfect: parse_bool("PERFECT", value_of(&raw, "PERFECT"))?,
            seed,
            algorithm,
            include_pattern,
        })
    }
}
