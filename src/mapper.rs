//! Mapping of matched input paths to output paths.

use regex::Regex;
use serde::Deserialize;

/// How a matched relative input path becomes a relative output path.
///
/// Paths on both sides are `/`-separated and relative to the file-set
/// directory and the output directory respectively.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PathMapper {
    /// Output path equals input path
    #[default]
    Identity,
    /// Directories are dropped, only the file name is kept
    Flatten,
    /// `from` holds one `*`; the text it matched replaces the `*` in `to`
    Glob { from: String, to: String },
    /// Regular expression replacement, `$1` refers to capture groups
    Regexp { from: String, to: String },
    /// Every input maps to the same output path
    Merge { to: String },
}

/// A [`PathMapper`] ready to be applied.
#[derive(Debug)]
pub enum CompiledMapper {
    Identity,
    Flatten,
    Glob { prefix: String, suffix: String, to_prefix: String, to_suffix: String, wildcard: bool },
    Regexp { from: Regex, to: String },
    Merge { to: String },
}

impl PathMapper {
    /// Validates the mapper configuration.
    ///
    /// # Errors
    /// Returns a description of the problem for an invalid regular expression
    /// or a glob pattern with more than one `*`.
    pub fn compile(&self) -> Result<CompiledMapper, String> {
        match self {
            PathMapper::Identity => Ok(CompiledMapper::Identity),
            PathMapper::Flatten => Ok(CompiledMapper::Flatten),
            PathMapper::Glob { from, to } => {
                let (prefix, suffix, wildcard) = split_wildcard(from)?;
                let (to_prefix, to_suffix, _) = split_wildcard(to)?;
                Ok(CompiledMapper::Glob {
                    prefix: prefix.to_string(),
                    suffix: suffix.to_string(),
                    to_prefix: to_prefix.to_string(),
                    to_suffix: to_suffix.to_string(),
                    wildcard,
                })
            }
            PathMapper::Regexp { from, to } => {
                let from = Regex::new(from)
                    .map_err(|e| format!("invalid mapper expression '{from}': {e}"))?;
                Ok(CompiledMapper::Regexp { from, to: to.clone() })
            }
            PathMapper::Merge { to } => Ok(CompiledMapper::Merge { to: to.clone() }),
        }
    }
}

fn split_wildcard(pattern: &str) -> Result<(&str, &str, bool), String> {
    match pattern.find('*') {
        Some(index) => {
            let (prefix, rest) = pattern.split_at(index);
            let suffix = &rest[1..];
            if suffix.contains('*') {
                return Err(format!("mapper pattern '{pattern}' contains more than one '*'"));
            }
            Ok((prefix, suffix, true))
        }
        None => Ok((pattern, "", false)),
    }
}

impl CompiledMapper {
    /// Maps one relative input path. `None` means the file has no output.
    pub fn map(&self, input: &str) -> Option<String> {
        match self {
            CompiledMapper::Identity => Some(input.to_string()),
            CompiledMapper::Flatten => {
                Some(input.rsplit('/').next().unwrap_or(input).to_string())
            }
            CompiledMapper::Glob { prefix, suffix, to_prefix, to_suffix, wildcard } => {
                if !*wildcard {
                    return (input == prefix).then(|| to_prefix.clone());
                }
                if input.len() < prefix.len() + suffix.len() {
                    return None;
                }
                let matched = input.strip_prefix(prefix.as_str())?.strip_suffix(suffix.as_str())?;
                Some(format!("{to_prefix}{matched}{to_suffix}"))
            }
            CompiledMapper::Regexp { from, to } => {
                if !from.is_match(input) {
                    return None;
                }
                Some(from.replace(input, to.as_str()).into_owned())
            }
            CompiledMapper::Merge { to } => Some(to.clone()),
        }
    }
}
