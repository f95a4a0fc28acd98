//! Character set resolution and encoded file I/O.

use std::fs;
use std::io::Write;
use std::path::Path;

use encoding_rs::{Encoding, UTF_8};

use crate::config::ProjectInfo;
use crate::error::{Error, Result};
use crate::logger::LogSink;

/// Encoding used when neither the configuration nor the project names one.
pub fn platform_default() -> &'static Encoding {
    UTF_8
}

/// Looks up a character set by its label (`UTF-8`, `ISO-8859-1`, `windows-1252`, ...).
///
/// # Errors
/// * `Error::ConfigError` if the label is unknown or names an encoding that
///   can only be decoded, never written (the UTF-16 family)
pub fn for_label(label: &str) -> Result<&'static Encoding> {
    let encoding = Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| Error::ConfigError(format!("unsupported character set '{label}'")))?;

    if encoding.output_encoding() != encoding {
        return Err(Error::ConfigError(format!(
            "character set '{label}' cannot be used to write files"
        )));
    }

    Ok(encoding)
}

/// Resolves the character set used for reading and writing files.
///
/// Order: the explicitly configured label, then the project's source
/// encoding, then [`platform_default`] with a warning.
pub fn resolve_encoding(
    configured: Option<&str>,
    project: &ProjectInfo,
    sink: &dyn LogSink,
) -> Result<&'static Encoding> {
    let label = configured.map(str::to_owned).or_else(|| project.source_encoding());

    let encoding = match label {
        Some(label) => for_label(&label)?,
        None => {
            sink.warn("Using default character set encoding");
            platform_default()
        }
    };

    sink.debug(&format!("Using character set: {}", encoding.name()));
    Ok(encoding)
}

/// Decodes `bytes` without byte-order-mark sniffing; malformed sequences
/// become U+FFFD.
pub fn decode(bytes: &[u8], encoding: &'static Encoding) -> String {
    let (text, _) = encoding.decode_without_bom_handling(bytes);
    text.into_owned()
}

/// Reads a whole file as text in the given encoding.
pub fn read_to_string<P: AsRef<Path>>(path: P, encoding: &'static Encoding) -> Result<String> {
    let path = path.as_ref();
    let bytes = fs::read(path)
        .map_err(|source| Error::FileReadError { path: path.to_path_buf(), source })?;
    Ok(decode(&bytes, encoding))
}

/// Writes `text` to `out` in the given encoding and flushes it.
///
/// Characters the encoding cannot represent are written as numeric
/// character references.
pub fn write_text<W: Write>(
    mut out: W,
    text: &str,
    encoding: &'static Encoding,
) -> std::io::Result<()> {
    let (bytes, _, _) = encoding.encode(text);
    out.write_all(&bytes)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_label_is_case_insensitive() {
        assert_eq!(for_label("utf-8").unwrap(), UTF_8);
        assert_eq!(for_label(" UTF-8 ").unwrap(), UTF_8);
        assert_eq!(for_label("ISO-8859-1").unwrap().name(), "windows-1252");
    }

    #[test]
    fn test_for_label_rejects_unknown() {
        assert!(matches!(for_label("klingon"), Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_for_label_rejects_utf16() {
        assert!(matches!(for_label("UTF-16LE"), Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_write_text_latin1() {
        let encoding = for_label("latin1").unwrap();
        let mut out = Vec::new();
        write_text(&mut out, "caf\u{e9}", encoding).unwrap();
        assert_eq!(out, b"caf\xe9");
        assert_eq!(decode(&out, encoding), "caf\u{e9}");
    }
}
