/*!
 * Best-effort text decoding for exported files
 */

use std::fs;
use std::io;
use std::path::Path;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A strict decoder tried by [`SafeTextReader`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// Plain UTF-8, a leading BOM is kept as U+FEFF
    Utf8,
    /// UTF-8 with a leading BOM removed
    Utf8Sig,
    /// ISO-8859-1, every byte maps to the code point of the same value
    Latin1,
}

impl TextEncoding {
    /// Decode strictly, returning `None` when the bytes are not valid
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_owned),
            TextEncoding::Utf8Sig => {
                let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
                std::str::from_utf8(body).ok().map(str::to_owned)
            }
            TextEncoding::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

/// Reads files as text without failing on odd encodings
#[derive(Debug, Clone)]
pub struct SafeTextReader {
    encodings: Vec<TextEncoding>,
}

impl Default for SafeTextReader {
    fn default() -> Self {
        Self {
            encodings: vec![
                TextEncoding::Utf8,
                TextEncoding::Utf8Sig,
                TextEncoding::Latin1,
            ],
        }
    }
}

impl SafeTextReader {
    pub fn with_encodings(encodings: Vec<TextEncoding>) -> Self {
        Self { encodings }
    }

    /// Read a file as text. Only I/O failures are errors.
    pub fn read(&self, path: &Path) -> io::Result<String> {
        let bytes = fs::read(path)?;
        Ok(self.decode(&bytes))
    }

    /// Decode with the first encoding that accepts the bytes, replacing
    /// invalid sequences if none does
    pub fn decode(&self, bytes: &[u8]) -> String {
        self.encodings
            .iter()
            .find_map(|enc| enc.decode(bytes))
            .unwrap_or_else(|| String::from_utf8_lossy(bytes).into_owned())
    }
}
