//! Text/binary sniffing for file content read from disk.

use serde::{Deserialize, Serialize};

/// Default number of leading bytes inspected for NUL bytes.
pub const DEFAULT_SNIFF_BYTES: usize = 8000;

/// File content as handed to the scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileContent {
    /// Decoded text, eligible for PII scanning
    Text(String),
    /// Binary data; classified by path only
    Binary,
}

impl FileContent {
    /// The text, if this is text content.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Binary => None,
        }
    }
}

/// Decide whether raw bytes are text.
///
/// A NUL byte within the first `sniff_len` bytes, or bytes that are not
/// valid UTF-8, mark the content as binary. A leading UTF-8 BOM is dropped.
#[must_use]
pub fn sniff_content(bytes: Vec<u8>, sniff_len: usize) -> FileContent {
    let head = &bytes[..bytes.len().min(sniff_len)];
    if head.contains(&0) {
        return FileContent::Binary;
    }

    match String::from_utf8(bytes) {
        Ok(text) => match text.strip_prefix('\u{feff}') {
            Some(stripped) => FileContent::Text(stripped.to_string()),
            None => FileContent::Text(text),
        },
        Err(_) => FileContent::Binary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text() {
        let content = sniff_content(b"name,id\nJan,1234567\n".to_vec(), DEFAULT_SNIFF_BYTES);
        assert_eq!(content.as_text(), Some("name,id\nJan,1234567\n"));
    }

    #[test]
    fn test_nul_byte_is_binary() {
        let content = sniff_content(vec![0x89, b'P', b'N', b'G', 0, 0, 0, 13], DEFAULT_SNIFF_BYTES);
        assert_eq!(content, FileContent::Binary);
    }

    #[test]
    fn test_nul_beyond_sniff_window() {
        let mut bytes = b"abc".to_vec();
        bytes.push(0);
        // NUL is valid UTF-8, so only the sniff window catches it.
        assert_eq!(sniff_content(bytes.clone(), 2).as_text(), Some("abc\0"));
        assert_eq!(sniff_content(bytes, 8), FileContent::Binary);
    }

    #[test]
    fn test_invalid_utf8_is_binary() {
        assert_eq!(
            sniff_content(vec![b'a', 0xff, 0xfe, b'b'], DEFAULT_SNIFF_BYTES),
            FileContent::Binary
        );
    }

    #[test]
    fn test_bom_is_stripped() {
        let mut bytes = "\u{feff}Hoofdweg 12".as_bytes().to_vec();
        bytes.push(b'\n');
        assert_eq!(
            sniff_content(bytes, DEFAULT_SNIFF_BYTES).as_text(),
            Some("Hoofdweg 12\n")
        );
    }

    #[test]
    fn test_empty_is_text() {
        assert_eq!(sniff_content(Vec::new(), DEFAULT_SNIFF_BYTES).as_text(), Some(""));
    }
}
