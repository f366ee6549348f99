//! Traits for encoding-aware parsing and serialization in propbinder.

use std::{
    fs::File,
    io::{BufRead, BufReader, Cursor, Write},
    path::Path,
};

use encoding_rs::Encoding;

use crate::error::Error;

/// A trait for parsing and writing one file of a text format.
///
/// Implementors work on UTF-8 text; the provided file methods take care of the
/// character encoding, so the same type can read an `ISO-8859-1` property file
/// and write a `UTF-8` one.
///
/// # Example
///
/// ```rust,no_run
/// use propbinder::{EscapingMode, formats::PropertiesFormat, traits::Parser};
///
/// let file = PropertiesFormat::read_from("messages_de.properties", encoding_rs::UTF_8, &EscapingMode::JavaUnicode)?;
/// file.write_to("copy_de.properties", encoding_rs::UTF_8, &EscapingMode::JavaUnicode)?;
/// Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Parser: Sized {
    /// Format-specific knobs needed both to parse and to write.
    type Options;

    /// Parse from any reader of UTF-8 text.
    fn from_reader<R: BufRead>(reader: R, options: &Self::Options) -> Result<Self, Error>;

    /// Write UTF-8 text to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, writer: W, options: &Self::Options) -> Result<(), Error>;

    /// Parse a file stored in `encoding`. A byte order mark overrides it.
    fn read_from<P: AsRef<Path>>(
        path: P,
        encoding: &'static Encoding,
        options: &Self::Options,
    ) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::Io(e).at_path(path))?;
        let decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
            .encoding(Some(encoding))
            .bom_override(true)
            .build(file);
        Self::from_reader(BufReader::new(decoder), options).map_err(|e| e.at_path(path))
    }

    /// Render the file into bytes of `encoding` without touching the disk.
    fn to_bytes(&self, encoding: &'static Encoding, options: &Self::Options) -> Result<Vec<u8>, Error> {
        let mut buffer = Vec::new();
        self.to_writer(&mut buffer, options)?;
        encode_text(buffer, encoding)
    }

    /// Write to a file in `encoding`, replacing it atomically.
    fn write_to<P: AsRef<Path>>(
        &self,
        path: P,
        encoding: &'static Encoding,
        options: &Self::Options,
    ) -> Result<(), Error> {
        let path = path.as_ref();
        let bytes = self
            .to_bytes(encoding, options)
            .map_err(|e| e.at_path(path))?;
        write_atomically(path, &bytes)
    }

    /// Parse from a string.
    fn from_str(s: &str, options: &Self::Options) -> Result<Self, Error> {
        Self::from_reader(Cursor::new(s), options)
    }
}

/// Transcodes UTF-8 output into `encoding`. Characters the target encoding
/// cannot represent are an error rather than being replaced.
pub(crate) fn encode_text(utf8: Vec<u8>, encoding: &'static Encoding) -> Result<Vec<u8>, Error> {
    let text = String::from_utf8(utf8)
        .map_err(|e| Error::DataMismatch(format!("output is not valid UTF-8: {}", e)))?;
    if encoding == encoding_rs::UTF_8 {
        return Ok(text.into_bytes());
    }
    let (bytes, used, had_unmappable) = encoding.encode(&text);
    if had_unmappable {
        return Err(Error::DataMismatch(format!(
            "text contains characters not representable in {}",
            used.name()
        )));
    }
    Ok(bytes.into_owned())
}

/// Writes `bytes` to a temporary file next to `path` and renames it into
/// place, so readers never observe a half-written file.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), Error> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(|e| Error::Io(e).at_path(parent))?;

    let mut temp =
        tempfile::NamedTempFile::new_in(parent).map_err(|e| Error::Io(e).at_path(parent))?;
    temp.write_all(bytes)
        .and_then(|_| temp.flush())
        .map_err(|e| Error::Io(e).at_path(path))?;
    temp.persist(path)
        .map_err(|e| Error::Io(e.error).at_path(path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_text_utf8_passthrough() {
        let bytes = encode_text("Grüße".as_bytes().to_vec(), encoding_rs::UTF_8).unwrap();
        assert_eq!(bytes, "Grüße".as_bytes());
    }

    #[test]
    fn test_encode_text_latin1() {
        let bytes = encode_text("Grüße".as_bytes().to_vec(), encoding_rs::WINDOWS_1252).unwrap();
        assert_eq!(bytes, vec![b'G', b'r', 0xFC, 0xDF, b'e']);
    }

    #[test]
    fn test_encode_text_rejects_unmappable() {
        let result = encode_text("日本".as_bytes().to_vec(), encoding_rs::WINDOWS_1252);
        assert!(matches!(result, Err(Error::DataMismatch(_))));
    }

    #[test]
    fn test_write_atomically_creates_parent_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.txt");
        write_atomically(&path, b"first").unwrap();
        write_atomically(&path, b"second").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"second");
        // Only the destination remains in the directory.
        let entries = std::fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(entries, 1);
    }
}
