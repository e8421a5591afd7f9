//! Compiled artifact handling.

use std::path::Path;

use anyhow::{Context, Result};
use data_encoding::BASE32;
use tempfile::NamedTempFile;

use crate::core::action::CompileAction;

/// Allocate a fresh, uniquely named output file for `action`.
///
/// The file is deleted when the returned handle is dropped.
pub fn allocate_output(action: CompileAction) -> Result<NamedTempFile> {
    tempfile::Builder::new()
        .prefix("propcc-")
        .suffix(action.extension())
        .tempfile()
        .context("failed to allocate temporary artifact file")
}

/// Read a produced binary and encode it for transport.
pub fn read_encoded(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read artifact: {}", path.display()))?;
    Ok(encode(&bytes))
}

/// Base-32 (RFC 4648, padded) encoding of an artifact.
pub fn encode(bytes: &[u8]) -> String {
    BASE32.encode(bytes)
}

/// Decode an encoded artifact back to its bytes.
pub fn decode(encoded: &str) -> Result<Vec<u8>> {
    BASE32
        .decode(encoded.trim().as_bytes())
        .context("artifact is not valid base-32")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_encoding() {
        assert_eq!(encode(b"foobar"), "MZXW6YTBOI======");
        assert_eq!(encode(b""), "");
    }

    #[test]
    fn test_decode_restores_binary() {
        let binary: Vec<u8> = (0u8..=255).chain([0x7f, b'E', b'L', b'F']).collect();
        let decoded = decode(&encode(&binary)).unwrap();
        assert_eq!(decoded, binary);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode("not base32!").is_err());
    }

    #[test]
    fn test_output_is_removed_on_drop() {
        let file = allocate_output(CompileAction::Bin).unwrap();
        let path = file.path().to_path_buf();

        assert!(path.exists());
        assert!(path.to_string_lossy().ends_with(".elf"));

        std::fs::write(&path, b"\x7fELF").unwrap();
        assert_eq!(read_encoded(&path).unwrap(), encode(b"\x7fELF"));

        drop(file);
        assert!(!path.exists());
    }
}
