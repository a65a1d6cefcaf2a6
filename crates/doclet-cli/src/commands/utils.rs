//! Shared helpers for command implementations.

use std::io::{Read, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::{Result, ResultExt};

/// Read a whole input file, or stdin when `path` is `-`.
pub fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_path(path)
}

/// Serialize `value` as JSON followed by a newline.
pub fn write_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, value)?;
    } else {
        serde_json::to_writer(&mut *out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_json() {
        let mut out = Vec::new();
        write_json(&mut out, &serde_json::json!({"a": 1}), false).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{\"a\":1}\n");

        let mut out = Vec::new();
        write_json(&mut out, &serde_json::json!({"a": 1}), true).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{\n  \"a\": 1\n}\n");
    }

    #[test]
    fn test_read_missing_input() {
        let err = read_input(Path::new("/definitely/not/here.js")).unwrap_err();
        assert!(matches!(err, crate::error::CliError::FileNotFound(_)));
    }
}
