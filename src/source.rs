//! Line sources for pass one.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::MacroError;

/// Read every line of the file at `path`; line terminators are stripped
pub fn read_lines(path: &Path) -> Result<Vec<String>, MacroError> {
    lines_from_reader(BufReader::new(File::open(path)?))
}

pub fn lines_from_reader<R: BufRead>(reader: R) -> Result<Vec<String>, MacroError> {
    Ok(reader.lines().collect::<Result<Vec<_>, _>>()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_lines_from_reader() {
        let input = "HEADER\r\nMACRO\nINCR &A\n\nMEND";
        let lines = lines_from_reader(input.as_bytes()).unwrap();
        assert_eq!(lines, vec!["HEADER", "MACRO", "INCR &A", "", "MEND"]);
    }

    #[test]
    fn test_read_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "HEADER").unwrap();
        writeln!(file, "MACRO").unwrap();
        let lines = read_lines(file.path()).unwrap();
        assert_eq!(lines, vec!["HEADER", "MACRO"]);
    }

    #[test]
    fn test_missing_file() {
        let err = read_lines(Path::new("/definitely/not/here.asm")).unwrap_err();
        assert!(matches!(err, MacroError::Io(_)));
    }
}
