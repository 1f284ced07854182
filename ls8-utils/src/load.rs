use std::{fs, io, path::{Path, PathBuf}};

use thiserror::Error;
use tracing::{debug, warn};

/// Size of LS-8 memory, and so the largest program image which can be loaded.
pub const MEMORY_SIZE: usize = 256;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read program `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("program is {0} bytes, but memory only holds {MEMORY_SIZE}")]
    TooLarge(usize),
}

/// A line of a program file which isn't a valid binary byte.
///
/// These don't stop loading. The byte at that address is left as zero.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: could not convert `{text}` to a byte")]
pub struct ParseError {
    pub line: usize,
    pub text: String,
}

/// A program ready to be copied into memory from address 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramImage {
    pub bytes: Vec<u8>,
    pub errors: Vec<ParseError>,
}

/// Parses the LS-8 program text format: one binary literal per line, with `#` starting a
/// comment. Blank and comment-only lines take up no address.
pub fn parse_program(text: &str) -> Result<ProgramImage, LoadError> {
    let mut image = ProgramImage::default();

    for (i, line) in text.lines().enumerate() {
        let code = line.split('#').next().unwrap_or_default().trim();
        if code.is_empty() {
            continue;
        }

        match u8::from_str_radix(code, 2) {
            Ok(byte) => image.bytes.push(byte),
            Err(_) => {
                let error = ParseError { line: i + 1, text: code.to_string() };
                warn!(%error, "skipping unparseable program line");

                image.bytes.push(0);
                image.errors.push(error);
            }
        }
    }

    if image.bytes.len() > MEMORY_SIZE {
        return Err(LoadError::TooLarge(image.bytes.len()));
    }

    Ok(image)
}

/// Reads and parses a program file.
pub fn load_program_file(path: impl AsRef<Path>) -> Result<ProgramImage, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;

    let image = parse_program(&text)?;
    debug!(path = %path.display(), bytes = image.bytes.len(), "loaded program");
    Ok(image)
}

#[cfg(test)]
mod test {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::{LoadError, MEMORY_SIZE, ParseError, load_program_file, parse_program};

    const PRINT8: &str = "\
# print8.ls8: Print the number 8 on the screen

10000010 # LDI R0,8
00000000
00001000
01000111 # PRN R0
00000000
00000001 # HLT
";

    #[test]
    fn test_parse_program() {
        let image = parse_program(PRINT8).unwrap();
        assert_eq!(image.bytes, [0b10000010, 0, 8, 0b01000111, 0, 1]);
        assert!(image.errors.is_empty());
    }

    #[test]
    fn test_comments_and_blank_lines_are_ignored() {
        let stripped = "10000010\n00000000\n00001000\n01000111\n00000000\n00000001\n";
        assert_eq!(parse_program(PRINT8).unwrap(), parse_program(stripped).unwrap());
    }

    #[test]
    fn test_bad_line_leaves_gap() {
        let image = parse_program("00000001\n0000oops\n  \n11111111 # end\n").unwrap();

        assert_eq!(image.bytes, [1, 0, 0xff]);
        assert_eq!(image.errors, [ParseError { line: 2, text: "0000oops".to_string() }]);
    }

    #[test]
    fn test_too_large() {
        let text = "00000000\n".repeat(MEMORY_SIZE + 1);
        assert!(matches!(parse_program(&text), Err(LoadError::TooLarge(257))));

        let text = "00000000\n".repeat(MEMORY_SIZE);
        assert_eq!(parse_program(&text).unwrap().bytes.len(), MEMORY_SIZE);
    }

    #[test]
    fn test_load_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", PRINT8).unwrap();

        let image = load_program_file(file.path()).unwrap();
        assert_eq!(image.bytes.len(), 6);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_program_file(dir.path().join("missing.ls8"));
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }
}
