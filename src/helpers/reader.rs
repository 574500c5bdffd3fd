use crate::error::ProjectSheetError;
use std::fs::File;
use std::io::BufReader;
use std::io::Cursor;
use std::io::ErrorKind;
use std::io::Read;
use std::io::Seek;
use std::io::SeekFrom;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkbookReaderError {
    #[error("Workbook not found: '{0}'")]
    FileNotFound(String),
}

/// Byte source of a workbook package: a file on disk or an in-memory buffer.
pub(crate) enum WorkbookReader {
    Local(BufReader<File>),
    Memory(Cursor<Vec<u8>>),
}

impl WorkbookReader {
    /// Compound File Binary signature, used by encrypted OOXML packages and legacy `.xls`.
    const CFB_SIGNATURE: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

    /// Opens a local workbook file.
    ///
    /// A missing path is reported as `FileNotFound` rather than a bare io error,
    /// other io failures pass through unchanged.
    pub(crate) fn open(path: &Path) -> Result<WorkbookReader, ProjectSheetError> {
        match File::open(path) {
            Ok(file) => Ok(WorkbookReader::Local(BufReader::new(file))),
            Err(error) if error.kind() == ErrorKind::NotFound => {
                Err(WorkbookReaderError::FileNotFound(path.display().to_string()))?
            }
            Err(error) => Err(error)?,
        }
    }

    pub(crate) fn from_bytes(bytes: Vec<u8>) -> WorkbookReader {
        WorkbookReader::Memory(Cursor::new(bytes))
    }

    /// Checks for a CFB container instead of a zip package, then rewinds.
    pub(crate) fn is_compound_file(&mut self) -> Result<bool, ProjectSheetError> {
        let mut header = [0u8; 8];
        let mut filled = 0usize;
        while filled < header.len() {
            let count = self.read(&mut header[filled..])?;
            if count == 0 {
                break;
            }
            filled += count;
        }
        self.seek(SeekFrom::Start(0))?;
        Ok(filled == header.len() && header == Self::CFB_SIGNATURE)
    }
}

impl Read for WorkbookReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            WorkbookReader::Local(reader) => reader.read(buf),
            WorkbookReader::Memory(reader) => reader.read(buf),
        }
    }
}

impl Seek for WorkbookReader {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        match self {
            WorkbookReader::Local(reader) => reader.seek(pos),
            WorkbookReader::Memory(reader) => reader.seek(pos),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_local_file() {
        let result = WorkbookReader::open(Path::new("Cargo.toml"));
        assert!(result.is_ok(), "Failed to open local file: {:?}", result.err());

        let result = WorkbookReader::open(Path::new("non_existent_file.xlsx"));
        assert!(matches!(
            result,
            Err(ProjectSheetError::WorkbookReaderError(WorkbookReaderError::FileNotFound(_)))
        ));
    }

    #[test]
    fn detect_compound_file() -> Result<(), ProjectSheetError> {
        let mut bytes = WorkbookReader::CFB_SIGNATURE.to_vec();
        bytes.extend_from_slice(&[0u8; 16]);
        let mut reader = WorkbookReader::from_bytes(bytes);
        assert!(reader.is_compound_file()?);
        assert_eq!(reader.stream_position()?, 0);

        let mut reader = WorkbookReader::from_bytes(b"PK\x03\x04".to_vec());
        assert!(!reader.is_compound_file()?);
        Ok(())
    }
}
