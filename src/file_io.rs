//! Thin file, clock and real-path services used by the embedding library.

use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::common::types::PlatformStatus;

/// A read-only file with an explicit cursor.
#[derive(Debug)]
pub struct PlatformFile {
    file: File,
}

impl PlatformFile {
    pub fn open(path: &str) -> Result<Self, PlatformStatus> {
        let file = File::open(path).map_err(|err| {
            log::debug!("open {path:?} failed: {err}");
            PlatformStatus::FileOpenFailed
        })?;
        Ok(Self { file })
    }

    /// A private handle onto standard input; closing it leaves stdin usable.
    pub fn open_stdin() -> Result<Self, PlatformStatus> {
        Ok(Self {
            file: crate::duplicate_stdin()?,
        })
    }

    pub fn current_position(&mut self) -> Result<u64, PlatformStatus> {
        self.file
            .stream_position()
            .map_err(|_| PlatformStatus::FileGetPosFailed)
    }

    /// Total size in bytes. The cursor is left where it was.
    pub fn size(&mut self) -> Result<u64, PlatformStatus> {
        let current = self.current_position()?;
        let end = self
            .file
            .seek(SeekFrom::End(0))
            .map_err(|_| PlatformStatus::FileSeekFailed)?;
        self.file
            .seek(SeekFrom::Start(current))
            .map_err(|_| PlatformStatus::FileSeekFailed)?;
        Ok(end)
    }

    /// Reads until `buf` is full or the end of the file. Returns the byte count.
    pub fn read_buffer(&mut self, buf: &mut [u8]) -> Result<usize, PlatformStatus> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.file.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => {
                    log::warn!("read failed after {filled} bytes: {err}");
                    return Err(PlatformStatus::FileReadFailed);
                }
            }
        }
        Ok(filled)
    }

    pub fn reset(&mut self) -> Result<(), PlatformStatus> {
        self.file
            .seek(SeekFrom::Start(0))
            .map(|_| ())
            .map_err(|_| PlatformStatus::FileResetFailed)
    }

    /// Closes the file, reporting a failed OS close as `FileCloseFailed`.
    pub fn close(self) -> Result<(), PlatformStatus> {
        crate::close_file(self.file)
    }
}

/// Resolves `path` against the filesystem into an absolute, symlink-free path.
pub fn full_path(path: &str) -> Result<String, PlatformStatus> {
    let resolved = std::fs::canonicalize(path).map_err(|err| {
        log::debug!("canonicalize {path:?} failed: {err}");
        PlatformStatus::BasePathUnavailable
    })?;
    resolved
        .into_os_string()
        .into_string()
        .map_err(|_| PlatformStatus::EncodingError)
}

/// Milliseconds since the Unix epoch from the wall clock.
pub fn current_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}
