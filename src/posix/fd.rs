use std::fs::File;
use std::os::fd::{AsFd, IntoRawFd};

use crate::common::types::PlatformStatus;

/// Duplicates descriptor 0 so closing the returned file leaves stdin open.
pub fn duplicate_stdin() -> Result<File, PlatformStatus> {
    let fd = std::io::stdin()
        .as_fd()
        .try_clone_to_owned()
        .map_err(|err| {
            log::warn!("could not duplicate stdin: {err}");
            PlatformStatus::FileOpenFailed
        })?;
    Ok(File::from(fd))
}

pub fn close_file(file: File) -> Result<(), PlatformStatus> {
    let fd = file.into_raw_fd();
    if unsafe { libc::close(fd) } != 0 {
        log::warn!("close({fd}) failed: {}", std::io::Error::last_os_error());
        return Err(PlatformStatus::FileCloseFailed);
    }
    Ok(())
}
