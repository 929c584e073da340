use std::cell::UnsafeCell;
use std::fs::File;
use std::os::windows::io::{AsHandle, IntoRawHandle};

use windows_sys::Win32::Foundation::CloseHandle;
use windows_sys::Win32::System::Threading::{
    AcquireSRWLockExclusive, GetCurrentThreadId, ReleaseSRWLockExclusive, SRWLOCK, SRWLOCK_INIT,
};

use crate::common::types::PlatformStatus;
use crate::raw_mutex::RawMutex;

/// Slim reader/writer lock used in exclusive mode only.
///
/// SRW locks need no teardown and acquisition cannot fail, so the error paths of
/// [`RawMutex`] are never taken here.
pub struct SrwMutex {
    inner: Box<UnsafeCell<SRWLOCK>>,
}

unsafe impl Send for SrwMutex {}
unsafe impl Sync for SrwMutex {}

impl RawMutex for SrwMutex {
    fn new() -> Result<Self, PlatformStatus> {
        Ok(Self {
            inner: Box::new(UnsafeCell::new(SRWLOCK_INIT)),
        })
    }

    fn lock(&self) -> Result<(), PlatformStatus> {
        unsafe { AcquireSRWLockExclusive(self.inner.get()) };
        Ok(())
    }

    fn unlock(&self) -> Result<(), PlatformStatus> {
        unsafe { ReleaseSRWLockExclusive(self.inner.get()) };
        Ok(())
    }

    fn destroy(&mut self) -> Result<(), PlatformStatus> {
        Ok(())
    }

    fn current_thread() -> usize {
        unsafe { GetCurrentThreadId() as usize }
    }
}

pub fn duplicate_stdin() -> Result<File, PlatformStatus> {
    let handle = std::io::stdin()
        .as_handle()
        .try_clone_to_owned()
        .map_err(|err| {
            log::warn!("could not duplicate stdin: {err}");
            PlatformStatus::FileOpenFailed
        })?;
    Ok(File::from(handle))
}

pub fn close_file(file: File) -> Result<(), PlatformStatus> {
    let handle = file.into_raw_handle();
    if unsafe { CloseHandle(handle) } == 0 {
        log::warn!("CloseHandle failed: {}", std::io::Error::last_os_error());
        return Err(PlatformStatus::FileCloseFailed);
    }
    Ok(())
}
