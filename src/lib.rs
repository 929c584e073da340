mod common;
mod ffi;
mod logging;
mod raw_mutex;

pub mod atomic_emulator;
pub mod file_io;
pub mod panic;
pub mod platform;
pub mod recursive_lock;

#[cfg(unix)]
mod posix;
#[cfg(unix)]
pub(crate) use posix::{close_file, duplicate_stdin, PlatformMutex};

#[cfg(windows)]
mod windows_native;
#[cfg(windows)]
pub(crate) use windows_native::{close_file, duplicate_stdin, PlatformMutex};

#[cfg(not(any(unix, windows)))]
compile_error!("platutils only supports unix and Windows targets.");

pub use crate::atomic_emulator::EmulatedCell;
pub use crate::common::path::{
    is_relative, is_relative_bytes, weave, weave_bytes, weave_paths, weave_paths_strict, Woven,
    WovenBytes,
};
pub use crate::common::types::*;
pub use crate::ffi::*;
pub use crate::file_io::{current_millis, full_path, PlatformFile};
pub use crate::panic::{fatal, PanicReason};
pub use crate::recursive_lock::{RecursiveLock, RecursiveLockGuard};
