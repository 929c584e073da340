//! Process-wide platform lifecycle.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::atomic_emulator;
use crate::common::types::{
    PlatformConfig, PlatformLogLevel, PlatformStatus, PLATFORM_FLAG_LOG_STDERR,
};
use crate::logging;

static FLAGS: AtomicU32 = AtomicU32::new(0);

/// Must run before any emulated atomic operation. Safe to call repeatedly; the
/// global lock is created only once and `config` flags are refreshed each time.
pub fn init(config: Option<&PlatformConfig>) -> Result<(), PlatformStatus> {
    let flags = match config {
        Some(config) => {
            if (config.size as usize) < core::mem::size_of::<PlatformConfig>() {
                return Err(PlatformStatus::InvalidArgument);
            }
            config.flags
        }
        None => 0,
    };
    FLAGS.store(flags, Ordering::Relaxed);

    if flags & PLATFORM_FLAG_LOG_STDERR != 0 {
        let status = logging::log_set_stderr(PlatformLogLevel::Warn);
        if status != PlatformStatus::Ok {
            log::debug!("stderr logging not installed: {status}");
        }
    }

    atomic_emulator::init_global_lock()?;
    log::debug!("platform initialized (flags {flags:#x})");
    Ok(())
}

/// Nothing to release; the global atomic lock lives for the whole process.
pub fn term() {
    log::debug!("platform terminated");
}

pub fn is_initialized() -> bool {
    atomic_emulator::is_initialized()
}

pub(crate) fn flags() -> u32 {
    FLAGS.load(Ordering::Relaxed)
}
