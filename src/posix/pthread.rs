use std::cell::UnsafeCell;

use crate::common::types::PlatformStatus;
use crate::raw_mutex::RawMutex;

pub struct PthreadMutex {
    inner: Box<UnsafeCell<libc::pthread_mutex_t>>,
    initialized: bool,
}

// The pthread mutex is designed to be shared between threads; the box keeps its
// address fixed after `pthread_mutex_init`.
unsafe impl Send for PthreadMutex {}
unsafe impl Sync for PthreadMutex {}

impl RawMutex for PthreadMutex {
    fn new() -> Result<Self, PlatformStatus> {
        let inner = Box::new(UnsafeCell::new(libc::PTHREAD_MUTEX_INITIALIZER));
        let rc = unsafe { libc::pthread_mutex_init(inner.get(), std::ptr::null()) };
        if rc != 0 {
            log::error!("pthread_mutex_init failed: errno {rc}");
            return Err(PlatformStatus::LockCreateError);
        }
        Ok(Self {
            inner,
            initialized: true,
        })
    }

    fn lock(&self) -> Result<(), PlatformStatus> {
        let rc = unsafe { libc::pthread_mutex_lock(self.inner.get()) };
        if rc != 0 {
            log::warn!("pthread_mutex_lock failed: errno {rc}");
            return Err(PlatformStatus::LockAcquireError);
        }
        Ok(())
    }

    fn unlock(&self) -> Result<(), PlatformStatus> {
        let rc = unsafe { libc::pthread_mutex_unlock(self.inner.get()) };
        if rc != 0 {
            log::warn!("pthread_mutex_unlock failed: errno {rc}");
            return Err(PlatformStatus::LockReleaseError);
        }
        Ok(())
    }

    fn destroy(&mut self) -> Result<(), PlatformStatus> {
        if !self.initialized {
            return Ok(());
        }
        let rc = unsafe { libc::pthread_mutex_destroy(self.inner.get()) };
        if rc != 0 {
            log::warn!("pthread_mutex_destroy failed: errno {rc}");
            return Err(PlatformStatus::LockDestroyError);
        }
        self.initialized = false;
        Ok(())
    }

    fn current_thread() -> usize {
        unsafe { libc::pthread_self() as usize }
    }
}

impl Drop for PthreadMutex {
    fn drop(&mut self) {
        let _ = self.destroy();
    }
}
