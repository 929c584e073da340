//! A mutex the owning thread may re-enter.
//!
//! The owner check on `lock` reads `owner` without holding the OS mutex. Only the
//! owning thread can ever observe its own identity there, and `owner`/`depth` are
//! only written while the OS mutex is held, so relaxed atomics are enough.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::common::types::PlatformStatus;
use crate::raw_mutex::RawMutex;
use crate::PlatformMutex;

const NO_OWNER: usize = 0;

pub struct RecursiveLock {
    raw: PlatformMutex,
    owner: AtomicUsize,
    depth: AtomicUsize,
}

impl RecursiveLock {
    pub fn new() -> Result<Self, PlatformStatus> {
        Ok(Self {
            raw: PlatformMutex::new()?,
            owner: AtomicUsize::new(NO_OWNER),
            depth: AtomicUsize::new(0),
        })
    }

    pub fn lock(&self) -> Result<(), PlatformStatus> {
        let me = PlatformMutex::current_thread();
        if self.owner.load(Ordering::Relaxed) == me {
            self.depth.fetch_add(1, Ordering::Relaxed);
            return Ok(());
        }
        self.raw.lock()?;
        self.owner.store(me, Ordering::Relaxed);
        self.depth.store(1, Ordering::Relaxed);
        Ok(())
    }

    /// Releases one level. The OS mutex is released when the depth reaches zero.
    ///
    /// Fails with `LockReleaseError` when the calling thread does not hold the lock.
    pub fn unlock(&self) -> Result<(), PlatformStatus> {
        if !self.is_held_by_current_thread() {
            log::warn!("unlock of a recursive lock not held by this thread");
            return Err(PlatformStatus::LockReleaseError);
        }
        let remaining = self.depth.load(Ordering::Relaxed) - 1;
        self.depth.store(remaining, Ordering::Relaxed);
        if remaining > 0 {
            return Ok(());
        }

        let me = self.owner.swap(NO_OWNER, Ordering::Relaxed);
        if let Err(status) = self.raw.unlock() {
            self.owner.store(me, Ordering::Relaxed);
            self.depth.store(1, Ordering::Relaxed);
            return Err(status);
        }
        Ok(())
    }

    /// Locks and returns a guard that unlocks one level when dropped.
    pub fn guard(&self) -> Result<RecursiveLockGuard<'_>, PlatformStatus> {
        self.lock()?;
        Ok(RecursiveLockGuard { lock: self })
    }

    pub fn is_held_by_current_thread(&self) -> bool {
        self.owner.load(Ordering::Relaxed) == PlatformMutex::current_thread()
    }

    /// Current recursion depth; only meaningful on the owning thread.
    pub fn recursion_count(&self) -> usize {
        self.depth.load(Ordering::Relaxed)
    }

    /// Destroys the OS mutex. A held lock is refused with `LockDestroyError`.
    ///
    /// Dropping the lock destroys it as well; this only surfaces the failure.
    pub fn destroy(&mut self) -> Result<(), PlatformStatus> {
        if self.owner.load(Ordering::Relaxed) != NO_OWNER {
            log::warn!("refusing to destroy a held recursive lock");
            return Err(PlatformStatus::LockDestroyError);
        }
        self.raw.destroy()
    }
}

pub struct RecursiveLockGuard<'a> {
    lock: &'a RecursiveLock,
}

impl Drop for RecursiveLockGuard<'_> {
    fn drop(&mut self) {
        if let Err(status) = self.lock.unlock() {
            log::error!("recursive lock guard failed to unlock: {status}");
        }
    }
}
