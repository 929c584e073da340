//! Atomic operations emulated with one process-wide mutex.
//!
//! Every operation, whatever memory it targets, serializes on the same lock. The
//! lock is created by [`crate::platform::init`]; using any operation before that is
//! fatal.

use core::ffi::c_void;
use std::cell::UnsafeCell;

#[cfg(feature = "threads")]
use std::sync::OnceLock;

use crate::common::types::PlatformStatus;
#[cfg(feature = "threads")]
use crate::panic::{fatal, PanicReason};
#[cfg(feature = "threads")]
use crate::raw_mutex::RawMutex;
#[cfg(feature = "threads")]
use crate::PlatformMutex;

#[cfg(feature = "threads")]
static ATOMIC_OP_MUTEX: OnceLock<PlatformMutex> = OnceLock::new();

/// Creates the global lock once. Later calls are no-ops.
pub(crate) fn init_global_lock() -> Result<(), PlatformStatus> {
    #[cfg(feature = "threads")]
    {
        if ATOMIC_OP_MUTEX.get().is_some() {
            return Ok(());
        }
        let mutex = PlatformMutex::new()?;
        if ATOMIC_OP_MUTEX.set(mutex).is_err() {
            log::debug!("atomic op mutex was created concurrently");
        }
    }
    Ok(())
}

pub(crate) fn is_initialized() -> bool {
    #[cfg(feature = "threads")]
    {
        ATOMIC_OP_MUTEX.get().is_some()
    }
    #[cfg(not(feature = "threads"))]
    {
        true
    }
}

#[cfg(feature = "threads")]
struct AtomicOpGuard(&'static PlatformMutex);

#[cfg(feature = "threads")]
impl Drop for AtomicOpGuard {
    fn drop(&mut self) {
        if self.0.unlock().is_err() {
            fatal(PanicReason::SynchronizationErr);
        }
    }
}

fn with_atomic_lock<R>(op: impl FnOnce() -> R) -> R {
    #[cfg(feature = "threads")]
    let _guard = {
        let Some(mutex) = ATOMIC_OP_MUTEX.get() else {
            fatal(PanicReason::SystemInit);
        };
        if mutex.lock().is_err() {
            fatal(PanicReason::SynchronizationErr);
        }
        AtomicOpGuard(mutex)
    };
    op()
}

/// A value whose reads and writes all go through the global atomic-op lock.
pub struct EmulatedCell<T> {
    value: UnsafeCell<T>,
}

// All access to `value` happens under the global lock.
unsafe impl<T: Send> Sync for EmulatedCell<T> {}

impl<T: Copy + PartialEq> EmulatedCell<T> {
    pub const fn new(value: T) -> Self {
        Self {
            value: UnsafeCell::new(value),
        }
    }

    pub fn load(&self) -> T {
        with_atomic_lock(|| unsafe { *self.value.get() })
    }

    pub fn store(&self, value: T) {
        with_atomic_lock(|| unsafe { *self.value.get() = value })
    }

    /// Writes `new_value` if the current value equals `expected`. Returns the
    /// value seen before the write.
    pub fn compare_and_swap(&self, new_value: T, expected: T) -> T {
        with_atomic_lock(|| unsafe {
            let slot = &mut *self.value.get();
            let prior = *slot;
            if prior == expected {
                *slot = new_value;
            }
            prior
        })
    }

    pub fn into_inner(self) -> T {
        self.value.into_inner()
    }
}

impl EmulatedCell<i32> {
    pub fn increment(&self) -> i32 {
        with_atomic_lock(|| unsafe {
            let slot = &mut *self.value.get();
            *slot = slot.wrapping_add(1);
            *slot
        })
    }

    pub fn decrement(&self) -> i32 {
        with_atomic_lock(|| unsafe {
            let slot = &mut *self.value.get();
            *slot = slot.wrapping_sub(1);
            *slot
        })
    }
}

/// # Safety
///
/// `to_fill` must be valid for reads and writes, and every concurrent access to
/// it must go through this module.
pub unsafe fn compare_and_swap_ptr(
    to_fill: *mut *mut c_void,
    new_value: *mut c_void,
    to_compare: *mut c_void,
) -> *mut c_void {
    with_atomic_lock(|| {
        let prior = *to_fill;
        if prior == to_compare {
            *to_fill = new_value;
        }
        prior
    })
}

/// # Safety
///
/// Same contract as [`compare_and_swap_ptr`].
pub unsafe fn increment_raw(location: *mut i32) -> i32 {
    with_atomic_lock(|| {
        *location = (*location).wrapping_add(1);
        *location
    })
}

/// # Safety
///
/// Same contract as [`compare_and_swap_ptr`].
pub unsafe fn decrement_raw(location: *mut i32) -> i32 {
    with_atomic_lock(|| {
        *location = (*location).wrapping_sub(1);
        *location
    })
}
