use core::ffi::{c_char, c_void};
use std::ptr;

use crate::atomic_emulator;
use crate::common::path;
use crate::common::types::*;
use crate::file_io::{self, PlatformFile};
use crate::logging::{self, PlatformLogCallback};
use crate::panic::{fatal, fatal_message, PanicReason};
use crate::platform;
use crate::recursive_lock::RecursiveLock;

pub struct PlatformMutexHandle {
    inner: RecursiveLock,
}

pub struct PlatformFileHandle {
    inner: PlatformFile,
}

/// Borrows the bytes of a caller-owned view.
///
/// A null view is `None`; a view with a null pointer must have length zero.
unsafe fn view_bytes<'a>(view: *const PlatformStringView) -> Result<Option<&'a [u8]>, PlatformStatus> {
    let Some(view) = view.as_ref() else {
        return Ok(None);
    };
    if view.ptr.is_null() {
        return if view.len == 0 {
            Ok(Some(&[][..]))
        } else {
            Err(PlatformStatus::InvalidArgument)
        };
    }
    Ok(Some(std::slice::from_raw_parts(view.ptr as *const u8, view.len)))
}

/// Like [`view_bytes`], for entry points that hand the path to `std::fs`.
unsafe fn view_str<'a>(view: *const PlatformStringView) -> Result<Option<&'a str>, PlatformStatus> {
    match view_bytes(view)? {
        Some(bytes) => std::str::from_utf8(bytes)
            .map(Some)
            .map_err(|_| PlatformStatus::EncodingError),
        None => Ok(None),
    }
}

/// Copies `value` into a NUL-terminated `malloc` buffer released by `platform_free_string`.
fn owned_view(value: &[u8]) -> Result<PlatformStringView, PlatformStatus> {
    let len = value.len();
    let buf = unsafe { libc::malloc(len + 1) } as *mut u8;
    if buf.is_null() {
        return Err(PlatformStatus::IoError);
    }
    unsafe {
        ptr::copy_nonoverlapping(value.as_ptr(), buf, len);
        *buf.add(len) = 0;
    }
    Ok(PlatformStringView {
        ptr: buf as *const c_char,
        len,
    })
}

fn write_out<T>(out: *mut T, value: T) -> PlatformStatus {
    match unsafe { out.as_mut() } {
        Some(slot) => {
            *slot = value;
            PlatformStatus::Ok
        }
        None => PlatformStatus::InvalidArgument,
    }
}

fn write_out_string(out: *mut PlatformStringView, value: &[u8]) -> PlatformStatus {
    if out.is_null() {
        return PlatformStatus::InvalidArgument;
    }
    match owned_view(value) {
        Ok(view) => write_out(out, view),
        Err(status) => status,
    }
}

fn status_of(result: Result<(), PlatformStatus>) -> PlatformStatus {
    match result {
        Ok(()) => PlatformStatus::Ok,
        Err(status) => status,
    }
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// Creates the global atomic-op lock. Must precede every atomic entry point.
#[no_mangle]
pub extern "C" fn platform_init(config: *const PlatformConfig) -> PlatformStatus {
    let config = unsafe { config.as_ref() };
    match platform::init(config) {
        Ok(()) => PlatformStatus::Ok,
        Err(PlatformStatus::InvalidArgument) => PlatformStatus::InvalidArgument,
        Err(_) => fatal(PanicReason::SystemInit),
    }
}

#[no_mangle]
pub extern "C" fn platform_term() {
    platform::term();
}

#[no_mangle]
pub extern "C" fn platform_panic(reason: i32) -> ! {
    match PanicReason::from_i32(reason) {
        Some(reason) => fatal(reason),
        None => fatal_message("Unknown reason"),
    }
}

// ---------------------------------------------------------------------------
// Recursive mutexes
// ---------------------------------------------------------------------------

/// Returns null if the mutex cannot be created, and always in builds without
/// the `threads` feature.
#[no_mangle]
pub extern "C" fn platform_make_mutex() -> *mut PlatformMutexHandle {
    if cfg!(not(feature = "threads")) {
        return ptr::null_mut();
    }
    match RecursiveLock::new() {
        Ok(inner) => Box::into_raw(Box::new(PlatformMutexHandle { inner })),
        Err(status) => {
            log::error!("platform_make_mutex failed: {status}");
            ptr::null_mut()
        }
    }
}

/// A held mutex is not freed; its handle is leaked and `LockDestroyError` returned.
#[no_mangle]
pub extern "C" fn platform_close_mutex(handle: *mut PlatformMutexHandle) -> PlatformStatus {
    if handle.is_null() {
        return PlatformStatus::Ok;
    }
    let mut handle = unsafe { Box::from_raw(handle) };
    match handle.inner.destroy() {
        Ok(()) => PlatformStatus::Ok,
        Err(status) => {
            std::mem::forget(handle);
            status
        }
    }
}

#[no_mangle]
pub extern "C" fn platform_lock_mutex(handle: *mut PlatformMutexHandle) -> PlatformStatus {
    match unsafe { handle.as_ref() } {
        Some(h) => status_of(h.inner.lock()),
        None => PlatformStatus::Ok,
    }
}

#[no_mangle]
pub extern "C" fn platform_unlock_mutex(handle: *mut PlatformMutexHandle) -> PlatformStatus {
    match unsafe { handle.as_ref() } {
        Some(h) => status_of(h.inner.unlock()),
        None => PlatformStatus::Ok,
    }
}

// ---------------------------------------------------------------------------
// Emulated atomics
// ---------------------------------------------------------------------------

#[no_mangle]
pub extern "C" fn platform_compare_and_swap(
    to_fill: *mut *mut c_void,
    new_value: *mut c_void,
    to_compare: *mut c_void,
) -> *mut c_void {
    if to_fill.is_null() {
        log::error!("platform_compare_and_swap called with a null target");
        return ptr::null_mut();
    }
    unsafe { atomic_emulator::compare_and_swap_ptr(to_fill, new_value, to_compare) }
}

#[no_mangle]
pub extern "C" fn platform_atomic_increment(location: *mut i32) -> i32 {
    if location.is_null() {
        log::error!("platform_atomic_increment called with a null location");
        return 0;
    }
    unsafe { atomic_emulator::increment_raw(location) }
}

#[no_mangle]
pub extern "C" fn platform_atomic_decrement(location: *mut i32) -> i32 {
    if location.is_null() {
        log::error!("platform_atomic_decrement called with a null location");
        return 0;
    }
    unsafe { atomic_emulator::decrement_raw(location) }
}

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

/// `base_path` may be null. Paths are raw bytes in any encoding. On success
/// `out_path` owns a new string.
#[no_mangle]
pub extern "C" fn platform_weave_paths(
    base_path: *const PlatformStringView,
    relative_path: *const PlatformStringView,
    out_path: *mut PlatformStringView,
) -> PlatformStatus {
    let base = match unsafe { view_bytes(base_path) } {
        Ok(base) => base,
        Err(status) => return status,
    };
    let relative = match unsafe { view_bytes(relative_path) } {
        Ok(Some(relative)) => relative,
        Ok(None) => return PlatformStatus::InvalidArgument,
        Err(status) => return status,
    };

    let woven = path::weave_bytes(base, relative);
    if woven.base_exhausted && platform::flags() & PLATFORM_FLAG_STRICT_WEAVE != 0 {
        return PlatformStatus::BaseTooShallow;
    }
    write_out_string(out_path, &woven.path)
}

#[no_mangle]
pub extern "C" fn platform_is_relative(path: *const PlatformStringView) -> bool {
    match unsafe { view_bytes(path) } {
        Ok(Some(path)) => path::is_relative_bytes(path),
        _ => false,
    }
}

#[no_mangle]
pub extern "C" fn platform_get_full_path(
    path: *const PlatformStringView,
    out_path: *mut PlatformStringView,
) -> PlatformStatus {
    let path = match unsafe { view_str(path) } {
        Ok(Some(path)) => path,
        Ok(None) => return PlatformStatus::InvalidArgument,
        Err(status) => return status,
    };
    match file_io::full_path(path) {
        Ok(resolved) => write_out_string(out_path, resolved.as_bytes()),
        Err(status) => status,
    }
}

#[no_mangle]
pub extern "C" fn platform_free_string(value: PlatformStringView) {
    if value.ptr.is_null() {
        return;
    }
    unsafe {
        libc::free(value.ptr as *mut libc::c_void);
    }
}

// ---------------------------------------------------------------------------
// Files and clock
// ---------------------------------------------------------------------------

fn into_file_handle(result: Result<PlatformFile, PlatformStatus>) -> *mut PlatformFileHandle {
    match result {
        Ok(inner) => Box::into_raw(Box::new(PlatformFileHandle { inner })),
        Err(_) => ptr::null_mut(),
    }
}

/// Returns null when the file cannot be opened.
#[no_mangle]
pub extern "C" fn platform_open_file(path: *const PlatformStringView) -> *mut PlatformFileHandle {
    match unsafe { view_str(path) } {
        Ok(Some(path)) => into_file_handle(PlatformFile::open(path)),
        _ => ptr::null_mut(),
    }
}

#[no_mangle]
pub extern "C" fn platform_open_stdin() -> *mut PlatformFileHandle {
    into_file_handle(PlatformFile::open_stdin())
}

#[no_mangle]
pub extern "C" fn platform_close_file(handle: *mut PlatformFileHandle) -> PlatformStatus {
    if handle.is_null() {
        return PlatformStatus::InvalidHandle;
    }
    let handle = unsafe { Box::from_raw(handle) };
    status_of(handle.inner.close())
}

#[no_mangle]
pub extern "C" fn platform_file_size(
    handle: *mut PlatformFileHandle,
    out_size: *mut u64,
) -> PlatformStatus {
    match unsafe { handle.as_mut() } {
        Some(h) => match h.inner.size() {
            Ok(size) => write_out(out_size, size),
            Err(status) => status,
        },
        None => PlatformStatus::InvalidHandle,
    }
}

#[no_mangle]
pub extern "C" fn platform_cur_file_pos(
    handle: *mut PlatformFileHandle,
    out_pos: *mut u64,
) -> PlatformStatus {
    match unsafe { handle.as_mut() } {
        Some(h) => match h.inner.current_position() {
            Ok(pos) => write_out(out_pos, pos),
            Err(status) => status,
        },
        None => PlatformStatus::InvalidHandle,
    }
}

#[no_mangle]
pub extern "C" fn platform_read_file_buffer(
    handle: *mut PlatformFileHandle,
    to_fill: *mut u8,
    to_read: usize,
    out_read: *mut usize,
) -> PlatformStatus {
    let Some(h) = (unsafe { handle.as_mut() }) else {
        return PlatformStatus::InvalidHandle;
    };
    if to_fill.is_null() && to_read != 0 {
        return PlatformStatus::InvalidArgument;
    }
    let buf: &mut [u8] = if to_read == 0 {
        &mut []
    } else {
        unsafe { std::slice::from_raw_parts_mut(to_fill, to_read) }
    };
    match h.inner.read_buffer(buf) {
        Ok(read) => write_out(out_read, read),
        Err(status) => status,
    }
}

#[no_mangle]
pub extern "C" fn platform_reset_file(handle: *mut PlatformFileHandle) -> PlatformStatus {
    match unsafe { handle.as_mut() } {
        Some(h) => status_of(h.inner.reset()),
        None => PlatformStatus::InvalidHandle,
    }
}

#[no_mangle]
pub extern "C" fn platform_current_millis() -> u64 {
    file_io::current_millis()
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[no_mangle]
pub extern "C" fn platform_log_set_stderr(level: PlatformLogLevel) -> PlatformStatus {
    logging::log_set_stderr(level)
}

#[no_mangle]
pub extern "C" fn platform_log_set_callback(
    callback: PlatformLogCallback,
    user_data: *mut c_void,
    level: PlatformLogLevel,
) -> PlatformStatus {
    logging::log_set_callback(callback, user_data, level)
}

#[no_mangle]
pub extern "C" fn platform_log_set_level(level: PlatformLogLevel) -> PlatformStatus {
    logging::log_set_level(level)
}

#[no_mangle]
pub extern "C" fn platform_log_disable() -> PlatformStatus {
    logging::log_disable()
}
