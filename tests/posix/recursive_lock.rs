use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use platutils::*;

struct SharedMutex(*mut PlatformMutexHandle);

unsafe impl Send for SharedMutex {}
unsafe impl Sync for SharedMutex {}

impl SharedMutex {
    fn new() -> Self {
        let handle = platform_make_mutex();
        assert!(!handle.is_null());
        Self(handle)
    }
}

impl Drop for SharedMutex {
    fn drop(&mut self) {
        assert_eq!(platform_close_mutex(self.0), PlatformStatus::Ok);
    }
}

#[test]
fn null_handle_is_a_no_op() {
    let null = std::ptr::null_mut();
    assert_eq!(platform_lock_mutex(null), PlatformStatus::Ok);
    assert_eq!(platform_unlock_mutex(null), PlatformStatus::Ok);
    assert_eq!(platform_close_mutex(null), PlatformStatus::Ok);
}

#[test]
fn nested_lock_does_not_block_owner() {
    let mutex = SharedMutex::new();
    for _ in 0..4 {
        assert_eq!(platform_lock_mutex(mutex.0), PlatformStatus::Ok);
    }
    for _ in 0..4 {
        assert_eq!(platform_unlock_mutex(mutex.0), PlatformStatus::Ok);
    }
}

#[test]
fn released_only_after_matching_unlocks() {
    let mutex = Arc::new(SharedMutex::new());
    assert_eq!(platform_lock_mutex(mutex.0), PlatformStatus::Ok);
    assert_eq!(platform_lock_mutex(mutex.0), PlatformStatus::Ok);

    let acquired = Arc::new(AtomicBool::new(false));
    let (tx, rx) = mpsc::channel();
    let worker = {
        let mutex = Arc::clone(&mutex);
        let acquired = Arc::clone(&acquired);
        std::thread::spawn(move || {
            tx.send(()).unwrap();
            assert_eq!(platform_lock_mutex(mutex.0), PlatformStatus::Ok);
            acquired.store(true, Ordering::SeqCst);
            assert_eq!(platform_unlock_mutex(mutex.0), PlatformStatus::Ok);
        })
    };

    rx.recv().unwrap();
    std::thread::sleep(Duration::from_millis(50));
    assert!(!acquired.load(Ordering::SeqCst));

    assert_eq!(platform_unlock_mutex(mutex.0), PlatformStatus::Ok);
    std::thread::sleep(Duration::from_millis(50));
    assert!(!acquired.load(Ordering::SeqCst));

    assert_eq!(platform_unlock_mutex(mutex.0), PlatformStatus::Ok);
    worker.join().unwrap();
    assert!(acquired.load(Ordering::SeqCst));
}

#[test]
fn critical_sections_do_not_overlap() {
    let mutex = Arc::new(SharedMutex::new());
    let inside = Arc::new(AtomicUsize::new(0));
    let workers: Vec<_> = (0..4)
        .map(|_| {
            let mutex = Arc::clone(&mutex);
            let inside = Arc::clone(&inside);
            std::thread::spawn(move || {
                for _ in 0..200 {
                    assert_eq!(platform_lock_mutex(mutex.0), PlatformStatus::Ok);
                    assert_eq!(platform_lock_mutex(mutex.0), PlatformStatus::Ok);
                    assert_eq!(inside.fetch_add(1, Ordering::SeqCst), 0);
                    inside.fetch_sub(1, Ordering::SeqCst);
                    assert_eq!(platform_unlock_mutex(mutex.0), PlatformStatus::Ok);
                    assert_eq!(platform_unlock_mutex(mutex.0), PlatformStatus::Ok);
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }
}

#[test]
fn closing_a_held_mutex_is_refused() {
    let handle = platform_make_mutex();
    assert_eq!(platform_lock_mutex(handle), PlatformStatus::Ok);
    assert_eq!(platform_close_mutex(handle), PlatformStatus::LockDestroyError);
}

#[test]
fn rust_api_guard_nests() {
    let lock = RecursiveLock::new().unwrap();
    let outer = lock.guard().unwrap();
    let inner = lock.guard().unwrap();
    assert_eq!(lock.recursion_count(), 2);
    drop(inner);
    assert!(lock.is_held_by_current_thread());
    drop(outer);
    assert!(!lock.is_held_by_current_thread());
}
