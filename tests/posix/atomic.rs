use std::ffi::c_void;
use std::sync::Arc;

use platutils::*;

fn setup() {
    assert_eq!(platform_init(std::ptr::null()), PlatformStatus::Ok);
}

#[test]
fn init_is_idempotent() {
    setup();
    setup();
    assert!(platform::is_initialized());
    platform_term();
}

#[test]
fn undersized_config_is_rejected() {
    let config = PlatformConfig {
        size: 4,
        ..PlatformConfig::default()
    };
    assert_eq!(platform_init(&config), PlatformStatus::InvalidArgument);
}

#[test]
fn cas_swaps_only_on_match() {
    setup();
    let mut a = 0u32;
    let mut b = 0u32;
    let pa = &mut a as *mut u32 as *mut c_void;
    let pb = &mut b as *mut u32 as *mut c_void;

    let mut slot: *mut c_void = std::ptr::null_mut();
    assert_eq!(platform_compare_and_swap(&mut slot, pa, pb), std::ptr::null_mut());
    assert_eq!(slot, std::ptr::null_mut());

    assert_eq!(
        platform_compare_and_swap(&mut slot, pa, std::ptr::null_mut()),
        std::ptr::null_mut()
    );
    assert_eq!(slot, pa);

    assert_eq!(platform_compare_and_swap(&mut slot, pb, pa), pa);
    assert_eq!(slot, pb);
}

#[test]
fn increment_and_decrement_through_ffi() {
    setup();
    let mut value = 10i32;
    assert_eq!(platform_atomic_increment(&mut value), 11);
    assert_eq!(platform_atomic_decrement(&mut value), 10);
    assert_eq!(platform_atomic_decrement(&mut value), 9);
    assert_eq!(value, 9);
}

#[test]
fn contended_cas_claims_each_slot_once() {
    setup();
    let cell = Arc::new(EmulatedCell::new(0usize));
    let workers: Vec<_> = (0..8)
        .map(|_| {
            let cell = Arc::clone(&cell);
            std::thread::spawn(move || {
                let mut wins = 0;
                loop {
                    let seen = cell.load();
                    if seen >= 4000 {
                        break;
                    }
                    if cell.compare_and_swap(seen + 1, seen) == seen {
                        wins += 1;
                    }
                }
                wins
            })
        })
        .collect();
    let total: usize = workers.into_iter().map(|w| w.join().unwrap()).sum();
    assert_eq!(total, 4000);
    assert_eq!(cell.load(), 4000);
}
