//! Tests for Resource acquire/release contract

use dining_sim_core_rs::{Resource, ResourceError};

#[test]
fn test_new_resource_is_free() {
    let r = Resource::new(4);
    assert!(r.is_free());
    assert_eq!(r.index(), 4);
}

#[test]
fn test_acquire_then_release() {
    let mut r = Resource::new(0);

    r.acquire().unwrap();
    assert!(!r.is_free());

    r.release().unwrap();
    assert!(r.is_free());

    // Reusable after release
    r.acquire().unwrap();
    assert!(!r.is_free());
}

#[test]
fn test_double_acquire_fails_without_state_change() {
    let mut r = Resource::new(2);
    r.acquire().unwrap();

    assert_eq!(r.acquire(), Err(ResourceError::AlreadyHeld { index: 2 }));
    assert!(!r.is_free());
}

#[test]
fn test_release_of_free_resource_fails() {
    let mut r = Resource::new(1);

    assert_eq!(r.release(), Err(ResourceError::NotHeld { index: 1 }));
    assert!(r.is_free());
}
