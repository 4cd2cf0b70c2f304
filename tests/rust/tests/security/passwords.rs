//! Password hashing

use fitmatch_core::service::password::{hash_password, verify_password};

#[test]
fn test_hash_is_salted_phc_string() {
    let first = hash_password("correct-horse-battery").unwrap();
    let second = hash_password("correct-horse-battery").unwrap();

    assert!(first.starts_with("$argon2"));
    assert_ne!(first, second);
    assert!(verify_password("correct-horse-battery", &first));
    assert!(verify_password("correct-horse-battery", &second));
}

#[test]
fn test_wrong_or_garbage_rejected() {
    let hash = hash_password("correct-horse-battery").unwrap();

    assert!(!verify_password("Correct-horse-battery", &hash));
    assert!(!verify_password("correct-horse-battery", "not-a-phc-string"));
    assert!(!verify_password("", ""));
}
