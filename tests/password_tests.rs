use enrollment_backend::util::password::*;
use proptest::prelude::*;

#[test]
fn test_hash_password_success() {
    let password = "test_password_123";
    let hash = PasswordUtilsImpl::hash_password(password).unwrap();

    assert_ne!(hash, password);
    assert!(hash.starts_with("$argon2id$v=19$"));
    assert!(hash.contains(&format!("m={},t={},p={}", ARGON2_MEMORY_KIB, ARGON2_ITERATIONS, ARGON2_PARALLELISM)));

    let parts: Vec<&str> = hash.split('$').collect();
    assert!(parts.len() >= 5, "Hash should have at least 5 parts separated by $");
}

#[test]
fn test_hash_password_different_results() {
    let password = "same_password";
    let hash1 = PasswordUtilsImpl::hash_password(password).unwrap();
    let hash2 = PasswordUtilsImpl::hash_password(password).unwrap();

    // Fresh salt per hash
    assert_ne!(hash1, hash2);
    assert!(PasswordUtilsImpl::verify_password(password, &hash1).unwrap());
    assert!(PasswordUtilsImpl::verify_password(password, &hash2).unwrap());
}

#[test]
fn test_verify_password_correct_and_incorrect() {
    let hash = PasswordUtilsImpl::hash_password("pw").unwrap();

    assert!(PasswordUtilsImpl::verify_password("pw", &hash).unwrap());
    for candidate in ["PW", "pw ", " pw", "p", "", "pwpw"] {
        assert!(
            !PasswordUtilsImpl::verify_password(candidate, &hash).unwrap(),
            "{:?} should not verify",
            candidate
        );
    }
}

#[test]
fn test_verify_password_unicode() {
    let password = "пароль_密码_🔐";
    let hash = PasswordUtilsImpl::hash_password(password).unwrap();
    assert!(PasswordUtilsImpl::verify_password(password, &hash).unwrap());
    assert!(!PasswordUtilsImpl::verify_password("пароль_密码", &hash).unwrap());
}

#[test]
fn test_verify_password_invalid_hash_format() {
    for invalid_hash in ["", "invalid_hash_format", "plaintext_password", "$argon2id$invalid$hash$format"] {
        let result = PasswordUtilsImpl::verify_password("test_password", invalid_hash);
        assert!(
            matches!(result, Err(PasswordError::InvalidHashFormat) | Err(PasswordError::VerificationFailed(_))),
            "Should fail for invalid hash: {}",
            invalid_hash
        );
    }
}

#[test]
fn test_password_error_display() {
    assert_eq!(PasswordError::InvalidHashFormat.to_string(), "Invalid password hash format");
    assert_eq!(
        PasswordError::HashingFailed("boom".to_string()).to_string(),
        "Failed to hash password: boom"
    );
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 8,
        ..ProptestConfig::default()
    })]

    /// For any password the hash differs from the plaintext, verifies the
    /// original and rejects any other string.
    #[test]
    fn hash_verifies_only_the_original(password in "\\PC{1,64}", other in "\\PC{1,64}") {
        let hash = PasswordUtilsImpl::hash_password(&password).unwrap();
        prop_assert_ne!(&hash, &password);
        prop_assert!(PasswordUtilsImpl::verify_password(&password, &hash).unwrap());
        prop_assume!(other != password);
        prop_assert!(!PasswordUtilsImpl::verify_password(&other, &hash).unwrap());
    }
}
