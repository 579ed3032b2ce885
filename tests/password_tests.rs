use edusoft_backend::util::password::{PasswordError, PasswordUtils, PasswordUtilsImpl, MIN_PASSWORD_LEN};

#[test]
fn test_hash_is_argon2id_phc_string() {
    let hash = PasswordUtilsImpl::hash_password("correct horse").expect("hashing failed");
    assert!(hash.starts_with("$argon2id$"));
    assert!(!hash.contains("correct horse"));
}

#[test]
fn test_hashes_are_salted() {
    let first = PasswordUtilsImpl::hash_password("password").unwrap();
    let second = PasswordUtilsImpl::hash_password("password").unwrap();
    assert_ne!(first, second);
}

#[test]
fn test_verify_password() {
    let hash = PasswordUtilsImpl::hash_password("s3cret-pass").unwrap();
    assert!(PasswordUtilsImpl::verify_password("s3cret-pass", &hash).unwrap());
    assert!(!PasswordUtilsImpl::verify_password("s3cret-Pass", &hash).unwrap());
    assert!(!PasswordUtilsImpl::verify_password("", &hash).unwrap());
}

#[test]
fn test_verify_against_garbage_hash() {
    let result = PasswordUtilsImpl::verify_password("password", "not-a-phc-string");
    assert!(matches!(result, Err(PasswordError::InvalidHashFormat)));
}

#[test]
fn test_unicode_password() {
    let hash = PasswordUtilsImpl::hash_password("mot de passe é ü 密码").unwrap();
    assert!(PasswordUtilsImpl::verify_password("mot de passe é ü 密码", &hash).unwrap());
}

#[test]
fn test_password_problems() {
    assert!(PasswordUtilsImpl::password_problems("abcdef").is_empty());
    assert_eq!(MIN_PASSWORD_LEN, 6);

    let short = PasswordUtilsImpl::password_problems("abc");
    assert_eq!(short, vec!["Password must be at least 6 characters long".to_string()]);

    let blank = PasswordUtilsImpl::password_problems("        ");
    assert_eq!(blank, vec!["Password cannot be blank".to_string()]);
}

#[test]
fn test_verify_legacy_bcrypt_hash() {
    let hash = bcrypt::hash("password", 4).unwrap();
    assert!(hash.starts_with("$2b$"));
    assert!(PasswordUtilsImpl::verify_password("password", &hash).unwrap());
    assert!(!PasswordUtilsImpl::verify_password("wrong-password", &hash).unwrap());

    // bcryptjs writes the $2a$ variant
    let legacy = hash.replacen("$2b$", "$2a$", 1);
    assert!(PasswordUtilsImpl::verify_password("password", &legacy).unwrap());
}

#[test]
fn test_needs_rehash() {
    let argon = PasswordUtilsImpl::hash_password("password").unwrap();
    assert!(!PasswordUtilsImpl::needs_rehash(&argon));
    assert!(PasswordUtilsImpl::needs_rehash("$2a$10$abcdefghijklmnopqrstuv"));
    assert!(PasswordUtilsImpl::needs_rehash("$2y$10$abcdefghijklmnopqrstuv"));
}

#[test]
fn test_malformed_bcrypt_hash() {
    let result = PasswordUtilsImpl::verify_password("password", "$2a$10$short");
    assert!(matches!(result, Err(PasswordError::InvalidHashFormat)));
}
