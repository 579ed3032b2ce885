use edusoft_backend::config::JwtConfig;
use edusoft_backend::util::jwt::*;
use chrono::Utc;

fn create_test_jwt_utils() -> JwtTokenUtilsImpl {
    JwtTokenUtilsImpl::new(JwtConfig::default())
}

// Test account data
struct TestAccount {
    id: String,
    email: String,
    role: String,
}

impl TestAccount {
    fn student() -> Self {
        Self {
            id: "64b7f0c2a1b2c3d4e5f60718".to_string(),
            email: "user@example.com".to_string(),
            role: "student".to_string(),
        }
    }

    fn supervisor() -> Self {
        Self {
            id: "64b7f0c2a1b2c3d4e5f60719".to_string(),
            email: "supervisor@example.com".to_string(),
            role: "supervisor".to_string(),
        }
    }
}

#[test]
fn test_token_type_as_str() {
    assert_eq!(TokenType::Access.as_str(), "access");
    assert_eq!(TokenType::Refresh.as_str(), "refresh");
}

#[test]
fn test_access_token_carries_claims() {
    let jwt_utils = create_test_jwt_utils();
    let account = TestAccount::student();

    let token = jwt_utils
        .generate_access_token(&account.id, &account.email, &account.role)
        .expect("token generation failed");
    assert_eq!(token.split('.').count(), 3);

    let claims = jwt_utils.validate_access_token(&token).expect("validation failed");
    assert_eq!(claims.sub, account.id);
    assert_eq!(claims.email, account.email);
    assert_eq!(claims.role, account.role);
    assert_eq!(claims.token_type, "access");

    let now = Utc::now().timestamp();
    assert!(claims.iat <= now);
    assert_eq!(claims.exp - claims.iat, 1440 * 60);
}

#[test]
fn test_token_pair() {
    let jwt_utils = create_test_jwt_utils();
    let account = TestAccount::supervisor();

    let pair = jwt_utils
        .generate_token_pair(&account.id, &account.email, &account.role)
        .expect("pair generation failed");
    assert_ne!(pair.access_token, pair.refresh_token);
    assert_eq!(pair.token_type, "Bearer");
    assert_eq!(pair.expires_in, 1440 * 60);

    let refresh = jwt_utils.validate_refresh_token(&pair.refresh_token).unwrap();
    assert_eq!(refresh.role, "supervisor");
    assert_eq!(refresh.exp - refresh.iat, 10080 * 60);
}

#[test]
fn test_token_types_are_not_interchangeable() {
    let jwt_utils = create_test_jwt_utils();
    let account = TestAccount::student();
    let pair = jwt_utils
        .generate_token_pair(&account.id, &account.email, &account.role)
        .unwrap();

    match jwt_utils.validate_access_token(&pair.refresh_token) {
        Err(JwtError::InvalidTokenType { expected, actual }) => {
            assert_eq!(expected, "access");
            assert_eq!(actual, "refresh");
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(matches!(
        jwt_utils.validate_refresh_token(&pair.access_token),
        Err(JwtError::InvalidTokenType { .. })
    ));
}

#[test]
fn test_unique_token_ids() {
    let jwt_utils = create_test_jwt_utils();
    let account = TestAccount::student();
    let first = jwt_utils.generate_access_token(&account.id, &account.email, &account.role).unwrap();
    let second = jwt_utils.generate_access_token(&account.id, &account.email, &account.role).unwrap();

    let a = jwt_utils.validate_access_token(&first).unwrap();
    let b = jwt_utils.validate_access_token(&second).unwrap();
    assert_ne!(a.jti, b.jti);
}

#[test]
fn test_token_signed_with_another_secret_is_rejected() {
    let jwt_utils = create_test_jwt_utils();
    let other = JwtTokenUtilsImpl::new(JwtConfig {
        jwt_secret: "a_completely_different_secret_that_is_also_long_enough_to_pass".to_string(),
        ..JwtConfig::default()
    });
    let account = TestAccount::student();
    let token = other.generate_access_token(&account.id, &account.email, &account.role).unwrap();

    assert!(jwt_utils.validate_access_token(&token).is_err());
}

#[test]
fn test_malformed_token_is_rejected() {
    let jwt_utils = create_test_jwt_utils();
    assert!(jwt_utils.validate_access_token("not.a.jwt").is_err());
    assert!(jwt_utils.validate_access_token("").is_err());
}

#[test]
fn test_extract_token_from_header() {
    let jwt_utils = create_test_jwt_utils();

    assert_eq!(jwt_utils.extract_token_from_header("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
    assert_eq!(jwt_utils.extract_token_from_header("bearer abc.def.ghi").unwrap(), "abc.def.ghi");
    assert!(jwt_utils.extract_token_from_header("Basic dXNlcjpwYXNz").is_err());
    assert!(jwt_utils.extract_token_from_header("Bearer ").is_err());
    assert!(jwt_utils.extract_token_from_header("").is_err());
}

#[test]
fn test_out_of_range_lifetime_is_an_error() {
    let jwt_utils = JwtTokenUtilsImpl::new(JwtConfig {
        access_token_expiration: i64::MAX,
        ..JwtConfig::default()
    });
    let account = TestAccount::student();

    let result = jwt_utils.generate_access_token(&account.id, &account.email, &account.role);
    assert!(matches!(result, Err(JwtError::EncodingFailed(_))));
}
