use crate::config::settings::{DuplicateKeyPolicy, TokenFormat, TokenKeyConfig};
use crate::errors::TokenServiceError;
use crate::helpers::time::now_u64;
use crate::storage::{MemoryStorage, TokenStorage};
use crate::tests::common::{browser_tokens, outside_browser};
use crate::tokens::validators::{self, tests::sample_jwt};
use crate::tokens::TokenService;

#[test]
fn registered_key_round_trips_through_storage() {
    let storage = MemoryStorage::new();
    let tokens = browser_tokens(&storage);
    tokens.add_token_key("tokenKeyTest", |_| true).unwrap();

    tokens.set_token("tokenKeyTest", "token_value_test").unwrap();

    assert_eq!(
        tokens.get_token("tokenKeyTest").unwrap().as_deref(),
        Some("token_value_test")
    );
    assert!(tokens.is_valid_token("tokenKeyTest"));
    assert_eq!(storage.get_item("tokenKeyTest").unwrap().as_deref(), Some("token_value_test"));
}

#[test]
fn set_token_overwrites_previous_value() {
    let storage = MemoryStorage::new();
    let tokens = browser_tokens(&storage);
    tokens.add_token_key("k", |_| true).unwrap();

    tokens.set_token("k", "v1").unwrap();
    tokens.set_token("k", "v2").unwrap();

    assert_eq!(tokens.get_token("k").unwrap().as_deref(), Some("v2"));
}

#[test]
fn rejected_token_leaves_storage_unchanged() {
    let storage = MemoryStorage::new();
    let tokens = browser_tokens(&storage);
    tokens
        .add_token_key("myCustomToken", |t| t.starts_with("custom_"))
        .unwrap();

    assert_eq!(
        tokens.set_token("myCustomToken", "plain"),
        Err(TokenServiceError::Validation("myCustomToken".into()))
    );
    assert!(storage.is_empty());

    tokens.set_token("myCustomToken", "custom_1").unwrap();
    assert!(tokens.set_token("myCustomToken", "other").is_err());
    assert_eq!(tokens.get_token("myCustomToken").unwrap().as_deref(), Some("custom_1"));
}

#[test]
fn unregistered_key_cannot_be_set() {
    let storage = MemoryStorage::new();
    let tokens = browser_tokens(&storage);

    let err = tokens.set_token("tokenKey", "tokenValue").unwrap_err();
    assert_eq!(err, TokenServiceError::UnregisteredKey("tokenKey".into()));
    assert_eq!(err.to_string(), "Token key 'tokenKey' is not registered.");
    assert!(storage.is_empty());
}

#[test]
fn storage_operations_fail_outside_browser() {
    let storage = MemoryStorage::with_items([("tokenKey", "stored")]);
    let tokens = TokenService::new(storage.clone()).with_environment(outside_browser);
    tokens.add_token_key("tokenKey", |_| true).unwrap();

    assert_eq!(tokens.set_token("tokenKey", "tokenValue"), Err(TokenServiceError::Environment));
    assert_eq!(tokens.set_token("unknown", "tokenValue"), Err(TokenServiceError::Environment));
    assert_eq!(tokens.get_token("tokenKey"), Err(TokenServiceError::Environment));
    assert_eq!(tokens.remove_token("tokenKey"), Err(TokenServiceError::Environment));
    assert_eq!(
        TokenServiceError::Environment.to_string(),
        "This method can only be used in the browser environment"
    );

    // nothing reached storage
    assert_eq!(storage.get_item("tokenKey").unwrap().as_deref(), Some("stored"));
}

#[test]
fn validity_check_outside_browser() {
    let storage = MemoryStorage::with_items([("k", "v")]);
    let tokens = TokenService::new(storage).with_environment(outside_browser);
    tokens.add_token_key("k", |_| true).unwrap();

    assert!(!tokens.is_valid_token("k"));
    assert_eq!(tokens.check_token("k"), Err(TokenServiceError::Environment));
}

#[test]
fn default_service_uses_real_browser_check() {
    let tokens = TokenService::browser();
    tokens.add_token_key("k", |_| true).unwrap();

    #[cfg(not(target_arch = "wasm32"))]
    assert_eq!(tokens.set_token("k", "v"), Err(TokenServiceError::Environment));
}

#[test]
fn get_token_ignores_registration() {
    let storage = MemoryStorage::with_items([("legacy", "value")]);
    let tokens = browser_tokens(&storage);

    assert_eq!(tokens.get_token("legacy").unwrap().as_deref(), Some("value"));
    assert_eq!(tokens.get_token("missing").unwrap(), None);
}

#[test]
fn is_valid_token_needs_value_and_validator() {
    let storage = MemoryStorage::with_items([("orphan", "value"), ("blank", "")]);
    let tokens = browser_tokens(&storage);
    tokens.add_token_key("registered", |_| true).unwrap();
    tokens.add_token_key("blank", |_| true).unwrap();

    // no stored value
    assert!(!tokens.is_valid_token("registered"));
    // stored value, no validator
    assert!(!tokens.is_valid_token("orphan"));
    // stored empty string counts as nothing
    assert!(!tokens.is_valid_token("blank"));
    assert_eq!(tokens.check_token("orphan"), Ok(false));
}

#[test]
fn is_valid_token_uses_current_validator() {
    let storage = MemoryStorage::new();
    let tokens = browser_tokens(&storage);
    tokens.add_token_key("k", |_| true).unwrap();
    tokens.set_token("k", "short").unwrap();
    assert!(tokens.is_valid_token("k"));

    tokens.add_token_key("k", |t| t.len() > 10).unwrap();
    assert!(!tokens.is_valid_token("k"));
}

#[test]
fn remove_token_is_idempotent() {
    let storage = MemoryStorage::new();
    let tokens = browser_tokens(&storage);
    tokens.add_token_key("k", |_| true).unwrap();
    tokens.set_token("k", "v").unwrap();

    tokens.remove_token("k").unwrap();
    assert_eq!(tokens.get_token("k").unwrap(), None);
    tokens.remove_token("k").unwrap();
    assert_eq!(tokens.get_token("k").unwrap(), None);

    // unregistered keys can be removed too
    tokens.remove_token("never-registered").unwrap();
}

#[test]
fn overwrite_policy_replaces_validator() {
    let storage = MemoryStorage::new();
    let tokens = browser_tokens(&storage);
    tokens.add_token_key("k", |t| t == "a").unwrap();
    tokens.add_token_key("k", |t| t == "b").unwrap();

    assert!(tokens.set_token("k", "a").is_err());
    tokens.set_token("k", "b").unwrap();
    assert_eq!(tokens.registered_keys(), vec!["k".to_string()]);
}

#[test]
fn reject_policy_keeps_first_validator() {
    let storage = MemoryStorage::new();
    let tokens = browser_tokens(&storage).with_duplicate_keys(DuplicateKeyPolicy::Reject);
    tokens.add_token_key("k", |t| t == "a").unwrap();

    assert_eq!(
        tokens.add_token_key("k", |t| t == "b"),
        Err(TokenServiceError::DuplicateKey("k".into()))
    );
    tokens.set_token("k", "a").unwrap();
    assert!(tokens.set_token("k", "b").is_err());
}

#[test]
fn services_sharing_storage_collide() {
    let storage = MemoryStorage::new();
    let first = browser_tokens(&storage);
    let second = browser_tokens(&storage);
    first.add_token_key("session", |_| true).unwrap();
    second.add_token_key("session", |_| true).unwrap();

    first.set_token("session", "from-first").unwrap();
    second.set_token("session", "from-second").unwrap();

    assert_eq!(first.get_token("session").unwrap().as_deref(), Some("from-second"));
}

#[test]
fn validate_does_not_touch_storage_or_environment() {
    let storage = MemoryStorage::new();
    let tokens = TokenService::new(storage.clone()).with_environment(outside_browser);
    tokens
        .add_token_key_validator("api_key", validators::prefix("sk_"))
        .unwrap();

    assert_eq!(tokens.validate("api_key", "sk_live"), Ok(()));
    assert_eq!(
        tokens.validate("api_key", "pk_live"),
        Err(TokenServiceError::Validation("api_key".into()))
    );
    assert_eq!(
        tokens.validate("other", "x"),
        Err(TokenServiceError::UnregisteredKey("other".into()))
    );
    assert!(storage.is_empty());
}

#[test]
fn configured_formats_are_registered() {
    let storage = MemoryStorage::new();
    let tokens = browser_tokens(&storage);
    tokens
        .register_formats(&[
            TokenKeyConfig {
                name: "access_token".into(),
                format: TokenFormat::Jwt { require_unexpired: true },
            },
            TokenKeyConfig {
                name: "otp".into(),
                format: TokenFormat::Pattern { pattern: "[0-9]{6}".into() },
            },
        ])
        .unwrap();

    assert!(tokens.has_token_key("access_token"));
    assert_eq!(tokens.registered_keys(), vec!["access_token".to_string(), "otp".to_string()]);

    tokens
        .set_token("access_token", &sample_jwt(Some(now_u64() + 300)))
        .unwrap();
    assert!(tokens.is_valid_token("access_token"));
    assert!(tokens
        .set_token("access_token", &sample_jwt(Some(now_u64() - 1)))
        .is_err());

    tokens.set_token("otp", "123456").unwrap();
    assert!(tokens.set_token("otp", "12345a").is_err());
}

#[test]
fn bad_configured_pattern_is_reported() {
    let tokens = browser_tokens(&MemoryStorage::new());
    let err = tokens
        .register_formats(&[TokenKeyConfig {
            name: "broken".into(),
            format: TokenFormat::Pattern { pattern: "(".into() },
        }])
        .unwrap_err();

    assert!(err.to_string().contains("token key 'broken'"));
    assert!(!tokens.has_token_key("broken"));
}

#[test]
fn debug_output_lists_keys_not_validators() {
    let tokens = browser_tokens(&MemoryStorage::new());
    tokens.add_token_key("b_key", |_| true).unwrap();
    tokens.add_token_key("a_key", |_| true).unwrap();

    let out = format!("{:?}", tokens);
    assert!(out.starts_with("TokenService"), "{out}");
    assert!(out.contains(r#"["a_key", "b_key"]"#), "{out}");
    assert!(out.contains("Overwrite"), "{out}");
}
