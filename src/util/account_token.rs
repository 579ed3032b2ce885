//! Single-use random tokens for email confirmation and password reset.

use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountToken {
    /// Lowercase hex
    pub value: String,
    /// Unix timestamp (seconds)
    pub expires_at: i64,
}

impl AccountToken {
    /// `bytes` random bytes from the OS generator, hex encoded, valid for `ttl_secs`.
    pub fn generate(bytes: usize, ttl_secs: u64) -> Self {
        let mut buf = vec![0u8; bytes];
        OsRng.fill_bytes(&mut buf);
        let value = buf.iter().fold(String::with_capacity(bytes * 2), |mut out, b| {
            let _ = write!(out, "{:02x}", b);
            out
        });
        debug!("Generated account token of {} hex chars", value.len());
        AccountToken {
            value,
            expires_at: chrono::Utc::now()
                .timestamp()
                .saturating_add(i64::try_from(ttl_secs).unwrap_or(i64::MAX)),
        }
    }

    pub fn is_expired(&self) -> bool {
        chrono::Utc::now().timestamp() > self.expires_at
    }

    /// Constant-time comparison against a presented token
    pub fn matches(&self, presented: &str) -> bool {
        let a = self.value.as_bytes();
        let b = presented.as_bytes();
        a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
    }
}

/// First characters of a token, for log lines
pub fn preview(token: &str) -> &str {
    let end = token
        .char_indices()
        .nth(8)
        .map(|(i, _)| i)
        .unwrap_or(token.len());
    &token[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_hex_of_expected_length() {
        let token = AccountToken::generate(32, 3600);
        assert_eq!(token.value.len(), 64);
        assert!(token.value.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert!(!token.is_expired());
    }

    #[test]
    fn test_tokens_are_unique() {
        let a = AccountToken::generate(32, 60);
        let b = AccountToken::generate(32, 60);
        assert_ne!(a.value, b.value);
    }

    #[test]
    fn test_expired_token() {
        let mut token = AccountToken::generate(16, 60);
        token.expires_at = chrono::Utc::now().timestamp() - 1;
        assert!(token.is_expired());
    }

    #[test]
    fn test_huge_ttl_does_not_wrap() {
        let token = AccountToken::generate(16, u64::MAX);
        assert_eq!(token.expires_at, i64::MAX);
        assert!(!token.is_expired());
    }

    #[test]
    fn test_matches() {
        let token = AccountToken::generate(16, 60);
        let copy = token.value.clone();
        assert!(token.matches(&copy));
        assert!(!token.matches(&copy[1..]));
        let flipped: String = copy
            .chars()
            .enumerate()
            .map(|(i, c)| if i == 0 { if c == 'a' { 'b' } else { 'a' } } else { c })
            .collect();
        assert!(!token.matches(&flipped));
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("abcdef0123456789"), "abcdef01");
        assert_eq!(preview("abc"), "abc");
    }
}
