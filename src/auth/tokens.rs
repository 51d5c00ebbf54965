use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use rand::Rng;

/// In-memory store for email verification tokens.
///
/// Constructed once at startup and injected through `AppState`; tokens are
/// single-use, TTL-bound, and swept periodically by a background task.
#[derive(Debug)]
pub struct VerificationStore {
    ttl: Duration,
    tokens: Mutex<HashMap<String, PendingToken>>,
}

#[derive(Debug, Clone)]
struct PendingToken {
    token: String,
    issued_at: Instant,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("invalid verification token")]
    Invalid,
    #[error("verification token expired")]
    Expired,
}

impl VerificationStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            tokens: Mutex::new(HashMap::new()),
        }
    }

    /// Issues a fresh token for the email, replacing any earlier one.
    pub fn issue(&self, email: &str) -> String {
        let token: String = {
            let mut rng = rand::thread_rng();
            (0..32)
                .map(|_| {
                    let c: u8 = rng.gen_range(0..36);
                    if c < 10 {
                        (b'0' + c) as char
                    } else {
                        (b'a' + c - 10) as char
                    }
                })
                .collect()
        };

        let mut tokens = self.tokens.lock().expect("token store poisoned");
        tokens.insert(
            email.to_lowercase(),
            PendingToken {
                token: token.clone(),
                issued_at: Instant::now(),
            },
        );
        token
    }

    /// Consumes a token. Single-use: success removes it, and an expired
    /// token is removed as well so a retry gets a clean "invalid".
    pub fn consume(&self, email: &str, token: &str) -> Result<(), TokenError> {
        let key = email.to_lowercase();
        let mut tokens = self.tokens.lock().expect("token store poisoned");

        let pending = tokens.get(&key).ok_or(TokenError::Invalid)?;
        if pending.token != token {
            return Err(TokenError::Invalid);
        }
        if pending.issued_at.elapsed() > self.ttl {
            tokens.remove(&key);
            return Err(TokenError::Expired);
        }

        tokens.remove(&key);
        Ok(())
    }

    /// Drops expired tokens. Called from the periodic sweep task.
    pub fn sweep_expired(&self) -> usize {
        let mut tokens = self.tokens.lock().expect("token store poisoned");
        let before = tokens.len();
        let ttl = self.ttl;
        tokens.retain(|_, pending| pending.issued_at.elapsed() <= ttl);
        before - tokens.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consume_is_single_use() {
        let store = VerificationStore::new(Duration::from_secs(60));
        let token = store.issue("user@example.com");

        assert_eq!(store.consume("user@example.com", &token), Ok(()));
        assert_eq!(
            store.consume("user@example.com", &token),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn consume_is_case_insensitive_on_email() {
        let store = VerificationStore::new(Duration::from_secs(60));
        let token = store.issue("User@Example.COM");

        assert_eq!(store.consume("user@example.com", &token), Ok(()));
    }

    #[test]
    fn expired_tokens_are_rejected_and_swept() {
        let store = VerificationStore::new(Duration::ZERO);
        let token = store.issue("user@example.com");

        assert_eq!(
            store.consume("user@example.com", &token),
            Err(TokenError::Expired)
        );

        store.issue("other@example.com");
        assert_eq!(store.sweep_expired(), 1);
    }

    #[test]
    fn reissue_replaces_previous_token() {
        let store = VerificationStore::new(Duration::from_secs(60));
        let first = store.issue("user@example.com");
        let second = store.issue("user@example.com");

        assert_eq!(
            store.consume("user@example.com", &first),
            Err(TokenError::Invalid)
        );
        assert_eq!(store.consume("user@example.com", &second), Ok(()));
    }
}
