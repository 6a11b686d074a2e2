//! Caller authentication seam.
//!
//! Account management and token issuance live outside this backend. All
//! the core needs is "given a bearer credential, who is calling?", which
//! is the [`Authenticator`] trait. [`StaticTokenAuthenticator`] answers it
//! from a configured table of operator tokens.
//!
//! There is no anonymous fallback: an empty token table rejects every
//! request.

use std::collections::BTreeMap;

use serde::Serialize;

/// Opaque identity of an authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    /// Stable subject identifier of the caller.
    pub subject: String,
}

/// Authentication failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No bearer credential was supplied.
    #[error("Not authenticated")]
    MissingCredentials,

    /// The credential is not recognised.
    #[error("Invalid token")]
    InvalidToken,
}

/// Resolves bearer credentials to principals.
pub trait Authenticator: Send + Sync {
    /// Resolve `token` to a principal.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidToken`] for unknown credentials.
    fn authenticate(&self, token: &str) -> Result<Principal, AuthError>;
}

/// Authenticator backed by a fixed token table.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenAuthenticator {
    // token -> subject
    tokens: BTreeMap<String, String>,
}

impl StaticTokenAuthenticator {
    /// Build from a `subject -> token` table, as found in configuration.
    ///
    /// Entries with an empty token are skipped.
    pub fn from_operators(operators: &BTreeMap<String, String>) -> Self {
        let tokens = operators
            .iter()
            .filter(|(_, token)| !token.is_empty())
            .map(|(subject, token)| (token.clone(), subject.clone()))
            .collect();
        Self { tokens }
    }

    /// Whether no token is configured (every request will be rejected).
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Number of configured tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }
}

impl Authenticator for StaticTokenAuthenticator {
    fn authenticate(&self, token: &str) -> Result<Principal, AuthError> {
        if token.is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        self.tokens
            .get(token)
            .map(|subject| Principal {
                subject: subject.clone(),
            })
            .ok_or(AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn operators() -> BTreeMap<String, String> {
        BTreeMap::from([
            (String::from("dispatch"), String::from("tok-dispatch")),
            (String::from("disabled"), String::new()),
        ])
    }

    #[test]
    fn known_token_resolves_to_subject() {
        let auth = StaticTokenAuthenticator::from_operators(&operators());
        assert_eq!(
            auth.authenticate("tok-dispatch"),
            Ok(Principal {
                subject: String::from("dispatch")
            })
        );
    }

    #[test]
    fn unknown_token_is_rejected() {
        let auth = StaticTokenAuthenticator::from_operators(&operators());
        assert_eq!(auth.authenticate("nope"), Err(AuthError::InvalidToken));
    }

    #[test]
    fn empty_tokens_are_never_accepted() {
        let auth = StaticTokenAuthenticator::from_operators(&operators());
        assert_eq!(auth.len(), 1);
        assert_eq!(auth.authenticate(""), Err(AuthError::MissingCredentials));
    }

    #[test]
    fn empty_table_rejects_everything() {
        let auth = StaticTokenAuthenticator::default();
        assert!(auth.is_empty());
        assert_eq!(auth.authenticate("anything"), Err(AuthError::InvalidToken));
    }
}
