//! Request guard
//!
//! Runs in front of the control surface for every request:
//! 1. the request must carry a token minted for this exact operation and
//!    principal (anti-forgery)
//! 2. the principal must be an administrator
//!
//! The invalidators themselves perform no access checks.

use std::fmt;

use hmac::{Hmac, Mac};
use purge_protocol::{RpcError, RpcRequest};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Interceptor consulted before a request reaches the control surface.
pub trait RequestGuard: Send + Sync {
    fn check(&self, request: &RpcRequest) -> Result<(), RpcError>;
}

/// Shared-secret tokens plus an administrator allowlist.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AccessPolicy {
    /// Secret mixed into every token. Empty disables all operations.
    #[serde(default)]
    pub secret: String,
    /// Principals allowed to clear caches.
    #[serde(default)]
    pub administrators: Vec<String>,
}

impl fmt::Debug for AccessPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessPolicy")
            .field("secret", &if self.secret.is_empty() { "" } else { "<redacted>" })
            .field("administrators", &self.administrators)
            .finish()
    }
}

impl AccessPolicy {
    pub fn new(secret: impl Into<String>, administrators: Vec<String>) -> Self {
        Self {
            secret: secret.into(),
            administrators,
        }
    }

    /// Mint the token `principal` must present to run `op`.
    ///
    /// `hex(HMAC-SHA256(secret, "<op>:<principal>"))`
    pub fn issue_token(&self, op: &str, principal: &str) -> String {
        self.mac_for(op, principal)
            .map(|mac| hex::encode(mac.finalize().into_bytes()))
            .unwrap_or_default()
    }

    pub fn is_administrator(&self, principal: &str) -> bool {
        self.administrators.iter().any(|a| a == principal)
    }

    fn mac_for(&self, op: &str, principal: &str) -> Option<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes()).ok()?;
        mac.update(op.as_bytes());
        mac.update(b":");
        mac.update(principal.as_bytes());
        Some(mac)
    }

    fn token_matches(&self, op: &str, principal: &str, token: &str) -> bool {
        if self.secret.is_empty() {
            return false;
        }
        let Ok(tag) = hex::decode(token) else {
            return false;
        };
        self.mac_for(op, principal)
            .is_some_and(|mac| mac.verify_slice(&tag).is_ok())
    }
}

impl RequestGuard for AccessPolicy {
    fn check(&self, request: &RpcRequest) -> Result<(), RpcError> {
        let Some(auth) = &request.auth else {
            tracing::warn!(op = %request.op, "request without credentials");
            return Err(RpcError::security_check_failed(&request.op));
        };

        if !self.token_matches(&request.op, &auth.principal, &auth.token) {
            tracing::warn!(op = %request.op, principal = %auth.principal, "security check failed");
            return Err(RpcError::security_check_failed(&request.op));
        }

        if !self.is_administrator(&auth.principal) {
            tracing::warn!(op = %request.op, principal = %auth.principal, "permission denied");
            return Err(RpcError::permission_denied(&auth.principal));
        }

        Ok(())
    }
}
