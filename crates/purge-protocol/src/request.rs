//! RPC request types.

use serde::{Deserialize, Serialize};

/// RPC request envelope.
///
/// All worker operations accept a single JSON request on stdin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    /// Protocol version.
    pub protocol_version: i32,
    /// Operation name.
    pub op: String,
    /// Caller-chosen request ID for correlation.
    pub request_id: String,
    /// Credentials checked by the worker's guard before dispatch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthContext>,
    /// Operation-specific payload.
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// Who is asking, and the token proving the request was issued for `op`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Acting principal (e.g. an admin user name).
    pub principal: String,
    /// Anti-forgery token bound to the operation and principal.
    pub token: String,
}

impl RpcRequest {
    /// Create a request for `op` with an empty payload.
    pub fn new(protocol_version: i32, op: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self {
            protocol_version,
            op: op.into(),
            request_id: request_id.into(),
            auth: None,
            payload: serde_json::Value::Object(serde_json::Map::new()),
        }
    }

    /// Attach credentials.
    pub fn with_auth(mut self, principal: impl Into<String>, token: impl Into<String>) -> Self {
        self.auth = Some(AuthContext {
            principal: principal.into(),
            token: token.into(),
        });
        self
    }

    /// Replace the payload.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}
