//! RPC response envelope.
//!
//! `ok` only says whether the request got past validation and the guard.
//! What happened to the cache is in the payload's `status`; a purge that
//! found nothing to delete is still `ok`.

use serde::{Deserialize, Serialize};

use crate::error::{ErrorCode, RpcError};
use crate::ops::InvalidationResponse;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcResponse {
    /// Echoed from the request; 0 when the request could not be parsed.
    pub protocol_version: i32,
    pub request_id: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl RpcResponse {
    pub fn success(
        protocol_version: i32,
        request_id: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            protocol_version,
            request_id: request_id.into(),
            ok: true,
            payload: Some(payload),
            error: None,
        }
    }

    pub fn error(protocol_version: i32, request_id: impl Into<String>, error: RpcError) -> Self {
        Self {
            protocol_version,
            request_id: request_id.into(),
            ok: false,
            payload: None,
            error: Some(error),
        }
    }

    /// The invalidation outcome, if the request reached an invalidator.
    pub fn invalidation(&self) -> Option<InvalidationResponse> {
        if !self.ok {
            return None;
        }
        self.payload
            .as_ref()
            .and_then(|p| InvalidationResponse::deserialize(p).ok())
    }

    /// Why the request was turned away before reaching an invalidator.
    pub fn rejection(&self) -> Option<ErrorCode> {
        self.error.as_ref().map(|e| e.code)
    }
}
