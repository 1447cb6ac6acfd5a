//! In-process client
//!
//! Signs requests as the configured principal and runs them through the
//! worker's [`RpcHandler`], so the CLI goes through the same guard and
//! dispatch path as a remote caller would.

use purge_protocol::ops::{names, InvalidationResponse, InvalidationStatus};
use purge_protocol::{RpcRequest, RpcResponse, PROTOCOL_MAX};
use purge_worker::{ControlSurface, RpcHandler};

use crate::config::PurgeConfig;

/// Process exit codes for invalidation outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitKind {
    Success = 0,
    NotFound = 2,
    PartialFailure = 3,
    Disabled = 4,
    InvalidInput = 5,
    IoFailure = 6,
    /// The request never reached an invalidator.
    Rejected = 10,
}

impl ExitKind {
    pub fn from_status(status: InvalidationStatus) -> Self {
        match status {
            InvalidationStatus::Success => Self::Success,
            InvalidationStatus::NotFound => Self::NotFound,
            InvalidationStatus::PartialFailure => Self::PartialFailure,
            InvalidationStatus::Disabled => Self::Disabled,
            InvalidationStatus::InvalidInput => Self::InvalidInput,
            InvalidationStatus::IoFailure => Self::IoFailure,
        }
    }

    pub fn from_response(response: &RpcResponse) -> Self {
        match invalidation_of(response) {
            Some(inv) => Self::from_status(inv.status),
            None => Self::Rejected,
        }
    }

    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Decode the invalidation payload of a successful response.
pub fn invalidation_of(response: &RpcResponse) -> Option<InvalidationResponse> {
    response.invalidation()
}

/// Runs operations locally on behalf of one principal.
pub struct LocalClient {
    handler: RpcHandler,
    principal: String,
}

impl LocalClient {
    pub fn new(config: &PurgeConfig) -> Self {
        Self {
            handler: RpcHandler::new(config.worker.clone()),
            principal: config.principal.clone(),
        }
    }

    /// Use an already wired control surface (e.g. with a shared object cache).
    pub fn with_surface(config: &PurgeConfig, surface: ControlSurface) -> Self {
        Self {
            handler: RpcHandler::with_surface(config.worker.clone(), surface),
            principal: config.principal.clone(),
        }
    }

    pub fn principal(&self) -> &str {
        &self.principal
    }

    /// Build a request for `op` signed with this client's principal.
    pub fn signed_request(&self, op: &str, payload: serde_json::Value) -> RpcRequest {
        let token = self.handler.config().access.issue_token(op, &self.principal);
        RpcRequest::new(PROTOCOL_MAX, op, uuid::Uuid::new_v4().to_string())
            .with_auth(self.principal.clone(), token)
            .with_payload(payload)
    }

    pub fn clear_url(&self, url: &str) -> RpcResponse {
        self.send(names::CLEAR_ONE, serde_json::json!({ "url": url }))
    }

    pub fn clear_all(&self) -> RpcResponse {
        self.send(names::CLEAR_ALL, serde_json::json!({}))
    }

    pub fn clear_object(&self) -> RpcResponse {
        self.send(names::CLEAR_OBJECT, serde_json::json!({}))
    }

    fn send(&self, op: &str, payload: serde_json::Value) -> RpcResponse {
        let request = self.signed_request(op, payload);
        tracing::debug!(op, request_id = %request.request_id, "dispatching locally");
        self.handler.handle(&request)
    }
}
