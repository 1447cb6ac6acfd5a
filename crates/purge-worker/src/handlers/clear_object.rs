//! clear_object operation handler.

use purge_protocol::ops::InvalidationResponse;
use purge_protocol::{RpcError, RpcRequest};

use super::{clear_object_message, to_payload};
use crate::surface::ControlSurface;

/// Handle the clear_object operation.
pub fn handle(_request: &RpcRequest, surface: &ControlSurface) -> Result<serde_json::Value, RpcError> {
    let result = surface.on_request_clear_object_cache();
    to_payload(InvalidationResponse::new(result.status(), clear_object_message(result)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{MemoryObjectCache, ObjectCache};
    use crate::config::WorkerConfig;
    use std::sync::Arc;

    #[test]
    fn test_disabled_backend() {
        let surface = ControlSurface::new(&WorkerConfig::default());
        let result = handle(&RpcRequest::new(1, "clear_object", "t"), &surface).unwrap();
        assert_eq!(result["status"], "disabled");
        assert_eq!(result["message"], "Object cache is not enabled.");
    }

    #[test]
    fn test_attached_cache_is_flushed() {
        let cache = Arc::new(MemoryObjectCache::new());
        cache.set("options:siteurl", "https://example.com");
        let surface = ControlSurface::with_object_cache(
            &WorkerConfig::default(),
            Some(cache.clone() as Arc<dyn ObjectCache>),
        );

        let result = handle(&RpcRequest::new(1, "clear_object", "t"), &surface).unwrap();
        assert_eq!(result["status"], "success");
        assert_eq!(result["message"], "Object cache cleared successfully.");
        assert!(cache.is_empty());
    }
}
