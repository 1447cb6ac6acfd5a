//! Worker RPC Handler
//!
//! Implements the stdin/stdout JSON RPC handler for the worker entrypoint:
//!
//!   purge-worker rpc
//!
//! The handler reads a single JSON request from stdin, runs the request
//! guard, dispatches to the appropriate operation handler, and writes a
//! single JSON response to stdout.

use std::io::{self, BufRead, Write};

use purge_protocol::{ops::names, RpcError, RpcRequest, RpcResponse};

use crate::config::WorkerConfig;
use crate::guard::RequestGuard;
use crate::handlers;
use crate::surface::ControlSurface;

/// Protocol version used when the request could not be parsed at all.
const PROTOCOL_VERSION_UNKNOWN: i32 = 0;

/// Main RPC handler for the worker.
pub struct RpcHandler {
    config: WorkerConfig,
    surface: ControlSurface,
    guard: Box<dyn RequestGuard>,
}

impl RpcHandler {
    /// Create a new RPC handler with the given configuration. Requests are
    /// checked against the configured access policy.
    pub fn new(config: WorkerConfig) -> Self {
        let surface = ControlSurface::new(&config);
        Self::with_surface(config, surface)
    }

    /// Create a handler around an already wired control surface.
    pub fn with_surface(config: WorkerConfig, surface: ControlSurface) -> Self {
        let guard = Box::new(config.access.clone());
        Self {
            config,
            surface,
            guard,
        }
    }

    /// Replace the request guard.
    pub fn with_guard(mut self, guard: impl RequestGuard + 'static) -> Self {
        self.guard = Box::new(guard);
        self
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    pub fn surface(&self) -> &ControlSurface {
        &self.surface
    }

    /// Run the RPC handler, reading from stdin and writing to stdout.
    pub fn run(&self) -> io::Result<()> {
        self.run_with_io(&mut io::stdin().lock(), &mut io::stdout().lock())
    }

    /// Run the RPC handler with custom I/O (for testing).
    pub fn run_with_io<R: BufRead, W: Write>(
        &self,
        reader: &mut R,
        writer: &mut W,
    ) -> io::Result<()> {
        let response = match self.read_request(reader) {
            Ok(request) => self.handle(&request),
            Err(e) => RpcResponse::error(PROTOCOL_VERSION_UNKNOWN, String::new(), e),
        };

        self.write_response(writer, &response)
    }

    /// Validate, authorize and dispatch one parsed request.
    pub fn handle(&self, request: &RpcRequest) -> RpcResponse {
        let _span = tracing::info_span!(
            "rpc",
            op = %request.op,
            request_id = %request.request_id
        )
        .entered();

        let result = self
            .validate_protocol_version(request)
            .and_then(|()| self.validate_operation(request))
            .and_then(|()| self.guard.check(request))
            .and_then(|()| self.dispatch(request));

        match result {
            Ok(payload) => {
                let status = payload["status"].as_str().unwrap_or_default();
                tracing::info!(status, "request handled");
                RpcResponse::success(request.protocol_version, request.request_id.clone(), payload)
            }
            Err(e) => {
                tracing::info!(code = %e.code, "request rejected");
                RpcResponse::error(request.protocol_version, request.request_id.clone(), e)
            }
        }
    }

    /// Read and parse the RPC request from the reader.
    fn read_request<R: BufRead>(&self, reader: &mut R) -> Result<RpcRequest, RpcError> {
        let mut line = String::new();
        reader
            .read_line(&mut line)
            .map_err(|e| RpcError::invalid_request(format!("failed to read request: {}", e)))?;

        let request: RpcRequest = serde_json::from_str(&line)
            .map_err(|e| RpcError::invalid_request(format!("invalid JSON: {}", e)))?;

        Ok(request)
    }

    /// Validate the protocol version in the request.
    fn validate_protocol_version(&self, request: &RpcRequest) -> Result<(), RpcError> {
        if request.protocol_version < self.config.protocol_min
            || request.protocol_version > self.config.protocol_max
        {
            return Err(RpcError::unsupported_protocol(
                request.protocol_version,
                self.config.protocol_min,
                self.config.protocol_max,
            ));
        }

        Ok(())
    }

    fn validate_operation(&self, request: &RpcRequest) -> Result<(), RpcError> {
        if names::ALL.contains(&request.op.as_str()) {
            Ok(())
        } else {
            Err(RpcError::unknown_operation(&request.op))
        }
    }

    /// Dispatch the request to the appropriate operation handler.
    fn dispatch(&self, request: &RpcRequest) -> Result<serde_json::Value, RpcError> {
        match request.op.as_str() {
            names::CLEAR_ONE => handlers::clear_one::handle(request, &self.surface),
            names::CLEAR_ALL => handlers::clear_all::handle(request, &self.surface),
            names::CLEAR_OBJECT => handlers::clear_object::handle(request, &self.surface),
            _ => Err(RpcError::unknown_operation(&request.op)),
        }
    }

    /// Write the response to the writer.
    fn write_response<W: Write>(&self, writer: &mut W, response: &RpcResponse) -> io::Result<()> {
        let json = serde_json::to_string(response)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        writeln!(writer, "{}", json)?;
        writer.flush()
    }
}
