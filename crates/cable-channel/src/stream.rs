// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Stream subscription requests and the argument gate in front of the
//! streaming registration primitive.
//!
//! The gateway re-invokes channel logic per message, so a per-message
//! callback or inline handler closure has no process to live in; only the
//! default wire coder and hook-free registrations cross the gate.

use std::fmt;
use std::sync::Arc;

use cable_proto::{ChannelIdentity, Coder, CompatibilityError};

/// Decoded broadcast payload handed to per-message hooks.
pub type StreamMessage = serde_json::Value;

/// Per-message hook attached to a stream request.
pub type StreamHook = Arc<dyn Fn(&StreamMessage) + Send + Sync>;

/// A request to bind the current subscription to a broadcast target.
///
/// Carries the two hook calling conventions separately (a callback argument
/// and an inline handler block); the gate treats them identically.
#[derive(Clone)]
pub struct StreamRequest {
    target: String,
    coder: Coder,
    callback: Option<StreamHook>,
    handler: Option<StreamHook>,
}

impl StreamRequest {
    /// Builds a request for `target` with the default coder and no hooks.
    #[must_use]
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            coder: Coder::DEFAULT,
            callback: None,
            handler: None,
        }
    }

    /// Replaces the serialization strategy.
    #[must_use]
    pub fn with_coder(mut self, coder: Coder) -> Self {
        self.coder = coder;
        self
    }

    /// Attaches a per-message callback argument.
    #[must_use]
    pub fn with_callback(mut self, callback: StreamHook) -> Self {
        self.callback = Some(callback);
        self
    }

    /// Attaches an inline handler block.
    #[must_use]
    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&StreamMessage) + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Broadcast target name.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Requested serialization strategy.
    #[must_use]
    pub fn coder(&self) -> Coder {
        self.coder
    }

    /// Returns `true` when a callback argument is attached.
    #[must_use]
    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    /// Returns `true` when an inline handler block is attached.
    #[must_use]
    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }
}

impl fmt::Debug for StreamRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamRequest")
            .field("target", &self.target)
            .field("coder", &self.coder)
            .field("callback", &self.callback.is_some())
            .field("handler", &self.handler.is_some())
            .finish()
    }
}

/// Streaming registration primitive (external collaborator).
///
/// Accepted requests are forwarded here unchanged; the sink owns broadcast
/// fan-out and is out of scope for the gate.
pub trait StreamSink {
    /// Registers `identity` to receive broadcasts for `target`, decoded
    /// with `coder`.
    fn register(&mut self, identity: &ChannelIdentity, target: &str, coder: Coder);
}

/// Checks a stream request against the gateway execution model.
///
/// Exactly one violation is reported when several coexist; the coder is
/// checked first, then both hook conventions.
pub fn validate_stream_request(request: &StreamRequest) -> Result<(), CompatibilityError> {
    if !request.coder().is_default() {
        return Err(CompatibilityError::UnsupportedCoder);
    }
    if request.has_callback() || request.has_handler() {
        return Err(CompatibilityError::UnsupportedCallback);
    }
    Ok(())
}
