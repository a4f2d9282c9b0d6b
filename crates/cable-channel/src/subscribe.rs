// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Subscribe-lifecycle wrapper: baseline snapshot, hook invocation, state
//! verification, and stream registration on behalf of channel code.

use cable_proto::{ChannelIdentity, CompatibilityError, SubscriptionParams};
use tracing::{debug, warn};

use crate::attributes::{verify_no_new_state, AttributeBag, AttributeSnapshot};
use crate::channel::{Channel, ChannelDef};
use crate::stream::{validate_stream_request, StreamRequest, StreamSink};

/// Outcome of a completed subscribe run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribeOutcome {
    /// Subscription accepted; validated stream registrations are in effect.
    Accepted,
    /// The channel rejected the subscription (authorization, not a
    /// compatibility violation).
    Rejected,
}

/// Per-subscription context handed to the `subscribed` hook.
///
/// Owns the attribute bag and the only path to the streaming primitive;
/// every registration passes the argument gate before it reaches the sink.
pub struct SubscriptionContext<'a> {
    identity: ChannelIdentity,
    attributes: AttributeBag,
    sink: &'a mut dyn StreamSink,
    rejected: bool,
    registrations: usize,
}

impl<'a> SubscriptionContext<'a> {
    /// Creates a context for one subscription attempt.
    #[must_use]
    pub fn new(identity: ChannelIdentity, sink: &'a mut dyn StreamSink) -> Self {
        Self {
            identity,
            attributes: AttributeBag::new(),
            sink,
            rejected: false,
            registrations: 0,
        }
    }

    /// Identity of this subscription attempt.
    #[must_use]
    pub fn identity(&self) -> &ChannelIdentity {
        &self.identity
    }

    /// Params supplied by the client at subscribe time.
    #[must_use]
    pub fn params(&self) -> &SubscriptionParams {
        &self.identity.params
    }

    /// Sets a user-visible attribute.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: serde_json::Value) {
        self.attributes.set(name, value);
    }

    /// The user-visible attribute bag.
    #[must_use]
    pub fn attributes(&self) -> &AttributeBag {
        &self.attributes
    }

    /// Marks the subscription rejected (e.g. failed authorization).
    pub fn reject(&mut self) {
        self.rejected = true;
    }

    /// Returns `true` when the channel rejected the subscription.
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        self.rejected
    }

    /// Number of registrations forwarded to the sink so far.
    #[must_use]
    pub fn registrations(&self) -> usize {
        self.registrations
    }

    /// Binds this subscription to `target` with the default coder and no
    /// per-message hooks.
    ///
    /// # Errors
    /// Propagates the argument gate's [`CompatibilityError`].
    pub fn stream_from(&mut self, target: &str) -> Result<(), CompatibilityError> {
        self.stream_from_request(StreamRequest::new(target))
    }

    /// Validates `request` and forwards it unchanged to the sink.
    ///
    /// # Errors
    /// Returns the argument gate's [`CompatibilityError`]; nothing reaches
    /// the sink on failure.
    pub fn stream_from_request(
        &mut self,
        request: StreamRequest,
    ) -> Result<(), CompatibilityError> {
        validate_stream_request(&request)?;
        self.sink
            .register(&self.identity, request.target(), request.coder());
        self.registrations += 1;
        Ok(())
    }
}

/// Runs the subscribe lifecycle for `channel` under `def`'s declared schema.
///
/// Captures the baseline key set, invokes the hook, then verifies no
/// undeclared state was introduced. Violations propagate synchronously; the
/// caller discards the context (and any instance) rather than rolling back.
///
/// # Errors
/// Returns the first [`CompatibilityError`] raised by the hook's guarded
/// calls or by the state verification.
pub fn run_subscribe<C: Channel + ?Sized>(
    def: &ChannelDef,
    channel: &C,
    ctx: &mut SubscriptionContext<'_>,
) -> Result<SubscribeOutcome, CompatibilityError> {
    let before = AttributeSnapshot::baseline(def.schema(), ctx.attributes());

    if let Err(err) = channel.subscribed(ctx) {
        warn!(channel = def.name(), %err, "subscribe hook aborted");
        return Err(err);
    }

    let after = AttributeSnapshot::capture(ctx.attributes());
    if let Err(err) = verify_no_new_state(&before, &after) {
        warn!(channel = def.name(), %err, "subscribe hook introduced undeclared state");
        return Err(err);
    }

    if ctx.is_rejected() {
        debug!(channel = def.name(), "subscription rejected by channel");
        return Ok(SubscribeOutcome::Rejected);
    }
    debug!(
        channel = def.name(),
        streams = ctx.registrations(),
        "subscription accepted"
    );
    Ok(SubscribeOutcome::Accepted)
}
