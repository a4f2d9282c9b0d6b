// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Contract types shared between the cable channel layer and gateway tooling.
//! Pure data (identities, coders, violation errors) with deterministic
//! canonical encoding; the error display strings are observable contract.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// blake3 digest bytes for a canonical identity key.
pub type Hash32 = [u8; 32];

/// Identifiers established by the gateway at connection time
/// (e.g. `current_user`), keyed by identifier name.
///
/// Ordered so canonical encoding does not depend on insertion order.
pub type ConnectionIdentifiers = BTreeMap<String, serde_json::Value>;

/// Params supplied by the remote client when it subscribes to a channel.
pub type SubscriptionParams = BTreeMap<String, serde_json::Value>;

/// Serialization strategy applied to messages on a stream.
///
/// Closed enumeration compared by variant. The gateway decodes exactly one
/// wire format, so a non-default coder is rejected even when its behavior
/// would be equivalent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Coder {
    /// Plain JSON — the gateway wire codec and the only supported strategy.
    #[default]
    Json,
    /// MessagePack framing (not decodable by the gateway).
    Msgpack,
    /// Raw pass-through bytes (not decodable by the gateway).
    Raw,
}

impl Coder {
    /// The single strategy the gateway can decode.
    pub const DEFAULT: Self = Self::Json;

    /// Returns `true` when this is the gateway default.
    #[must_use]
    pub const fn is_default(self) -> bool {
        matches!(self, Self::Json)
    }
}

/// Identity of a single subscription attempt.
///
/// Reproducible byte-for-byte from only the arguments supplied at
/// subscription time: the gateway may re-invoke channel logic in another
/// process instance and reconstruct the same identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChannelIdentity {
    /// Identifiers established at connection time.
    pub identifiers: ConnectionIdentifiers,
    /// Channel/topic name.
    pub channel: String,
    /// Params supplied by the client at subscribe time.
    pub params: SubscriptionParams,
}

impl ChannelIdentity {
    /// Builds an identity from its subscription-time inputs.
    #[must_use]
    pub fn new(
        identifiers: ConnectionIdentifiers,
        channel: impl Into<String>,
        params: SubscriptionParams,
    ) -> Self {
        Self {
            identifiers,
            channel: channel.into(),
            params,
        }
    }

    /// Canonical JSON key for this identity.
    ///
    /// Object keys serialize in `BTreeMap` order, so the key is stable
    /// across processes and insertion orders.
    pub fn key(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// blake3 digest of the canonical key bytes.
    pub fn digest(&self) -> Result<Hash32, serde_json::Error> {
        Ok(*blake3::hash(self.key()?.as_bytes()).as_bytes())
    }
}

/// Compatibility violation raised by a channel-side gate.
///
/// Each kind carries a fixed human-readable message; gateway tooling and
/// tests match on the display string, not only the variant. Violations are
/// never caught or retried inside the gates — they abort the guarded
/// operation outright.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompatibilityError {
    /// A stream requested a serialization strategy other than [`Coder::Json`].
    #[error("Custom coders are not supported in AnyCable!")]
    UnsupportedCoder,
    /// A stream supplied a per-message callback or an inline handler block.
    #[error("Custom stream callbacks are not supported in AnyCable!")]
    UnsupportedCallback,
    /// The subscribe hook set an attribute missing from the declared schema.
    #[error("Channel state attributes are not supported in AnyCable! (undeclared attribute `{0}`)")]
    NewStateIntroduced(String),
    /// A channel definition declared a recurring timer.
    #[error("Periodical Timers are not supported in AnyCable!")]
    UnsupportedTimer,
    /// Administrative tooling tried to act on a gateway-held connection.
    #[error("Disconnecting remote clients is not supported in AnyCable!")]
    RemoteControlUnsupported,
}
