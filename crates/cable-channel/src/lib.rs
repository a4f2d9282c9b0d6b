// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! cable-channel: channel-side compatibility gate for AnyCable-style
//! gateways.
//!
//! The gateway holds every live client connection out-of-process and
//! re-invokes channel logic per message over RPC. Channel behaviors that
//! assume a persistent in-process object — accumulated instance state,
//! per-message callback closures, framework timers, administrative reach
//! into live connections — cannot be honored remotely. This crate turns
//! those implicit assumptions into explicit, synchronous ALLOW/REJECT gates
//! wrapped around the subscription primitives.

mod attributes;
mod channel;
mod remote;
mod settings;
mod stream;
mod subscribe;

// Re-exports for stable public API
/// Attribute bags, declared schemas, and the key-set snapshot differ.
pub use attributes::{verify_no_new_state, AttributeBag, AttributeSchema, AttributeSnapshot};
/// Channel behavior trait, definitions, and the boot-time registry.
pub use channel::{Channel, ChannelDef, ChannelDefBuilder, ChannelRegistry, RegistryError};
/// Administrative remote-connection control (always refused).
pub use remote::{ConnectionLocator, RemoteConnection, RemoteConnections};
/// Gateway preferences and the config storage port.
pub use settings::{ConfigError, ConfigService, ConfigStore, GatewayPrefs};
/// Stream requests, the argument gate, and the registration sink port.
pub use stream::{
    validate_stream_request, StreamHook, StreamMessage, StreamRequest, StreamSink,
};
/// Subscribe-lifecycle wrapper and its context.
pub use subscribe::{run_subscribe, SubscribeOutcome, SubscriptionContext};

/// Contract types re-exported from `cable-proto`.
pub use cable_proto::{
    ChannelIdentity, Coder, CompatibilityError, ConnectionIdentifiers, SubscriptionParams,
};
