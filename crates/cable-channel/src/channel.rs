// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Channel behavior trait and boot-time channel definitions.
//!
//! Definitions are declared through an explicit builder and registered once
//! at process start. Capabilities the gateway cannot honor are refused at
//! definition time — before any instance exists — because the
//! incompatibility is structural, not per-invocation.

use std::collections::BTreeMap;
use std::time::Duration;

use cable_proto::CompatibilityError;
use thiserror::Error;

use crate::attributes::AttributeSchema;
use crate::subscribe::SubscriptionContext;

/// Per-subscription unit of pub/sub logic.
///
/// Implementations derive everything they need from the context (identity,
/// params, attribute bag); holding state on the implementing type defeats
/// remote re-invocation and is not observable by the gates.
pub trait Channel {
    /// Lifecycle hook invoked when a remote client subscribes.
    ///
    /// # Errors
    /// Returns a [`CompatibilityError`] when a guarded primitive refuses a
    /// request made by the hook.
    fn subscribed(&self, ctx: &mut SubscriptionContext<'_>) -> Result<(), CompatibilityError>;
}

/// Static declaration of a channel type: name plus declared attribute schema.
#[derive(Debug, Clone)]
pub struct ChannelDef {
    name: &'static str,
    schema: AttributeSchema,
}

impl ChannelDef {
    /// Starts a definition builder for `name`.
    #[must_use]
    pub fn builder(name: &'static str) -> ChannelDefBuilder {
        ChannelDefBuilder {
            name,
            schema: AttributeSchema::new(),
        }
    }

    /// Channel name used for registry lookup and diagnostics.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared attribute schema for subscribe-time state verification.
    #[must_use]
    pub fn schema(&self) -> &AttributeSchema {
        &self.schema
    }
}

/// Builder for [`ChannelDef`].
#[derive(Debug)]
pub struct ChannelDefBuilder {
    name: &'static str,
    schema: AttributeSchema,
}

impl ChannelDefBuilder {
    /// Declares an attribute the channel derives from subscription params.
    #[must_use]
    pub fn attribute(mut self, name: impl Into<String>) -> Self {
        self.schema.declare(name);
        self
    }

    /// Declares a recurring timer for `method`, firing every `every`.
    ///
    /// Always refused: the gateway cannot execute in-process scheduled
    /// callbacks, so the declaration itself is the violation. The refusal
    /// happens here, at definition time, whether or not an instance is ever
    /// created.
    ///
    /// # Errors
    /// Always returns [`CompatibilityError::UnsupportedTimer`].
    pub fn periodically(
        self,
        _every: Duration,
        _method: &'static str,
    ) -> Result<Self, CompatibilityError> {
        Err(CompatibilityError::UnsupportedTimer)
    }

    /// Finishes the definition.
    #[must_use]
    pub fn build(self) -> ChannelDef {
        ChannelDef {
            name: self.name,
            schema: self.schema,
        }
    }
}

/// Errors returned when registering channel definitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Two definitions were registered under the same channel name.
    #[error("duplicate channel definition: {0}")]
    DuplicateChannel(&'static str),
}

/// Boot-time registry of channel definitions, keyed by channel name.
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    defs: BTreeMap<&'static str, ChannelDef>,
}

impl ChannelRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `def`.
    ///
    /// # Errors
    /// Returns [`RegistryError::DuplicateChannel`] when a definition already
    /// exists under the same name.
    pub fn register(&mut self, def: ChannelDef) -> Result<(), RegistryError> {
        if self.defs.contains_key(def.name()) {
            return Err(RegistryError::DuplicateChannel(def.name()));
        }
        self.defs.insert(def.name(), def);
        Ok(())
    }

    /// Returns the definition registered under `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ChannelDef> {
        self.defs.get(name)
    }

    /// Number of registered definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Returns `true` when no definitions are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_declared_attributes() {
        let def = ChannelDef::builder("ChatChannel")
            .attribute("room_id")
            .attribute("nickname")
            .build();
        assert_eq!(def.name(), "ChatChannel");
        assert!(def.schema().contains("room_id"));
        assert!(def.schema().contains("nickname"));
        assert!(!def.schema().contains("counter"));
    }

    #[test]
    fn periodic_timer_declaration_is_refused_before_build() {
        let err = ChannelDef::builder("PresenceChannel")
            .periodically(Duration::from_secs(2), "beat")
            .unwrap_err();
        assert_eq!(err, CompatibilityError::UnsupportedTimer);
    }

    #[test]
    fn duplicate_channel_names_are_rejected() {
        let mut registry = ChannelRegistry::new();
        registry
            .register(ChannelDef::builder("ChatChannel").build())
            .unwrap();
        let err = registry
            .register(ChannelDef::builder("ChatChannel").build())
            .unwrap_err();
        match err {
            RegistryError::DuplicateChannel(name) => assert_eq!(name, "ChatChannel"),
        }
    }
}
