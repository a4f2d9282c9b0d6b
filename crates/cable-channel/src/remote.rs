// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Administrative control over remote connections — refused outright.
//!
//! Live connection state belongs to the gateway process; the application has
//! no channel into it, so a locator is never resolved against anything. The
//! refusal happens before any identifier matching could occur.

use cable_proto::{CompatibilityError, ConnectionIdentifiers};
use serde::{Deserialize, Serialize};

/// Descriptor targeting a gateway-held connection by its identifying
/// attributes plus a URL or filter expression (possibly empty).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionLocator {
    /// Connection identifiers to match (e.g. `current_user`).
    pub identifiers: ConnectionIdentifiers,
    /// Connection URL or filter expression.
    pub url: String,
}

impl ConnectionLocator {
    /// Builds a locator from identifiers and a URL/filter.
    #[must_use]
    pub fn new(identifiers: ConnectionIdentifiers, url: impl Into<String>) -> Self {
        Self {
            identifiers,
            url: url.into(),
        }
    }
}

/// Entry point used by administrative disconnect tooling.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoteConnections;

impl RemoteConnections {
    /// Creates the administrative handle.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Wraps `locator` in an unresolved handle. No lookup is performed —
    /// none is possible from this process.
    #[must_use]
    pub fn locate(&self, locator: ConnectionLocator) -> RemoteConnection {
        RemoteConnection { locator }
    }
}

/// Unresolved handle on a remote connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConnection {
    locator: ConnectionLocator,
}

impl RemoteConnection {
    /// The locator this handle was built from.
    #[must_use]
    pub fn locator(&self) -> &ConnectionLocator {
        &self.locator
    }

    /// Force-disconnects the located connection.
    ///
    /// # Errors
    /// Always returns [`CompatibilityError::RemoteControlUnsupported`].
    pub fn disconnect(&self) -> Result<(), CompatibilityError> {
        Err(CompatibilityError::RemoteControlUnsupported)
    }
}
