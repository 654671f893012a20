//! Chain ID type.
//!
//! The chain ID is the last field of every raw transaction. It binds a
//! signature to one network so it cannot be replayed on another.

use crate::bcs::{BcsResult, Decode, Deserializer, Encode, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A chain identifier for an Aptos network.
///
/// # Known Chain IDs
///
/// - Mainnet: 1
/// - Testnet: 2
/// - Local: 4 (default for local testing)
///
/// # Example
///
/// ```rust
/// use aptos_sdk_core::ChainId;
///
/// assert_eq!(ChainId::mainnet().id(), 1);
/// assert_eq!(ChainId::new(42).id(), 42);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "fuzzing"), derive(proptest_derive::Arbitrary))]
#[serde(transparent)]
pub struct ChainId(u8);

impl ChainId {
    /// Creates a new chain ID.
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Returns the chain ID for mainnet (1).
    pub const fn mainnet() -> Self {
        Self(1)
    }

    /// Returns the chain ID for testnet (2).
    pub const fn testnet() -> Self {
        Self(2)
    }

    /// Returns the chain ID used by local test networks (4).
    pub const fn local() -> Self {
        Self(4)
    }

    /// Returns the numeric chain ID value.
    pub const fn id(&self) -> u8 {
        self.0
    }

    /// Returns true if this is the mainnet chain ID.
    pub const fn is_mainnet(&self) -> bool {
        self.0 == 1
    }
}

impl Default for ChainId {
    fn default() -> Self {
        Self::testnet()
    }
}

impl fmt::Debug for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChainId({})", self.0)
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for ChainId {
    fn from(id: u8) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u8 {
    fn from(chain_id: ChainId) -> Self {
        chain_id.0
    }
}

impl Encode for ChainId {
    fn encode(&self, ser: &mut Serializer) {
        ser.write_u8(self.0);
    }
}

impl Decode for ChainId {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        let id = de.read_u8();
        de.check()?;
        Ok(Self(id))
    }
}
