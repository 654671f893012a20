//! Network and transaction configuration.
//!
//! [`TransactionConfig`] holds the defaults that [`TransactionBuilder`]
//! starts from: the chain to sign for, gas limits and the expiration
//! window. Presets exist for the known networks, and every field can be
//! overridden from the environment.
//!
//! [`TransactionBuilder`]: crate::transaction::TransactionBuilder

use crate::error::{AptosError, AptosResult};
use crate::transaction::builder::{
    DEFAULT_EXPIRATION_SECONDS, DEFAULT_GAS_UNIT_PRICE, DEFAULT_MAX_GAS_AMOUNT,
};
use crate::types::ChainId;
use std::str::FromStr;

/// Environment variable overriding the chain id.
pub const ENV_CHAIN_ID: &str = "APTOS_CHAIN_ID";
/// Environment variable overriding the maximum gas amount.
pub const ENV_MAX_GAS_AMOUNT: &str = "APTOS_MAX_GAS_AMOUNT";
/// Environment variable overriding the gas unit price.
pub const ENV_GAS_UNIT_PRICE: &str = "APTOS_GAS_UNIT_PRICE";
/// Environment variable overriding the expiration window in seconds.
pub const ENV_EXPIRATION_SECS: &str = "APTOS_EXPIRATION_SECS";

/// Known Aptos networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    /// Aptos mainnet
    Mainnet,
    /// Aptos testnet
    Testnet,
    /// Aptos devnet
    Devnet,
    /// Local development network
    Local,
    /// Any other network, identified by its chain id
    Custom(u8),
}

impl Network {
    /// Returns the chain ID for this network.
    pub fn chain_id(&self) -> ChainId {
        match self {
            Network::Mainnet => ChainId::mainnet(),
            Network::Testnet => ChainId::testnet(),
            Network::Devnet => ChainId::new(165), // Devnet chain ID
            Network::Local => ChainId::local(),
            Network::Custom(id) => ChainId::new(*id),
        }
    }

    /// Returns the network name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Devnet => "devnet",
            Network::Local => "local",
            Network::Custom(_) => "custom",
        }
    }
}

impl From<ChainId> for Network {
    fn from(chain_id: ChainId) -> Self {
        match chain_id.id() {
            1 => Network::Mainnet,
            2 => Network::Testnet,
            4 => Network::Local,
            id => Network::Custom(id),
        }
    }
}

impl FromStr for Network {
    type Err = AptosError;

    fn from_str(s: &str) -> AptosResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            "devnet" => Ok(Network::Devnet),
            "local" | "localnet" => Ok(Network::Local),
            other => other
                .parse::<u8>()
                .map(Network::Custom)
                .map_err(|_| AptosError::Config(format!("unknown network: {s}"))),
        }
    }
}

/// Defaults applied to every transaction a builder produces.
///
/// # Example
///
/// ```rust
/// use aptos_sdk_core::config::TransactionConfig;
///
/// let config = TransactionConfig::mainnet().with_gas_unit_price(150);
/// assert_eq!(config.chain_id.id(), 1);
/// assert_eq!(config.max_gas_amount, 200_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionConfig {
    /// Chain the transactions are signed for.
    pub chain_id: ChainId,
    /// Maximum gas units per transaction.
    pub max_gas_amount: u64,
    /// Price per gas unit in octas.
    pub gas_unit_price: u64,
    /// Seconds from build time until a transaction expires.
    pub expiration_secs: u64,
}

impl Default for TransactionConfig {
    fn default() -> Self {
        Self::for_network(Network::Testnet)
    }
}

impl TransactionConfig {
    /// Creates a configuration with default gas settings for `network`.
    pub fn for_network(network: Network) -> Self {
        Self {
            chain_id: network.chain_id(),
            max_gas_amount: DEFAULT_MAX_GAS_AMOUNT,
            gas_unit_price: DEFAULT_GAS_UNIT_PRICE,
            expiration_secs: DEFAULT_EXPIRATION_SECONDS,
        }
    }

    /// Creates a configuration for Aptos mainnet.
    pub fn mainnet() -> Self {
        Self::for_network(Network::Mainnet)
    }

    /// Creates a configuration for Aptos testnet.
    pub fn testnet() -> Self {
        Self::for_network(Network::Testnet)
    }

    /// Creates a configuration for Aptos devnet.
    pub fn devnet() -> Self {
        Self::for_network(Network::Devnet)
    }

    /// Creates a configuration for a local development network.
    pub fn local() -> Self {
        Self::for_network(Network::Local)
    }

    /// Sets the chain id.
    #[must_use]
    pub fn with_chain_id(mut self, chain_id: ChainId) -> Self {
        self.chain_id = chain_id;
        self
    }

    /// Sets the maximum gas amount.
    #[must_use]
    pub fn with_max_gas_amount(mut self, max_gas_amount: u64) -> Self {
        self.max_gas_amount = max_gas_amount;
        self
    }

    /// Sets the gas unit price in octas.
    #[must_use]
    pub fn with_gas_unit_price(mut self, gas_unit_price: u64) -> Self {
        self.gas_unit_price = gas_unit_price;
        self
    }

    /// Sets the expiration window in seconds.
    #[must_use]
    pub fn with_expiration_secs(mut self, expiration_secs: u64) -> Self {
        self.expiration_secs = expiration_secs;
        self
    }

    /// Returns the network the chain id belongs to.
    pub fn network(&self) -> Network {
        Network::from(self.chain_id)
    }

    /// Builds a configuration from testnet defaults overridden by
    /// `APTOS_CHAIN_ID`, `APTOS_MAX_GAS_AMOUNT`, `APTOS_GAS_UNIT_PRICE` and
    /// `APTOS_EXPIRATION_SECS`.
    ///
    /// `APTOS_CHAIN_ID` accepts a number or a network name.
    ///
    /// # Errors
    ///
    /// Returns [`AptosError::Config`] if a variable is set but malformed.
    pub fn from_env() -> AptosResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> AptosResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(value) = lookup(ENV_CHAIN_ID) {
            config.chain_id = value.trim().parse::<Network>()?.chain_id();
        }
        if let Some(value) = lookup(ENV_MAX_GAS_AMOUNT) {
            config.max_gas_amount = parse_var(ENV_MAX_GAS_AMOUNT, &value)?;
        }
        if let Some(value) = lookup(ENV_GAS_UNIT_PRICE) {
            config.gas_unit_price = parse_var(ENV_GAS_UNIT_PRICE, &value)?;
        }
        if let Some(value) = lookup(ENV_EXPIRATION_SECS) {
            config.expiration_secs = parse_var(ENV_EXPIRATION_SECS, &value)?;
        }
        tracing::debug!(
            chain_id = config.chain_id.id(),
            max_gas_amount = config.max_gas_amount,
            gas_unit_price = config.gas_unit_price,
            expiration_secs = config.expiration_secs,
            "loaded transaction config"
        );
        Ok(config)
    }
}

fn parse_var(name: &str, value: &str) -> AptosResult<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| AptosError::Config(format!("{name} must be an unsigned integer, got {value:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_network_chain_ids() {
        assert_eq!(Network::Mainnet.chain_id(), ChainId::new(1));
        assert_eq!(Network::Testnet.chain_id(), ChainId::new(2));
        assert_eq!(Network::Local.chain_id(), ChainId::new(4));
        assert_eq!(Network::Custom(42).chain_id(), ChainId::new(42));
        assert_eq!(Network::from(ChainId::new(2)), Network::Testnet);
        assert_eq!(Network::from(ChainId::new(9)), Network::Custom(9));
    }

    #[test]
    fn test_network_from_str() {
        assert_eq!("Mainnet".parse::<Network>().unwrap(), Network::Mainnet);
        assert_eq!("devnet".parse::<Network>().unwrap(), Network::Devnet);
        assert_eq!("7".parse::<Network>().unwrap(), Network::Custom(7));
        assert!(matches!(
            "nowhere".parse::<Network>(),
            Err(AptosError::Config(_))
        ));
    }

    #[test]
    fn test_presets() {
        let config = TransactionConfig::default();
        assert_eq!(config.chain_id, ChainId::testnet());
        assert_eq!(config.max_gas_amount, 200_000);
        assert_eq!(config.gas_unit_price, 100);
        assert_eq!(config.expiration_secs, 600);
        assert_eq!(TransactionConfig::local().network(), Network::Local);
        assert_eq!(TransactionConfig::devnet().network().as_str(), "custom");
    }

    #[test]
    fn test_builder_methods() {
        let config = TransactionConfig::testnet()
            .with_chain_id(ChainId::new(33))
            .with_max_gas_amount(1)
            .with_gas_unit_price(2)
            .with_expiration_secs(3);
        assert_eq!(config.chain_id.id(), 33);
        assert_eq!(config.max_gas_amount, 1);
        assert_eq!(config.gas_unit_price, 2);
        assert_eq!(config.expiration_secs, 3);
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = TransactionConfig::from_lookup(lookup(&[
            (ENV_CHAIN_ID, "mainnet"),
            (ENV_MAX_GAS_AMOUNT, " 5000 "),
            (ENV_EXPIRATION_SECS, "60"),
        ]))
        .unwrap();
        assert_eq!(config.chain_id, ChainId::mainnet());
        assert_eq!(config.max_gas_amount, 5000);
        assert_eq!(config.gas_unit_price, 100);
        assert_eq!(config.expiration_secs, 60);
    }

    #[test]
    fn test_from_lookup_rejects_malformed_values() {
        let err = TransactionConfig::from_lookup(lookup(&[(ENV_GAS_UNIT_PRICE, "cheap")]))
            .unwrap_err();
        assert!(matches!(err, AptosError::Config(_)));
        assert!(err.to_string().contains(ENV_GAS_UNIT_PRICE));

        assert!(TransactionConfig::from_lookup(lookup(&[(ENV_CHAIN_ID, "300")])).is_err());
    }
}
