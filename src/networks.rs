// src/networks.rs
use alloy::primitives::{address, Address};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt, str::FromStr};

use crate::error::DashboardError;

/// Wallet used to sample USDC balances when no per-network override is set.
pub const SAMPLE_HOLDER: &str = "0x2a0c0dbecc7e4d658f48e01e3fa353f44050c208";

pub const USDC_SYMBOL: &str = "USDC";
pub const USDC_DECIMALS: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Ethereum,
    Polygon,
    Arbitrum,
    Optimism,
    Base,
}

impl Network {
    /// Table order. Also the priority order for transfer lookups.
    pub const ALL: [Network; 5] = [
        Network::Ethereum,
        Network::Polygon,
        Network::Arbitrum,
        Network::Optimism,
        Network::Base,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Ethereum => "ethereum",
            Network::Polygon => "polygon",
            Network::Arbitrum => "arbitrum",
            Network::Optimism => "optimism",
            Network::Base => "base",
        }
    }

    /// Identifier the token API expects in `network_id`.
    pub fn api_id(&self) -> &'static str {
        match self {
            Network::Ethereum => "mainnet",
            Network::Polygon => "matic",
            Network::Arbitrum => "arbitrum-one",
            Network::Optimism => "optimism",
            Network::Base => "base",
        }
    }

    pub fn usdc_contract(&self) -> Address {
        match self {
            Network::Ethereum => address!("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"),
            Network::Polygon => address!("0x2791bca1f2de4661ed88a30c99a7a9449aa84174"),
            Network::Arbitrum => address!("0xff970a61a04b1ca14834a43f5de4533ebddb5cc8"),
            Network::Optimism => address!("0x7f5c764cbc14f9669b88837ca1490cca17c31607"),
            Network::Base => address!("0x833589fcd6edb6e08f4c7c32d4f71b54bda02913"),
        }
    }

    /// Case-insensitive match of an upstream contract string against this network's USDC.
    pub fn is_usdc_contract(&self, contract: &str) -> bool {
        contract
            .trim()
            .parse::<Address>()
            .map(|a| a == self.usdc_contract())
            .unwrap_or(false)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Network::ALL
            .into_iter()
            .find(|n| n.as_str() == wanted)
            .ok_or_else(|| DashboardError::UnknownNetwork(s.to_string()))
    }
}

/// Parse and validate a 20-byte hex wallet address (`0x` + 40 hex chars).
pub fn parse_address(raw: &str) -> Result<Address, DashboardError> {
    let s = raw.trim();
    if s.len() != 42 || !(s.starts_with("0x") || s.starts_with("0X")) {
        return Err(DashboardError::InvalidAddress(raw.to_string()));
    }
    s[2..]
        .parse::<Address>()
        .map_err(|_| DashboardError::InvalidAddress(raw.to_string()))
}

/// Representative holder per network, sampled in place of a global supply query.
#[derive(Debug, Clone, Default)]
pub struct Holders {
    overrides: HashMap<Network, String>,
}

impl Holders {
    pub fn new(overrides: HashMap<Network, String>) -> Self {
        Self { overrides }
    }

    /// Parse `network=0xaddr,network=0xaddr`. Malformed entries are skipped.
    pub fn parse_list(raw: &str) -> Self {
        let overrides = raw
            .split(',')
            .filter_map(|entry| {
                let (name, addr) = entry.split_once('=')?;
                let network = name.parse::<Network>().ok()?;
                let addr = parse_address(addr).ok()?;
                Some((network, format!("{:#x}", addr)))
            })
            .collect();
        Self { overrides }
    }

    pub fn for_network(&self, network: Network) -> &str {
        self.overrides
            .get(&network)
            .map(String::as_str)
            .unwrap_or(SAMPLE_HOLDER)
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}
