// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Balancer deployments.

use alloy_chains::NamedChain;
use serde::de::{Deserializer, Error as _};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::errors::FieldIssue;

/// A network with a Balancer v2 deployment.
///
/// Serialized as the chain id string (`"1"`, `"137"`, ...), which is the
/// representation used in pool stats records. Parsing accepts either the chain
/// id or the lowercase slug (`ethereum`, `polygon`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Network {
    Ethereum,
    Polygon,
    Arbitrum,
    Gnosis,
    Optimism,
    PolygonZkEvm,
    Base,
    Avalanche,
    Sepolia,
    Goerli,
}

impl Network {
    /// Every supported network, mainnets first.
    pub const ALL: [Network; 10] = [
        Network::Ethereum,
        Network::Polygon,
        Network::Arbitrum,
        Network::Gnosis,
        Network::Optimism,
        Network::PolygonZkEvm,
        Network::Base,
        Network::Avalanche,
        Network::Sepolia,
        Network::Goerli,
    ];

    pub const fn chain_id(&self) -> u64 {
        match self {
            Network::Ethereum => 1,
            Network::Polygon => 137,
            Network::Arbitrum => 42161,
            Network::Gnosis => 100,
            Network::Optimism => 10,
            Network::PolygonZkEvm => 1101,
            Network::Base => 8453,
            Network::Avalanche => 43114,
            Network::Sepolia => 11155111,
            Network::Goerli => 5,
        }
    }

    pub fn from_chain_id(chain_id: u64) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|network| network.chain_id() == chain_id)
    }

    /// The `alloy-chains` representation, used for span fields.
    pub fn named_chain(&self) -> Option<NamedChain> {
        NamedChain::try_from(self.chain_id()).ok()
    }

    /// Query-parameter slug
    pub const fn slug(&self) -> &'static str {
        match self {
            Network::Ethereum => "ethereum",
            Network::Polygon => "polygon",
            Network::Arbitrum => "arbitrum",
            Network::Gnosis => "gnosis",
            Network::Optimism => "optimism",
            Network::PolygonZkEvm => "polygonzkevm",
            Network::Base => "base",
            Network::Avalanche => "avalanche",
            Network::Sepolia => "sepolia",
            Network::Goerli => "goerli",
        }
    }

    /// Chain identifier used by the DefiLlama coins API
    pub const fn defillama_slug(&self) -> &'static str {
        match self {
            Network::Ethereum => "ethereum",
            Network::Polygon => "polygon",
            Network::Arbitrum => "arbitrum",
            Network::Gnosis => "xdai",
            Network::Optimism => "optimism",
            Network::PolygonZkEvm => "polygon_zkevm",
            Network::Base => "base",
            Network::Avalanche => "avax",
            Network::Sepolia => "sepolia",
            Network::Goerli => "goerli",
        }
    }

    pub const fn is_testnet(&self) -> bool {
        matches!(self, Network::Sepolia | Network::Goerli)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Network {
    type Err = FieldIssue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if let Ok(chain_id) = value.parse::<u64>() {
            return Self::from_chain_id(chain_id)
                .ok_or_else(|| FieldIssue::new("network", format!("unsupported chain id {chain_id}")));
        }

        let lowered = value.to_ascii_lowercase();
        let alias = match lowered.as_str() {
            "mainnet" => "ethereum",
            "xdai" => "gnosis",
            "zkevm" | "polygon-zkevm" | "polygon_zkevm" => "polygonzkevm",
            "avax" => "avalanche",
            other => other,
        };

        Self::ALL
            .into_iter()
            .find(|network| network.slug() == alias)
            .ok_or_else(|| FieldIssue::new("network", format!("unknown network '{value}'")))
    }
}

impl TryFrom<NamedChain> for Network {
    type Error = FieldIssue;

    fn try_from(chain: NamedChain) -> Result<Self, Self::Error> {
        Self::from_chain_id(chain as u64)
            .ok_or_else(|| FieldIssue::new("network", format!("no Balancer deployment on {chain}")))
    }
}

impl Serialize for Network {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.chain_id().to_string())
    }
}

impl<'de> Deserialize<'de> for Network {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Id(u64),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Id(chain_id) => Self::from_chain_id(chain_id)
                .ok_or_else(|| D::Error::custom(format!("unsupported chain id {chain_id}"))),
            Repr::Text(text) => text.parse().map_err(D::Error::custom),
        }
    }
}
