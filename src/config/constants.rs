// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Well-known addresses and endpoints
//!
//! Centralizes the contract addresses and default service URLs used by the
//! APR sources. Every URL here can be overridden through [`super::AprConfig`].

use alloy_primitives::{address, Address};

use crate::types::network::Network;

/// Balancer contracts on Ethereum mainnet
pub mod contracts {
    use super::*;

    /// BAL token on Ethereum mainnet
    ///
    /// Contract: 0xba100000625a3754423978a60c9317c58a424e3d
    pub const BAL: Address = address!("ba100000625a3754423978a60c9317c58a424e3d");

    /// veBAL GaugeController
    ///
    /// Contract: 0xC128468b7Ce63eA702C1f104D55A2566b13D3ABD
    pub const GAUGE_CONTROLLER: Address = address!("c128468b7ce63ea702c1f104d55a2566b13d3abd");
}

/// Default service endpoints
pub mod endpoints {
    use super::*;

    pub const DEFILLAMA_COINS: &str = "https://coins.llama.fi";

    pub const MAINNET_RPC: &str = "https://eth.llamarpc.com";

    /// Balancer voting-gauge list
    pub const VOTING_GAUGES: &str =
        "https://raw.githubusercontent.com/balancer/frontend-v2/master/src/data/voting-gauges.json";

    /// Balancer v2 subgraph for a network
    pub const fn subgraph(network: Network) -> &'static str {
        match network {
            Network::Ethereum => {
                "https://api.thegraph.com/subgraphs/name/balancer-labs/balancer-v2"
            }
            Network::Polygon => {
                "https://api.thegraph.com/subgraphs/name/balancer-labs/balancer-polygon-v2"
            }
            Network::Arbitrum => {
                "https://api.thegraph.com/subgraphs/name/balancer-labs/balancer-arbitrum-v2"
            }
            Network::Gnosis => {
                "https://api.thegraph.com/subgraphs/name/balancer-labs/balancer-gnosis-chain-v2"
            }
            Network::Optimism => {
                "https://api.thegraph.com/subgraphs/name/beethovenxfi/beethovenx-optimism"
            }
            Network::PolygonZkEvm => {
                "https://api.studio.thegraph.com/query/24660/balancer-polygon-zk-v2/version/latest"
            }
            Network::Base => {
                "https://api.studio.thegraph.com/query/24660/balancer-base-v2/version/latest"
            }
            Network::Avalanche => {
                "https://api.thegraph.com/subgraphs/name/balancer-labs/balancer-avalanche-v2"
            }
            Network::Sepolia => {
                "https://api.studio.thegraph.com/query/24660/balancer-sepolia-v2/version/latest"
            }
            Network::Goerli => {
                "https://api.thegraph.com/subgraphs/name/balancer-labs/balancer-goerli-v2"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bal_address() {
        assert_eq!(
            contracts::BAL,
            address!("ba100000625a3754423978a60c9317c58a424e3d")
        );
    }

    #[test]
    fn test_every_network_has_a_subgraph() {
        for network in Network::ALL {
            assert!(
                endpoints::subgraph(network).starts_with("https://"),
                "missing subgraph for {network}"
            );
        }
    }
}
