use futures_util::future::join_all;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::client::TokenApiClient;
use crate::error::{DashboardError, Result};
use crate::models::{NetworkMetrics, TokenBalance};
use crate::networks::{parse_address, Holders, Network};
use crate::parser;

/// Outcome of one concurrent sweep over every network.
#[derive(Debug, Default)]
pub struct MetricsReport {
    pub metrics: Vec<NetworkMetrics>,
    pub failures: Vec<(Network, DashboardError)>,
}

impl MetricsReport {
    /// Nothing succeeded and at least one network reported why.
    pub fn fully_failed(&self) -> bool {
        self.metrics.is_empty() && !self.failures.is_empty()
    }

    /// Successful records, restricted to nonzero supply whenever any network has some.
    pub fn display_metrics(&self) -> Vec<NetworkMetrics> {
        let nonzero: Vec<NetworkMetrics> = self
            .metrics
            .iter()
            .filter(|m| m.total_supply > 0.0)
            .cloned()
            .collect();

        if nonzero.is_empty() {
            self.metrics.clone()
        } else {
            nonzero
        }
    }
}

#[derive(Debug, Clone)]
pub struct MetricsAggregator {
    client: Arc<TokenApiClient>,
    holders: Holders,
}

impl MetricsAggregator {
    pub fn new(client: Arc<TokenApiClient>, holders: Holders) -> Self {
        Self { client, holders }
    }

    /// Sample the representative holder's USDC balance on `network`.
    /// Failures come back tagged instead of zeroed.
    pub async fn network_metrics(&self, network: Network) -> Result<NetworkMetrics> {
        let holder = self.holders.for_network(network);
        let balances = self.client.balances(holder, network).await?;

        let usdc = parser::find_usdc(network, &balances)
            .ok_or(DashboardError::NoMatchingToken { network })?;

        parser::balance_to_metrics(network, usdc)
    }

    /// Metrics for a network by name. Only an unknown name is an error;
    /// upstream trouble yields a zeroed placeholder.
    pub async fn get_network_metrics(&self, name: &str) -> Result<NetworkMetrics> {
        let network: Network = name.parse()?;

        match self.network_metrics(network).await {
            Ok(m) => Ok(m),
            Err(e) => {
                warn!("Metrics for {} unavailable, using placeholder: {}", network, e);
                Ok(NetworkMetrics::placeholder(network))
            }
        }
    }

    pub async fn collect_metrics(&self) -> MetricsReport {
        let results = join_all(
            Network::ALL.map(|network| async move { (network, self.network_metrics(network).await) }),
        )
        .await;

        let mut report = MetricsReport::default();
        for (network, result) in results {
            match result {
                Ok(m) => {
                    info!("💰 {} USDC sample supply = {}", network, m.total_supply);
                    report.metrics.push(m);
                }
                // answered, but the holder has no USDC there
                Err(DashboardError::NoMatchingToken { .. }) => {
                    info!("💰 {} holds no USDC, reporting zero supply", network);
                    report.metrics.push(NetworkMetrics::placeholder(network));
                }
                Err(e) => {
                    warn!("Dropping {} from metrics: {}", network, e);
                    report.failures.push((network, e));
                }
            }
        }
        report
    }

    pub async fn get_all_networks_metrics(&self) -> Vec<NetworkMetrics> {
        self.collect_metrics().await.display_metrics()
    }

    /// Upstream USDC price on `network`, 1.0 when absent or unreachable.
    pub async fn current_price(&self, network: Network) -> f64 {
        match self.network_metrics(network).await {
            Ok(m) => m.price,
            Err(e) => {
                warn!("Price lookup on {} failed, assuming peg: {}", network, e);
                1.0
            }
        }
    }

    /// USDC holding of an arbitrary wallet on every network, `None` where unavailable.
    pub async fn wallet_balances(
        &self,
        address: &str,
    ) -> Result<BTreeMap<Network, Option<TokenBalance>>> {
        let address = format!("{:#x}", parse_address(address)?);

        let lookups = Network::ALL.map(|network| {
            let address = address.as_str();
            async move {
                let found = match self.client.balances(address, network).await {
                    Ok(list) => parser::find_usdc(network, &list).cloned(),
                    Err(e) => {
                        warn!("Wallet lookup on {} failed: {}", network, e);
                        None
                    }
                };
                (network, found)
            }
        });

        Ok(join_all(lookups).await.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(network: Network, supply: f64) -> NetworkMetrics {
        NetworkMetrics {
            total_supply: supply,
            ..NetworkMetrics::placeholder(network)
        }
    }

    #[test]
    fn zero_entries_hidden_when_any_supply_exists() {
        let report = MetricsReport {
            metrics: vec![
                metrics(Network::Ethereum, 5.0),
                metrics(Network::Polygon, 0.0),
                metrics(Network::Base, 2.0),
            ],
            failures: vec![],
        };
        let shown = report.display_metrics();
        assert_eq!(shown.len(), 2);
        assert!(shown.iter().all(|m| m.total_supply > 0.0));
    }

    #[test]
    fn all_zero_entries_kept() {
        let report = MetricsReport {
            metrics: vec![metrics(Network::Ethereum, 0.0), metrics(Network::Polygon, 0.0)],
            failures: vec![],
        };
        assert_eq!(report.display_metrics().len(), 2);
    }

    #[test]
    fn fully_failed_needs_a_failure() {
        assert!(!MetricsReport::default().fully_failed());
        let report = MetricsReport {
            metrics: vec![],
            failures: vec![(Network::Base, DashboardError::MissingCredential)],
        };
        assert!(report.fully_failed());
    }
}
