use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::client::TokenApiClient;
use crate::models::TransferRecord;
use crate::networks::{Holders, Network};
use crate::parser;

#[derive(Debug, Clone)]
pub struct TransferResolver {
    client: Arc<TokenApiClient>,
    holders: Holders,
}

impl TransferResolver {
    pub fn new(client: Arc<TokenApiClient>, holders: Holders) -> Self {
        Self { client, holders }
    }

    /// Recent USDC transfers from the first network (in `Network::ALL` order)
    /// whose transfer list comes back non-empty. Results are never merged across
    /// networks; when nothing answers the list is empty.
    pub async fn get_large_transfers(&self, limit: u32) -> Vec<TransferRecord> {
        for network in Network::ALL {
            let holder = self.holders.for_network(network);

            let raw = match self.client.transfers(holder, network, limit).await {
                Ok(raw) => raw,
                Err(e) => {
                    warn!("Transfer lookup on {} failed: {}", network, e);
                    continue;
                }
            };

            if raw.is_empty() {
                debug!("No transfers on {}, trying next network", network);
                continue;
            }

            let mut records: Vec<TransferRecord> = raw
                .iter()
                .filter_map(|t| parser::decode_transfer(network, t))
                .collect();

            // largest first
            records.sort_by(|a, b| b.amount.total_cmp(&a.amount));
            records.truncate(limit as usize);

            info!("🔁 {} USDC transfers from {}", records.len(), network);
            return records;
        }

        warn!("No network returned transfers");
        Vec::new()
    }
}
