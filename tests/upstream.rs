mod common;

use common::*;
use serde_json::json;
use usdc_dashboard::{
    aggregator::MetricsAggregator, networks::Network, transfers::TransferResolver, DashboardError,
};
use wiremock::{matchers::any, Mock, MockServer, ResponseTemplate};

fn aggregator(server: &MockServer) -> MetricsAggregator {
    let cfg = config(server);
    MetricsAggregator::new(client(&cfg), cfg.holders.clone())
}

fn resolver(server: &MockServer) -> TransferResolver {
    let cfg = config(server);
    TransferResolver::new(client(&cfg), cfg.holders.clone())
}

#[tokio::test]
async fn only_ethereum_answers() {
    let server = MockServer::start().await;

    balances_for(Network::Ethereum)
        .respond_with(
            ResponseTemplate::new(200).set_body_json(balance_body(Network::Ethereum, "5000000", None)),
        )
        .mount(&server)
        .await;
    // every other network falls through to wiremock's 404

    let metrics = aggregator(&server).get_all_networks_metrics().await;

    assert_eq!(metrics.len(), 1);
    assert_eq!(metrics[0].network, Network::Ethereum);
    assert_eq!(metrics[0].total_supply, 5.0);
    assert_eq!(metrics[0].price, 1.0);
}

#[tokio::test]
async fn zero_supply_hidden_next_to_nonzero() {
    let server = MockServer::start().await;

    balances_for(Network::Ethereum)
        .respond_with(
            ResponseTemplate::new(200).set_body_json(balance_body(Network::Ethereum, "5000000", None)),
        )
        .mount(&server)
        .await;
    balances_for(Network::Polygon)
        .respond_with(ResponseTemplate::new(200).set_body_json(balance_body(Network::Polygon, "0", None)))
        .mount(&server)
        .await;

    let metrics = aggregator(&server).get_all_networks_metrics().await;
    assert_eq!(metrics.len(), 1);
    assert!(metrics.iter().all(|m| m.total_supply > 0.0));
}

#[tokio::test]
async fn all_zero_supply_is_kept() {
    let server = MockServer::start().await;

    for network in [Network::Arbitrum, Network::Base] {
        balances_for(network)
            .respond_with(ResponseTemplate::new(200).set_body_json(balance_body(network, "0", None)))
            .mount(&server)
            .await;
    }

    let metrics = aggregator(&server).get_all_networks_metrics().await;
    let networks: Vec<Network> = metrics.iter().map(|m| m.network).collect();
    assert_eq!(networks, vec![Network::Arbitrum, Network::Base]);
}

#[tokio::test]
async fn holder_without_usdc_reports_zero_supply() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;

    let metrics = aggregator(&server).get_all_networks_metrics().await;

    let networks: Vec<Network> = metrics.iter().map(|m| m.network).collect();
    assert_eq!(networks, Network::ALL.to_vec());
    assert!(metrics.iter().all(|m| m.total_supply == 0.0 && m.price == 1.0));
}

#[tokio::test]
async fn bad_neighbour_row_does_not_hide_usdc() {
    let server = MockServer::start().await;

    balances_for(Network::Ethereum)
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "contract": "0xdead", "amount": "1", "decimals": null, "symbol": "SPAM" },
                {
                    "contract": usdc(Network::Ethereum),
                    "amount": "5000000",
                    "decimals": 6,
                    "symbol": "USDC"
                }
            ]
        })))
        .mount(&server)
        .await;

    let m = aggregator(&server)
        .network_metrics(Network::Ethereum)
        .await
        .unwrap();
    assert_eq!(m.total_supply, 5.0);
}

#[tokio::test]
async fn missing_usdc_entry_is_tagged() {
    let server = MockServer::start().await;

    balances_for(Network::Optimism)
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;

    let err = aggregator(&server)
        .network_metrics(Network::Optimism)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DashboardError::NoMatchingToken { network: Network::Optimism }
    ));
}

#[tokio::test]
async fn named_lookup_echoes_network_or_rejects_name() {
    let server = MockServer::start().await;
    let agg = aggregator(&server);

    for network in Network::ALL {
        // nothing mounted: upstream trouble degrades to a placeholder
        let m = agg.get_network_metrics(network.as_str()).await.unwrap();
        assert_eq!(m.network, network);
        assert_eq!(m.total_supply, 0.0);
    }

    let err = agg.get_network_metrics("dogechain").await.unwrap_err();
    assert!(matches!(err, DashboardError::UnknownNetwork(_)));
}

#[tokio::test]
async fn server_errors_are_retried() {
    let server = MockServer::start().await;

    balances_for(Network::Base)
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    balances_for(Network::Base)
        .respond_with(
            ResponseTemplate::new(200).set_body_json(balance_body(Network::Base, "12500000", Some(0.9997))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let m = aggregator(&server).network_metrics(Network::Base).await.unwrap();
    assert_eq!(m.total_supply, 12.5);
    assert_eq!(m.price, 0.9997);
}

#[tokio::test]
async fn auth_failures_are_not_retried() {
    let server = MockServer::start().await;

    balances_for(Network::Ethereum)
        .respond_with(ResponseTemplate::new(401).set_body_string("bad token"))
        .expect(1)
        .mount(&server)
        .await;

    let err = aggregator(&server)
        .network_metrics(Network::Ethereum)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert!(matches!(err, DashboardError::UpstreamHttp { ref body, .. } if body == "bad token"));
}

#[tokio::test]
async fn price_falls_back_to_peg() {
    let server = MockServer::start().await;
    let agg = aggregator(&server);
    assert_eq!(agg.current_price(Network::Ethereum).await, 1.0);

    balances_for(Network::Ethereum)
        .respond_with(
            ResponseTemplate::new(200).set_body_json(balance_body(Network::Ethereum, "1", Some(0.9981))),
        )
        .mount(&server)
        .await;
    assert_eq!(agg.current_price(Network::Ethereum).await, 0.9981);
}

#[tokio::test]
async fn transfers_come_from_first_non_empty_network() {
    let server = MockServer::start().await;

    transfers_for(Network::Ethereum)
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&server)
        .await;
    transfers_for(Network::Polygon)
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                transfer(Network::Polygon, "USDC", "1000000", "0xsmall"),
                transfer(Network::Polygon, "USDT", "900000000000", "0xtether"),
                transfer(Network::Ethereum, "USDC", "800000000000", "0xwrongchain"),
                transfer(Network::Polygon, "USDC", "7500000000", "0xbig"),
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;
    transfers_for(Network::Arbitrum)
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [transfer(Network::Arbitrum, "USDC", "1", "0xnever")]
        })))
        .expect(0)
        .mount(&server)
        .await;

    let transfers = resolver(&server).get_large_transfers(10).await;

    let ids: Vec<&str> = transfers.iter().map(|t| t.transaction_id.as_str()).collect();
    assert_eq!(ids, vec!["0xbig", "0xsmall"]);
    assert!(transfers.iter().all(|t| t.network == Network::Polygon));
    assert_eq!(transfers[0].amount, 7500.0);
    assert_eq!(transfers[0].timestamp, "2025-05-14 17:50:11");
}

#[tokio::test]
async fn transfers_empty_when_nothing_answers() {
    let server = MockServer::start().await;
    assert!(resolver(&server).get_large_transfers(10).await.is_empty());
}

#[tokio::test]
async fn wallet_lookup_validates_and_queries_every_network() {
    let server = MockServer::start().await;
    let agg = aggregator(&server);

    let err = agg.wallet_balances("0x1234").await.unwrap_err();
    assert!(matches!(err, DashboardError::InvalidAddress(_)));

    balances_for(Network::Arbitrum)
        .respond_with(
            ResponseTemplate::new(200).set_body_json(balance_body(Network::Arbitrum, "42000000", None)),
        )
        .mount(&server)
        .await;

    let found = agg
        .wallet_balances("0x2A0C0DBECC7E4D658F48E01E3FA353F44050C208")
        .await
        .unwrap();
    assert_eq!(found.len(), 5);
    assert_eq!(found[&Network::Arbitrum].as_ref().unwrap().amount, "42000000");
    assert!(found[&Network::Ethereum].is_none());
}
