use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::error::DashboardError;
use crate::models::{
    HistoricalPoint, HistoricalSeries, MintBurnPoint, NetworkMetrics, TokenBalance, TransferRecord,
};
use crate::networks::Network;
use crate::state::{DashboardState, Snapshot};
use crate::summary::{DashboardSummary, PegStatus};

type AppState = Arc<DashboardState>;

#[derive(Deserialize)]
pub struct TransferQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub message: String,
    pub status: u16,
}

impl From<DashboardError> for ApiError {
    fn from(err: DashboardError) -> Self {
        let status = match &err {
            DashboardError::UnknownNetwork(_) => StatusCode::NOT_FOUND,
            DashboardError::InvalidAddress(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::BAD_GATEWAY,
        };
        Self {
            message: err.to_string(),
            status: status.as_u16(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(|| async { "USDC Dashboard API running" }))
        .route("/state", get(get_state))
        .route("/metrics", get(get_metrics))
        .route("/metrics/:network", get(get_network_metrics))
        .route("/transfers", get(get_transfers))
        .route("/history/supply", get(get_supply_history))
        .route("/history/wallets", get(get_wallet_history))
        .route("/history/mint-burn", get(get_mint_burn))
        .route("/price", get(get_price))
        .route("/summary", get(get_summary))
        .route("/wallet/:address", get(get_wallet))
        .route("/refresh", post(refresh))
        .layer(cors)
        .with_state(state)
}

pub async fn serve(port: u16, state: AppState) -> eyre::Result<()> {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    info!("API listening on http://{}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router(state).into_make_service()).await?;

    Ok(())
}

// ---------- snapshot reads ----------

async fn get_state(State(state): State<AppState>) -> Json<Snapshot> {
    Json(state.snapshot().await)
}

async fn get_metrics(State(state): State<AppState>) -> Json<Vec<NetworkMetrics>> {
    Json(state.snapshot().await.network_metrics)
}

async fn get_transfers(
    State(state): State<AppState>,
    Query(q): Query<TransferQuery>,
) -> Json<Vec<TransferRecord>> {
    let mut transfers = state.snapshot().await.large_transfers;
    if let Some(limit) = q.limit {
        transfers.truncate(limit);
    }
    Json(transfers)
}

async fn get_supply_history(State(state): State<AppState>) -> Json<HistoricalSeries<HistoricalPoint>> {
    Json(state.snapshot().await.historical_supply)
}

async fn get_wallet_history(State(state): State<AppState>) -> Json<HistoricalSeries<HistoricalPoint>> {
    Json(state.snapshot().await.historical_wallet_count)
}

async fn get_mint_burn(State(state): State<AppState>) -> Json<HistoricalSeries<MintBurnPoint>> {
    Json(state.snapshot().await.mint_burn)
}

async fn get_price(State(state): State<AppState>) -> Json<PegStatus> {
    Json(PegStatus::from_price(state.snapshot().await.current_price))
}

async fn get_summary(State(state): State<AppState>) -> Json<DashboardSummary> {
    Json(DashboardSummary::from_snapshot(&state.snapshot().await))
}

// ---------- live lookups ----------

async fn get_network_metrics(
    State(state): State<AppState>,
    Path(network): Path<String>,
) -> Result<Json<NetworkMetrics>, ApiError> {
    Ok(Json(state.aggregator().get_network_metrics(&network).await?))
}

async fn get_wallet(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<BTreeMap<Network, Option<TokenBalance>>>, ApiError> {
    Ok(Json(state.aggregator().wallet_balances(&address).await?))
}

async fn refresh(State(state): State<AppState>) -> Json<Snapshot> {
    Json(state.refresh().await)
}
