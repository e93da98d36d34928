pub mod aggregator;
pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod history;
pub mod models;
pub mod networks;
pub mod parser;
pub mod retry;
pub mod state;
pub mod summary;
pub mod transfers;

pub use error::{DashboardError, LoadFailure};
pub use state::{DashboardState, Phase, Snapshot};
