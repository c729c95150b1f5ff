use crate::{config::Config, database::AccountStore, services::metrics::MetricsService};
use std::sync::Arc;

pub mod extract;
pub mod health;
pub mod metrics;
pub mod response;
pub mod users;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AccountStore>,
    pub config: Config,
    pub metrics: Arc<MetricsService>,
}
