use std::sync::Arc;

use crate::{
    config::Config,
    database::MockAccountStore,
    handlers::AppState,
    models::{Plan, User},
    services::metrics::MetricsService,
};

pub fn user(id: i64, email: &str) -> User {
    User {
        id,
        email: email.to_string(),
        password: "$2b$04$notarealhash".to_string(),
        password_algo: None,
        plan_id: None,
        group_id: None,
        transfer_enable: 0,
        u: 0,
        d: 0,
        expired_at: None,
        uuid: format!("00000000-0000-4000-8000-{:012}", id),
        token: format!("{:032x}", id),
        banned: false,
        remarks: None,
        speed_limit: None,
        created_at: 1_700_000_000,
        updated_at: 1_700_000_000,
    }
}

pub fn plan(id: i64, name: &str, group_id: i64, transfer_enable: i64) -> Plan {
    Plan {
        id,
        name: name.to_string(),
        group_id,
        transfer_enable,
        created_at: 1_700_000_000,
        updated_at: 1_700_000_000,
    }
}

pub fn state_with(store: MockAccountStore) -> AppState {
    AppState {
        store: Arc::new(store),
        config: Config {
            password_hash_cost: 4,
            ..Config::default()
        },
        metrics: Arc::new(MetricsService::new().unwrap()),
    }
}
