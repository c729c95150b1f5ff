use anyhow::Result;
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub database_max_connections: u32,
    pub password_hash_cost: u32,
    pub batch_generate_limit: u32,
    pub random_prefix_length: usize,
    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgresql://localhost/account_admin".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()?,
            password_hash_cost: env::var("PASSWORD_HASH_COST")
                .unwrap_or_else(|_| "10".to_string())
                .parse()?,
            batch_generate_limit: env::var("BATCH_GENERATE_LIMIT")
                .unwrap_or_else(|_| "500".to_string())
                .parse()?,
            random_prefix_length: env::var("RANDOM_PREFIX_LENGTH")
                .unwrap_or_else(|_| "6".to_string())
                .parse()?,
            run_migrations: env::var("RUN_MIGRATIONS")
                .unwrap_or_else(|_| "true".to_string())
                .parse()?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_url: "postgresql://localhost/account_admin".to_string(),
            port: 3000,
            database_max_connections: 20,
            password_hash_cost: 10,
            batch_generate_limit: 500,
            random_prefix_length: 6,
            run_migrations: true,
        }
    }
}
