use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    errors::Result,
    models::{NewUser, Plan, User, UserChanges},
    services::{
        filter::Predicate,
        user_query::{Ordering, Page},
    },
};

pub mod queries;

/// Selection over the `users` table: filter, then order, then page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserListQuery {
    pub predicates: Vec<Predicate>,
    pub ordering: Option<Ordering>,
    pub page: Option<Page>,
}

/// Persistence operations the admin services need.
///
/// `update_user` and `insert_user` report a duplicate email as
/// `AppError::EmailInUse`; `insert_users` is all-or-nothing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn count_users(&self, predicates: &[Predicate]) -> Result<i64>;

    async fn list_users(&self, query: &UserListQuery) -> Result<Vec<User>>;

    async fn find_user(&self, id: i64) -> Result<Option<User>>;

    async fn update_user(&self, id: i64, changes: &UserChanges) -> Result<()>;

    async fn insert_user(&self, user: &NewUser) -> Result<()>;

    async fn insert_users(&self, users: &[NewUser]) -> Result<()>;

    async fn list_plans(&self) -> Result<Vec<Plan>>;

    async fn find_plan(&self, id: i64) -> Result<Option<Plan>>;

    async fn ping(&self) -> Result<()>;
}

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| anyhow::anyhow!("migration failed: {}", e))?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
