use serde::Serialize;
use sqlx::FromRow;

/// Subscription tier. Read-only from the admin user endpoints.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Plan {
    pub id: i64,
    pub name: String,
    pub group_id: i64,
    /// Quota in GiB.
    pub transfer_enable: i64,
    pub created_at: i64,
    pub updated_at: i64,
}
