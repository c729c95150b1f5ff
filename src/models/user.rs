use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(skip_serializing)]
    pub password_algo: Option<String>,
    pub plan_id: Option<i64>,
    pub group_id: Option<i64>,
    /// Quota in bytes.
    pub transfer_enable: i64,
    pub u: i64,
    pub d: i64,
    pub expired_at: Option<i64>,
    pub uuid: String,
    pub token: String,
    pub banned: bool,
    pub remarks: Option<String>,
    pub speed_limit: Option<i32>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A user row as returned by the list endpoints, optionally carrying the
/// display name of its plan. Rows without a matching plan omit the field.
#[derive(Debug, Clone, Serialize)]
pub struct UserRecord {
    #[serde(flatten)]
    pub user: User,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_name: Option<String>,
}

impl From<User> for UserRecord {
    fn from(user: User) -> Self {
        Self {
            user,
            plan_name: None,
        }
    }
}

/// Row to insert for a freshly generated account. `password` is already hashed.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub plan_id: Option<i64>,
    pub group_id: Option<i64>,
    pub transfer_enable: i64,
    pub expired_at: Option<i64>,
    pub uuid: String,
    pub token: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Partial change set applied by the update endpoint. `None` leaves a column
/// untouched; `expired_at: Some(None)` clears the expiry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChanges {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub transfer_enable: Option<i64>,
    pub u: Option<i64>,
    pub d: Option<i64>,
    pub expired_at: Option<Option<i64>>,
    pub plan_id: Option<i64>,
    pub group_id: Option<i64>,
    pub banned: Option<bool>,
    pub remarks: Option<String>,
    pub speed_limit: Option<i32>,
    pub updated_at: i64,
}
