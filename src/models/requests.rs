use serde::{Deserialize, Deserializer};

/// Filter clause exactly as the client sent it. Shape is checked when it is
/// converted into a `FilterClause`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFilterClause {
    pub key: Option<String>,
    pub condition: Option<String>,
    pub value: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FetchRequest {
    pub current: Option<i64>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<i64>,
    pub sort: Option<String>,
    pub sort_type: Option<String>,
    #[serde(default)]
    pub filter: Vec<RawFilterClause>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExportRequest {
    #[serde(default)]
    pub filter: Vec<RawFilterClause>,
}

#[derive(Debug, Deserialize)]
pub struct UserInfoQuery {
    pub id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub id: Option<i64>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// GiB.
    pub transfer_enable: Option<f64>,
    pub u: Option<i64>,
    pub d: Option<i64>,
    #[serde(default, deserialize_with = "double_option")]
    pub expired_at: Option<Option<i64>>,
    pub plan_id: Option<i64>,
    pub banned: Option<bool>,
    pub remarks: Option<String>,
    pub speed_limit: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    pub email_prefix: Option<String>,
    pub email_suffix: Option<String>,
    pub count: Option<u32>,
    pub plan_id: Option<i64>,
    pub password: Option<String>,
    pub expired_at: Option<i64>,
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}
