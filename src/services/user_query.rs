use std::sync::Arc;

use serde::Serialize;

use crate::{
    database::{AccountStore, UserListQuery},
    errors::{AppError, Result},
    models::{ExportRequest, FetchRequest, UpdateUserRequest, User, UserChanges, UserRecord},
    services::{
        filter::{build_predicates, parse_filters},
        plan_annotator,
    },
    utils::{gib_to_bytes, hash_password},
};

pub const MIN_PAGE_SIZE: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Id,
    Email,
    TransferEnable,
    U,
    D,
    ExpiredAt,
    PlanId,
    Banned,
    CreatedAt,
    UpdatedAt,
}

impl SortColumn {
    fn parse(field: &str) -> Option<Self> {
        match field {
            "id" => Some(Self::Id),
            "email" => Some(Self::Email),
            "transfer_enable" => Some(Self::TransferEnable),
            "u" => Some(Self::U),
            "d" => Some(Self::D),
            "expired_at" => Some(Self::ExpiredAt),
            "plan_id" => Some(Self::PlanId),
            "banned" => Some(Self::Banned),
            "created_at" => Some(Self::CreatedAt),
            "updated_at" => Some(Self::UpdatedAt),
            _ => None,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Email => "email",
            Self::TransferEnable => "transfer_enable",
            Self::U => "u",
            Self::D => "d",
            Self::ExpiredAt => "expired_at",
            Self::PlanId => "plan_id",
            Self::Banned => "banned",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Only the exact strings `ASC` and `DESC` are recognised; anything else
    /// falls back to descending.
    fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("ASC") => Self::Asc,
            _ => Self::Desc,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ordering {
    pub column: SortColumn,
    pub direction: SortDirection,
}

/// 1-based page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: i64,
    pub size: i64,
}

impl Page {
    /// Missing or non-positive page numbers become 1; sizes below
    /// `MIN_PAGE_SIZE` become `MIN_PAGE_SIZE`. Larger values are accepted as is.
    pub fn from_params(current: Option<i64>, page_size: Option<i64>) -> Self {
        let number = current.filter(|n| *n > 0).unwrap_or(1);
        let size = page_size.filter(|s| *s >= MIN_PAGE_SIZE).unwrap_or(MIN_PAGE_SIZE);
        Self { number, size }
    }

    pub fn offset(&self) -> i64 {
        (self.number - 1).saturating_mul(self.size)
    }
}

#[derive(Debug, Serialize)]
pub struct UserPage {
    pub data: Vec<UserRecord>,
    pub total: i64,
}

pub struct UserQueryService {
    store: Arc<dyn AccountStore>,
    hash_cost: u32,
}

impl UserQueryService {
    pub fn new(store: Arc<dyn AccountStore>, hash_cost: u32) -> Self {
        Self { store, hash_cost }
    }

    /// Validates the request and turns it into a store query.
    pub fn list_query(request: FetchRequest) -> Result<UserListQuery> {
        let column = match request.sort.as_deref() {
            None | Some("") => SortColumn::CreatedAt,
            Some(field) => SortColumn::parse(field)
                .ok_or_else(|| AppError::Validation(format!("排序字段不支持: {}", field)))?,
        };
        let direction = SortDirection::from_param(request.sort_type.as_deref());
        let clauses = parse_filters(request.filter)?;

        Ok(UserListQuery {
            predicates: build_predicates(&clauses)?,
            ordering: Some(Ordering { column, direction }),
            page: Some(Page::from_params(request.current, request.page_size)),
        })
    }

    /// One page of users plus the size of the whole filtered set.
    pub async fn fetch(&self, request: FetchRequest) -> Result<UserPage> {
        let query = Self::list_query(request)?;

        let total = self.store.count_users(&query.predicates).await?;
        let users = self.store.list_users(&query).await?;
        let plans = self.store.list_plans().await?;

        tracing::debug!(total, returned = users.len(), "fetched users");

        Ok(UserPage {
            data: plan_annotator::annotate(users, &plans),
            total,
        })
    }

    /// Every user matching the filters, unpaginated.
    pub async fn export(&self, request: ExportRequest) -> Result<UserPage> {
        let clauses = parse_filters(request.filter)?;
        let query = UserListQuery {
            predicates: build_predicates(&clauses)?,
            ordering: None,
            page: None,
        };

        let users = self.store.list_users(&query).await?;
        let plans = self.store.list_plans().await?;
        let total = users.len() as i64;

        tracing::info!(total, "exported users");

        Ok(UserPage {
            data: plan_annotator::annotate(users, &plans),
            total,
        })
    }

    /// Looks up a user by the raw `id` parameter. A missing, empty or
    /// non-numeric id is rejected before touching the store.
    pub async fn get_by_id(&self, id: Option<&str>) -> Result<Option<User>> {
        let id: i64 = id
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|s| s.parse().ok())
            .ok_or(AppError::InvalidParams)?;

        self.store.find_user(id).await
    }

    pub async fn update(&self, request: UpdateUserRequest) -> Result<()> {
        let id = request.id.ok_or(AppError::InvalidParams)?;

        if self.store.find_user(id).await?.is_none() {
            return Err(AppError::UserNotFound);
        }

        let mut changes = UserChanges {
            email: request.email,
            transfer_enable: request.transfer_enable.map(gib_to_bytes),
            u: request.u,
            d: request.d,
            expired_at: request.expired_at,
            banned: request.banned,
            remarks: request.remarks,
            speed_limit: request.speed_limit,
            updated_at: chrono::Utc::now().timestamp(),
            ..Default::default()
        };

        if let Some(password) = request.password.filter(|p| !p.is_empty()) {
            let cost = self.hash_cost;
            let hash = tokio::task::spawn_blocking(move || hash_password(&password, cost))
                .await
                .map_err(|e| anyhow::anyhow!("hashing task failed: {}", e))??;
            changes.password_hash = Some(hash);
        }

        if let Some(plan_id) = request.plan_id {
            let plan = self
                .store
                .find_plan(plan_id)
                .await?
                .ok_or(AppError::PlanNotFound)?;
            changes.plan_id = Some(plan.id);
            changes.group_id = Some(plan.group_id);
        }

        // Duplicate emails are rejected by the unique index, not a pre-check.
        match self.store.update_user(id, &changes).await {
            Ok(()) => {
                tracing::info!(user_id = id, "user updated");
                Ok(())
            }
            Err(AppError::EmailInUse) => Err(AppError::EmailInUse),
            Err(e) => {
                tracing::error!(user_id = id, error = %e, "failed to save user");
                Err(AppError::SaveFailed)
            }
        }
    }
}
