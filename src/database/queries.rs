use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    database::{AccountStore, Database, UserListQuery},
    errors::{is_unique_violation, AppError, Result},
    models::{NewUser, Plan, User, UserChanges},
    services::filter::{push_predicates, Predicate},
};

const USER_COLUMNS: &str = "id, email, password, password_algo, plan_id, group_id, \
    transfer_enable, u, d, expired_at, uuid, token, banned, remarks, speed_limit, \
    created_at, updated_at";

const PLAN_COLUMNS: &str = "id, name, group_id, transfer_enable, created_at, updated_at";

fn map_write_error(err: sqlx::Error) -> AppError {
    if is_unique_violation(&err) {
        AppError::EmailInUse
    } else {
        AppError::Database(err)
    }
}

pub struct UserQueries;

impl UserQueries {
    pub async fn count(pool: &PgPool, predicates: &[Predicate]) -> Result<i64> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM users WHERE 1=1");
        push_predicates(&mut query, predicates);

        let count: i64 = query.build_query_scalar().fetch_one(pool).await?;
        Ok(count)
    }

    pub async fn list(pool: &PgPool, list: &UserListQuery) -> Result<Vec<User>> {
        let mut query = Self::select_builder(list);

        tracing::debug!(sql = query.sql(), "listing users");

        let users = query.build_query_as::<User>().fetch_all(pool).await?;
        Ok(users)
    }

    /// Builds the SELECT for a list query without executing it.
    pub fn select_builder(list: &UserListQuery) -> QueryBuilder<'static, Postgres> {
        let mut query =
            QueryBuilder::<Postgres>::new(format!("SELECT {} FROM users WHERE 1=1", USER_COLUMNS));
        push_predicates(&mut query, &list.predicates);

        if let Some(ordering) = list.ordering {
            let direction = ordering.direction.as_sql();
            query
                .push(" ORDER BY ")
                .push(ordering.column.as_sql())
                .push(" ")
                .push(direction)
                .push(", id ")
                .push(direction);
        }

        if let Some(page) = list.page {
            query.push(" LIMIT ").push_bind(page.size);
            query.push(" OFFSET ").push_bind(page.offset());
        }

        query
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    pub async fn update(pool: &PgPool, id: i64, changes: &UserChanges) -> Result<()> {
        let mut query = Self::update_builder(id, changes);
        query.build().execute(pool).await.map_err(map_write_error)?;
        Ok(())
    }

    /// `UPDATE` touching only the columns present in `changes`, plus `updated_at`.
    pub fn update_builder(id: i64, changes: &UserChanges) -> QueryBuilder<'static, Postgres> {
        let mut query = QueryBuilder::<Postgres>::new("UPDATE users SET ");
        {
            let mut set = query.separated(", ");
            if let Some(email) = &changes.email {
                set.push("email = ").push_bind_unseparated(email.clone());
            }
            if let Some(hash) = &changes.password_hash {
                set.push("password = ").push_bind_unseparated(hash.clone());
                set.push("password_algo = NULL");
            }
            if let Some(transfer_enable) = changes.transfer_enable {
                set.push("transfer_enable = ").push_bind_unseparated(transfer_enable);
            }
            if let Some(u) = changes.u {
                set.push("u = ").push_bind_unseparated(u);
            }
            if let Some(d) = changes.d {
                set.push("d = ").push_bind_unseparated(d);
            }
            if let Some(expired_at) = changes.expired_at {
                set.push("expired_at = ").push_bind_unseparated(expired_at);
            }
            if let Some(plan_id) = changes.plan_id {
                set.push("plan_id = ").push_bind_unseparated(plan_id);
            }
            if let Some(group_id) = changes.group_id {
                set.push("group_id = ").push_bind_unseparated(group_id);
            }
            if let Some(banned) = changes.banned {
                set.push("banned = ").push_bind_unseparated(banned);
            }
            if let Some(remarks) = &changes.remarks {
                set.push("remarks = ").push_bind_unseparated(remarks.clone());
            }
            if let Some(speed_limit) = changes.speed_limit {
                set.push("speed_limit = ").push_bind_unseparated(speed_limit);
            }
            set.push("updated_at = ").push_bind_unseparated(changes.updated_at);
        }
        query.push(" WHERE id = ").push_bind(id);
        query
    }

    pub async fn insert(pool: &PgPool, user: &NewUser) -> Result<()> {
        let mut query = Self::insert_builder(std::slice::from_ref(user));
        query.build().execute(pool).await.map_err(map_write_error)?;
        Ok(())
    }

    /// Inserts every row in one statement inside a transaction. Any failure
    /// rolls the transaction back, so either all rows land or none do.
    pub async fn insert_many(pool: &PgPool, users: &[NewUser]) -> Result<()> {
        if users.is_empty() {
            return Ok(());
        }

        let mut tx = pool.begin().await?;
        let mut query = Self::insert_builder(users);

        match query.build().execute(&mut *tx).await {
            Ok(result) => {
                tx.commit().await?;
                tracing::debug!(rows = result.rows_affected(), "batch insert committed");
                Ok(())
            }
            Err(e) => {
                tx.rollback().await?;
                Err(map_write_error(e))
            }
        }
    }

    fn insert_builder(users: &[NewUser]) -> QueryBuilder<'static, Postgres> {
        let mut query = QueryBuilder::<Postgres>::new(
            "INSERT INTO users (email, password, plan_id, group_id, transfer_enable, \
             expired_at, uuid, token, created_at, updated_at) ",
        );
        query.push_values(users, |mut row, user| {
            row.push_bind(user.email.clone())
                .push_bind(user.password.clone())
                .push_bind(user.plan_id)
                .push_bind(user.group_id)
                .push_bind(user.transfer_enable)
                .push_bind(user.expired_at)
                .push_bind(user.uuid.clone())
                .push_bind(user.token.clone())
                .push_bind(user.created_at)
                .push_bind(user.updated_at);
        });
        query
    }
}

pub struct PlanQueries;

impl PlanQueries {
    pub async fn list(pool: &PgPool) -> Result<Vec<Plan>> {
        let sql = format!("SELECT {} FROM plans ORDER BY id", PLAN_COLUMNS);
        let plans = sqlx::query_as::<_, Plan>(&sql).fetch_all(pool).await?;
        Ok(plans)
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Plan>> {
        let sql = format!("SELECT {} FROM plans WHERE id = $1", PLAN_COLUMNS);
        let plan = sqlx::query_as::<_, Plan>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(plan)
    }
}

#[async_trait]
impl AccountStore for Database {
    async fn count_users(&self, predicates: &[Predicate]) -> Result<i64> {
        UserQueries::count(self.pool(), predicates).await
    }

    async fn list_users(&self, query: &UserListQuery) -> Result<Vec<User>> {
        UserQueries::list(self.pool(), query).await
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>> {
        UserQueries::find_by_id(self.pool(), id).await
    }

    async fn update_user(&self, id: i64, changes: &UserChanges) -> Result<()> {
        UserQueries::update(self.pool(), id, changes).await
    }

    async fn insert_user(&self, user: &NewUser) -> Result<()> {
        UserQueries::insert(self.pool(), user).await
    }

    async fn insert_users(&self, users: &[NewUser]) -> Result<()> {
        UserQueries::insert_many(self.pool(), users).await
    }

    async fn list_plans(&self) -> Result<Vec<Plan>> {
        PlanQueries::list(self.pool()).await
    }

    async fn find_plan(&self, id: i64) -> Result<Option<Plan>> {
        PlanQueries::find_by_id(self.pool(), id).await
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(self.pool()).await?;
        Ok(())
    }
}
