use std::sync::Arc;

use crate::{
    database::AccountStore,
    errors::{AppError, Result},
    models::{GenerateRequest, NewUser, Plan},
    services::transcript::{CsvTranscript, TranscriptRow},
    utils::{generate_token, generate_uuid, hash_password, random_char, whole_gib_to_bytes},
};

#[derive(Debug)]
pub enum GenerateOutcome {
    Single,
    Batch(CsvTranscript),
}

/// Settings shared by every generation request.
#[derive(Debug, Clone, Copy)]
pub struct GeneratorSettings {
    pub hash_cost: u32,
    pub batch_limit: u32,
    pub prefix_length: usize,
}

/// Fields every generated account in one request has in common.
#[derive(Debug, Clone, Default, PartialEq)]
struct AccountTemplate {
    plan_id: Option<i64>,
    group_id: Option<i64>,
    transfer_enable: i64,
    expired_at: Option<i64>,
}

impl AccountTemplate {
    fn new(plan: Option<&Plan>, expired_at: Option<i64>) -> Self {
        match plan {
            Some(plan) => Self {
                plan_id: Some(plan.id),
                group_id: Some(plan.group_id),
                transfer_enable: whole_gib_to_bytes(plan.transfer_enable),
                expired_at,
            },
            None => Self {
                expired_at,
                ..Default::default()
            },
        }
    }

    /// `password` is plaintext; the stored value is its bcrypt hash.
    fn build(&self, email: String, password: &str, cost: u32, now: i64) -> Result<NewUser> {
        Ok(NewUser {
            password: hash_password(password, cost)?,
            email,
            plan_id: self.plan_id,
            group_id: self.group_id,
            transfer_enable: self.transfer_enable,
            expired_at: self.expired_at,
            uuid: generate_uuid(),
            token: generate_token(),
            created_at: now,
            updated_at: now,
        })
    }
}

pub struct AccountGenerator {
    store: Arc<dyn AccountStore>,
    settings: GeneratorSettings,
}

impl AccountGenerator {
    pub fn new(store: Arc<dyn AccountStore>, settings: GeneratorSettings) -> Self {
        Self { store, settings }
    }

    /// `email_prefix` selects single generation, otherwise `count` selects a batch.
    pub async fn generate(&self, request: GenerateRequest) -> Result<GenerateOutcome> {
        let suffix = request
            .email_suffix
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::Validation("邮箱后缀不能为空".to_string()))?
            .to_string();

        if let Some(prefix) = request.email_prefix.as_deref().filter(|p| !p.is_empty()) {
            let email = format!("{}@{}", prefix, suffix);
            self.generate_single(email, &request).await?;
            return Ok(GenerateOutcome::Single);
        }

        match request.count {
            Some(count) if (1..=self.settings.batch_limit).contains(&count) => {
                let transcript = self.generate_batch(count, suffix, &request).await?;
                Ok(GenerateOutcome::Batch(transcript))
            }
            Some(count) => Err(AppError::Validation(format!(
                "生成数量必须在 1 到 {} 之间: {}",
                self.settings.batch_limit, count
            ))),
            None => Err(AppError::Validation(
                "必须提供邮箱前缀或生成数量".to_string(),
            )),
        }
    }

    async fn resolve_plan(&self, plan_id: Option<i64>) -> Result<Option<Plan>> {
        match plan_id {
            Some(id) => {
                let plan = self.store.find_plan(id).await?.ok_or(AppError::PlanNotFound)?;
                Ok(Some(plan))
            }
            None => Ok(None),
        }
    }

    async fn generate_single(&self, email: String, request: &GenerateRequest) -> Result<()> {
        let plan = self.resolve_plan(request.plan_id).await?;
        let template = AccountTemplate::new(plan.as_ref(), request.expired_at);

        let password = shared_password(request).unwrap_or(&email).to_string();
        let cost = self.settings.hash_cost;
        let now = chrono::Utc::now().timestamp();
        let user = tokio::task::spawn_blocking(move || template.build(email, &password, cost, now))
            .await
            .map_err(|e| anyhow::anyhow!("hashing task failed: {}", e))??;

        if let Err(e) = self.store.insert_user(&user).await {
            tracing::error!(email = %user.email, error = %e, "failed to generate account");
            return Err(AppError::GenerateFailed);
        }

        tracing::info!(email = %user.email, plan_id = ?user.plan_id, "account generated");
        Ok(())
    }

    async fn generate_batch(
        &self,
        count: u32,
        suffix: String,
        request: &GenerateRequest,
    ) -> Result<CsvTranscript> {
        let plan = self.resolve_plan(request.plan_id).await?;
        let template = AccountTemplate::new(plan.as_ref(), request.expired_at);

        let plan_id = template.plan_id;
        let password = shared_password(request).map(str::to_string);
        let settings = self.settings;
        let now = chrono::Utc::now().timestamp();

        // Hashing is CPU-bound, one bcrypt round per account.
        let (users, transcript) = tokio::task::spawn_blocking(move || {
            build_batch(&template, count, &suffix, password.as_deref(), settings, now)
        })
        .await
        .map_err(|e| anyhow::anyhow!("hashing task failed: {}", e))??;

        if let Err(e) = self.store.insert_users(&users).await {
            tracing::error!(count, error = %e, "batch generation rolled back");
            return Err(AppError::GenerateFailed);
        }

        tracing::info!(count, plan_id = ?plan_id, "batch accounts generated");
        Ok(transcript)
    }
}

/// Empty strings count as "not supplied".
fn shared_password(request: &GenerateRequest) -> Option<&str> {
    request.password.as_deref().filter(|p| !p.is_empty())
}

/// Builds `count` accounts with random local parts. Collisions with existing
/// users are not checked here; the unique index rejects the whole batch.
fn build_batch(
    template: &AccountTemplate,
    count: u32,
    suffix: &str,
    password: Option<&str>,
    settings: GeneratorSettings,
    now: i64,
) -> Result<(Vec<NewUser>, CsvTranscript)> {
    let mut users = Vec::with_capacity(count as usize);
    let mut rows = Vec::with_capacity(count as usize);

    for _ in 0..count {
        let email = format!("{}@{}", random_char(settings.prefix_length), suffix);
        let plaintext = password.unwrap_or(&email).to_string();
        let user = template.build(email, &plaintext, settings.hash_cost, now)?;

        rows.push(TranscriptRow {
            email: user.email.clone(),
            password: plaintext,
            expired_at: user.expired_at,
            uuid: user.uuid.clone(),
            created_at: user.created_at,
        });
        users.push(user);
    }

    Ok((users, CsvTranscript::new(rows)))
}
