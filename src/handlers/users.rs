use axum::extract::State;
use serde_json::json;

use crate::{
    errors::Result,
    handlers::{
        extract::{AdminJson, AdminQuery},
        response::AdminResponse,
        AppState,
    },
    models::{ExportRequest, FetchRequest, GenerateRequest, UpdateUserRequest, UserInfoQuery},
    services::{
        account_generator::{AccountGenerator, GenerateOutcome, GeneratorSettings},
        user_query::UserQueryService,
    },
};

const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

fn query_service(state: &AppState) -> UserQueryService {
    UserQueryService::new(state.store.clone(), state.config.password_hash_cost)
}

fn account_generator(state: &AppState) -> AccountGenerator {
    AccountGenerator::new(
        state.store.clone(),
        GeneratorSettings {
            hash_cost: state.config.password_hash_cost,
            batch_limit: state.config.batch_generate_limit,
            prefix_length: state.config.random_prefix_length,
        },
    )
}

pub async fn fetch(
    State(state): State<AppState>,
    AdminJson(request): AdminJson<FetchRequest>,
) -> Result<AdminResponse> {
    let page = query_service(&state).fetch(request).await?;

    Ok(AdminResponse::Payload(json!({
        "data": page.data,
        "total": page.total
    })))
}

pub async fn get_user_info_by_id(
    State(state): State<AppState>,
    AdminQuery(query): AdminQuery<UserInfoQuery>,
) -> Result<AdminResponse> {
    let user = query_service(&state).get_by_id(query.id.as_deref()).await?;

    Ok(AdminResponse::Payload(json!({ "data": user })))
}

pub async fn update(
    State(state): State<AppState>,
    AdminJson(request): AdminJson<UpdateUserRequest>,
) -> Result<AdminResponse> {
    query_service(&state).update(request).await?;
    state.metrics.record_update();

    Ok(AdminResponse::Payload(json!({ "data": true })))
}

pub async fn export(
    State(state): State<AppState>,
    AdminJson(request): AdminJson<ExportRequest>,
) -> Result<AdminResponse> {
    let page = query_service(&state).export(request).await?;

    Ok(AdminResponse::Payload(json!({
        "data": page.data,
        "total": page.total
    })))
}

pub async fn generate(
    State(state): State<AppState>,
    AdminJson(request): AdminJson<GenerateRequest>,
) -> Result<AdminResponse> {
    match account_generator(&state).generate(request).await? {
        GenerateOutcome::Single => {
            state.metrics.record_generated("single", 1);
            Ok(AdminResponse::Payload(json!({ "data": true })))
        }
        GenerateOutcome::Batch(transcript) => {
            state.metrics.record_generated("batch", transcript.len() as u64);
            Ok(AdminResponse::Document {
                content_type: CSV_CONTENT_TYPE,
                body: transcript.render(),
            })
        }
    }
}
