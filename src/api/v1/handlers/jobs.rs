/*
 * Responsibility
 * - /jobs 系 CRUD handler
 * - GET は公開, POST/PATCH/DELETE は routes 側で logged-in + admin guard
 */
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde_json::{Value, json};

use crate::{
    api::v1::dto::{
        jobs::{CreateJobRequest, JobFilterQuery, JobResponse, UpdateJobRequest},
        json_body, query_params,
    },
    error::AppError,
    state::AppState,
};

fn job_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, AppError> {
    path.map(|Path(id)| id)
        .map_err(|_| AppError::bad_request("INVALID_ID", "job id must be an integer"))
}

pub async fn create_job(
    State(state): State<AppState>,
    payload: Result<Json<CreateJobRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let req = json_body(payload)?;
    req.validate()
        .map_err(|e| AppError::bad_request("INVALID_BODY", e))?;

    let job = state.jobs.create(req.into()).await;
    tracing::info!(job_id = job.id, "job created");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "job": JobResponse::from(job) })),
    ))
}

pub async fn list_jobs(
    State(state): State<AppState>,
    query: Result<Query<JobFilterQuery>, QueryRejection>,
) -> Result<Json<Value>, AppError> {
    let filter = query_params(query)?
        .into_filter()
        .map_err(|e| AppError::bad_request("INVALID_QUERY", e))?;

    let jobs: Vec<JobResponse> = state
        .jobs
        .list(&filter)
        .await
        .into_iter()
        .map(JobResponse::from)
        .collect();

    Ok(Json(json!({ "jobs": jobs })))
}

pub async fn get_job(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>, AppError> {
    let id = job_id(path)?;
    let job = state.jobs.get(id).await.ok_or(AppError::not_found("job"))?;

    Ok(Json(json!({ "job": JobResponse::from(job) })))
}

pub async fn update_job(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateJobRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let id = job_id(path)?;
    let req = json_body(payload)?;
    req.validate()
        .map_err(|e| AppError::bad_request("INVALID_BODY", e))?;

    let job = state
        .jobs
        .update(id, req.into())
        .await
        .ok_or(AppError::not_found("job"))?;

    Ok(Json(json!({ "job": JobResponse::from(job) })))
}

pub async fn delete_job(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>, AppError> {
    let id = job_id(path)?;
    if !state.jobs.delete(id).await {
        return Err(AppError::not_found("job"));
    }

    tracing::info!(job_id = id, "job deleted");

    Ok(Json(json!({ "deleted": id })))
}
