//! Request handlers and their wire DTOs.

use crate::error::RpcError;
use crate::pagination::{next_offset, PaginationMeta, PaginationParams};
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap};
use axum::Json;
use civis_service::{CivicService, IdentityProvider, Principal, ServiceError, Statistics};
use civis_types::{Category, PhoneNumber, Report, ReportId, ReportStatus, Role};
use civis_verification::VerificationError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<CivicService>,
    pub identity: Arc<dyn IdentityProvider>,
}

fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Principal, RpcError> {
    let credential = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(RpcError::Unauthenticated)?;
    state
        .identity
        .authenticate(credential)
        .map_err(|_| RpcError::Unauthenticated)
}

fn parse_report_id(raw: &str) -> Result<ReportId, RpcError> {
    raw.parse::<ReportId>()
        .map_err(|_| RpcError::BadRequest(format!("{raw:?} is not a valid report id")))
}

fn parse_category(raw: &str) -> Result<Category, RpcError> {
    Category::parse(raw).ok_or_else(|| {
        ServiceError::from(VerificationError::InvalidCategory(raw.to_string())).into()
    })
}

fn parse_status(raw: &str) -> Result<ReportStatus, RpcError> {
    ReportStatus::parse(raw).ok_or_else(|| {
        ServiceError::from(VerificationError::InvalidStatus(raw.to_string())).into()
    })
}

fn parse_phone(raw: &str) -> Result<PhoneNumber, RpcError> {
    PhoneNumber::parse(raw).map_err(|e| RpcError::BadRequest(e.to_string()))
}

// ── Reports ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SubmitReportRequest {
    pub title: String,
    pub description: String,
    pub category: String,
}

#[derive(Serialize)]
pub struct CommentResponse {
    pub text: String,
    pub by: String,
    pub created_at: u64,
}

#[derive(Serialize)]
pub struct ReportResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub created_by: String,
    pub created_at: u64,
    pub verified_by: Vec<String>,
    pub verification_count: u32,
    pub verified: bool,
    pub verified_at: Option<u64>,
    pub status: String,
    pub comments: Vec<CommentResponse>,
}

impl From<Report> for ReportResponse {
    fn from(report: Report) -> Self {
        Self {
            id: report.id.to_string(),
            title: report.title,
            description: report.description,
            category: report.category.as_str().to_string(),
            created_by: report.created_by.to_string(),
            created_at: report.created_at.as_secs(),
            verified_by: report.verified_by.iter().map(|p| p.to_string()).collect(),
            verification_count: report.verification_count,
            verified: report.verified,
            verified_at: report.verified_at.map(|t| t.as_secs()),
            status: report.status.as_str().to_string(),
            comments: report
                .comments
                .into_iter()
                .map(|c| CommentResponse {
                    text: c.text,
                    by: c.by.to_string(),
                    created_at: c.created_at.as_secs(),
                })
                .collect(),
        }
    }
}

#[derive(Serialize)]
pub struct ReportListResponse {
    pub reports: Vec<ReportResponse>,
    #[serde(flatten)]
    pub meta: PaginationMeta,
}

/// `GET /reports` — public.
pub async fn list_reports(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<ReportListResponse>, RpcError> {
    let all = state.service.list_reports()?;
    let offset = pagination.offset();
    let count = pagination.effective_count();

    let page: Vec<ReportResponse> = all
        .into_iter()
        .skip(offset as usize)
        .take(count as usize)
        .map(ReportResponse::from)
        .collect();
    let meta = PaginationMeta {
        next_offset: next_offset(offset, page.len(), count),
    };
    Ok(Json(ReportListResponse {
        reports: page,
        meta,
    }))
}

/// `POST /reports` — authenticated.
pub async fn submit_report(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<SubmitReportRequest>,
) -> Result<Json<ReportResponse>, RpcError> {
    let principal = authenticate(&state, &headers)?;
    let category = parse_category(&req.category)?;
    let report = state
        .service
        .submit_report(
            &req.title,
            &req.description,
            category,
            &principal.phone_number,
        )
        .await?;
    Ok(Json(report.into()))
}

/// `GET /reports/:id` — public.
pub async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ReportResponse>, RpcError> {
    let id = parse_report_id(&id)?;
    let report = state.service.get_report_by_id(id)?;
    Ok(Json(report.into()))
}

/// `POST /reports/:id/verify` — authenticated.
pub async fn verify_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<ReportResponse>, RpcError> {
    let principal = authenticate(&state, &headers)?;
    let id = parse_report_id(&id)?;
    let report = state
        .service
        .verify_report(id, &principal.phone_number)
        .await?;
    Ok(Json(report.into()))
}

/// `POST /reports/:id/undo-verify` — authenticated.
pub async fn undo_verify_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<ReportResponse>, RpcError> {
    let principal = authenticate(&state, &headers)?;
    let id = parse_report_id(&id)?;
    let report = state
        .service
        .undo_verify_report(id, &principal.phone_number)
        .await?;
    Ok(Json(report.into()))
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
    pub comment: Option<String>,
}

/// `PATCH /reports/:id/status` — admin.
pub async fn set_report_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<ReportResponse>, RpcError> {
    let principal = authenticate(&state, &headers)?;
    let id = parse_report_id(&id)?;
    let status = parse_status(&req.status)?;
    let report = state
        .service
        .set_report_status(id, status, req.comment.as_deref(), &principal.phone_number)
        .await?;
    Ok(Json(report.into()))
}

#[derive(Serialize)]
pub struct DeleteReportResponse {
    pub deleted: bool,
}

/// `DELETE /reports/:id` — admin.
pub async fn delete_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<DeleteReportResponse>, RpcError> {
    let principal = authenticate(&state, &headers)?;
    let id = parse_report_id(&id)?;
    state
        .service
        .delete_report(id, &principal.phone_number)
        .await?;
    Ok(Json(DeleteReportResponse { deleted: true }))
}

// ── Statistics ───────────────────────────────────────────────────────────

/// `GET /statistics` — admin.
pub async fn statistics(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Statistics>, RpcError> {
    let principal = authenticate(&state, &headers)?;
    if principal.role != Role::Admin {
        return Err(RpcError::Forbidden("admin privileges required".to_string()));
    }
    Ok(Json(state.service.statistics()?))
}

// ── SMS webhook ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct InboundSmsRequest {
    pub from: String,
    pub body: String,
}

#[derive(Serialize)]
pub struct InboundSmsResponse {
    pub report_id: String,
}

/// `POST /sms` — transport webhook; the caller ID is trusted as identity.
pub async fn inbound_sms(
    State(state): State<AppState>,
    Json(req): Json<InboundSmsRequest>,
) -> Result<Json<InboundSmsResponse>, RpcError> {
    let from = parse_phone(&req.from)?;
    let report = state.service.ingest_sms(&from, &req.body).await?;
    Ok(Json(InboundSmsResponse {
        report_id: report.id.to_string(),
    }))
}
