// src/handlers/timesheets.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{BackOfficeUser, TimesheetApprover},
    },
    models::{
        tenancy::TenantFilter,
        timesheet::{
            CreateTimesheetPayload, Timesheet, TimesheetDetail, TimesheetEntry, TimesheetListQuery,
            TimesheetSummary, UpsertEntryPayload,
        },
    },
};

#[utoipa::path(
    get,
    path = "/api/timesheets",
    tag = "Timesheets",
    params(TimesheetListQuery),
    responses(
        (status = 200, description = "Puantajs com os totais calculados", body = Vec<TimesheetSummary>),
        (status = 403, description = "Sem acesso ao back office")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_timesheets(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: BackOfficeUser,
    filter: TenantFilter,
    Query(query): Query<TimesheetListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let timesheets = app_state
        .timesheet_service
        .list_timesheets(&filter, &query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(timesheets)))
}

#[utoipa::path(
    post,
    path = "/api/timesheets",
    tag = "Timesheets",
    request_body = CreateTimesheetPayload,
    responses(
        (status = 201, description = "Puantaj aberto em DRAFT", body = Timesheet),
        (status = 404, description = "Projeto, veículo ou motorista não encontrado"),
        (status = 409, description = "Já existe puantaj para veículo/projeto/mês")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_timesheet(
    State(app_state): State<AppState>,
    locale: Locale,
    user: BackOfficeUser,
    filter: TenantFilter,
    Json(payload): Json<CreateTimesheetPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let timesheet = app_state
        .timesheet_service
        .create_timesheet(&user.principal, &filter, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(timesheet)))
}

#[utoipa::path(
    get,
    path = "/api/timesheets/{id}",
    tag = "Timesheets",
    params(("id" = Uuid, Path, description = "ID do puantaj")),
    responses(
        (status = 200, description = "Cabeçalho, linhas e cálculo", body = TimesheetDetail),
        (status = 404, description = "Puantaj não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_timesheet(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: BackOfficeUser,
    filter: TenantFilter,
    Path(timesheet_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = app_state
        .timesheet_service
        .get_detail(&filter, timesheet_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(detail)))
}

// POST /api/timesheets/{id}/entries
#[utoipa::path(
    post,
    path = "/api/timesheets/{id}/entries",
    tag = "Timesheets",
    request_body = UpsertEntryPayload,
    params(("id" = Uuid, Path, description = "ID do puantaj")),
    responses(
        (status = 200, description = "Linha gravada", body = TimesheetEntry),
        (status = 409, description = "Puantaj aprovado"),
        (status = 422, description = "Data fora do mês, rota de outro projeto ou KDV diferente")
    ),
    security(("api_jwt" = []))
)]
pub async fn upsert_entry(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: BackOfficeUser,
    filter: TenantFilter,
    Path(timesheet_id): Path<Uuid>,
    Json(payload): Json<UpsertEntryPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let entry = app_state
        .timesheet_service
        .upsert_entry(&filter, timesheet_id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(entry)))
}

#[utoipa::path(
    post,
    path = "/api/timesheets/{id}/approve",
    tag = "Timesheets",
    params(("id" = Uuid, Path, description = "ID do puantaj")),
    responses(
        (status = 200, description = "Puantaj aprovado", body = TimesheetDetail),
        (status = 403, description = "Apenas ADMIN ou MANAGER"),
        (status = 409, description = "Já aprovado")
    ),
    security(("api_jwt" = []))
)]
pub async fn approve_timesheet(
    State(app_state): State<AppState>,
    locale: Locale,
    approver: TimesheetApprover,
    filter: TenantFilter,
    Path(timesheet_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = app_state
        .timesheet_service
        .approve(&approver.principal, &filter, timesheet_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(detail)))
}
