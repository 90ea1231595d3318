// src/handlers/reports.rs

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{i18n::Locale, rbac::FactoryReporter},
    models::{
        reports::{FactoryReport, FactoryReportQuery},
        tenancy::TenantFilter,
    },
};

#[utoipa::path(
    get,
    path = "/api/reports/factory",
    tag = "Reports",
    params(FactoryReportQuery),
    responses(
        (status = 200, description = "Viagens aprovadas do mês valorizadas pelo preço de fábrica", body = FactoryReport),
        (status = 401, description = "Não autenticado"),
        (status = 403, description = "Apenas ADMIN ou MANAGER")
    ),
    security(("api_jwt" = []))
)]
pub async fn factory_report(
    State(app_state): State<AppState>,
    locale: Locale,
    _reporter: FactoryReporter,
    filter: TenantFilter,
    Query(query): Query<FactoryReportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    query
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let report = app_state
        .report_service
        .factory_report(&filter, &query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(report)))
}

#[utoipa::path(
    get,
    path = "/api/reports/factory/pdf",
    tag = "Reports",
    params(FactoryReportQuery),
    responses(
        (status = 200, description = "Relatório de fábrica em PDF (application/pdf)"),
        (status = 403, description = "Apenas ADMIN ou MANAGER"),
        (status = 500, description = "Fontes ausentes no servidor")
    ),
    security(("api_jwt" = []))
)]
pub async fn factory_report_pdf(
    State(app_state): State<AppState>,
    locale: Locale,
    reporter: FactoryReporter,
    filter: TenantFilter,
    Query(query): Query<FactoryReportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    query
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let pdf = app_state
        .report_service
        .factory_report_pdf(&reporter.principal, &filter, &query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let disposition = format!("attachment; filename=\"fabrika-raporu-{}-{:02}.pdf\"", query.yil, query.ay);
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        pdf,
    ))
}
