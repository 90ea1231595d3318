// src/handlers/dashboard.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{i18n::Locale, rbac::BackOfficeUser},
    models::{dashboard::DashboardSummary, tenancy::TenantFilter},
};

// GET /api/dashboard/summary
#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Contadores do painel", body = DashboardSummary),
        (status = 401, description = "Não autenticado"),
        (status = 403, description = "Sem acesso ao back office")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: BackOfficeUser,
    filter: TenantFilter,
) -> Result<impl IntoResponse, ApiError> {
    let summary = app_state
        .dashboard_repo
        .get_summary(&filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(summary)))
}
