// src/handlers/portal.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::SupplierUser, i18n::Locale},
    models::{tenancy::TenantFilter, timesheet::TimesheetSummary},
};

// Portal do fornecedor: só os puantajs dos veículos do próprio fornecedor
#[utoipa::path(
    get,
    path = "/api/portal/timesheets",
    tag = "Portal",
    responses(
        (status = 200, description = "Puantajs dos veículos do fornecedor", body = Vec<TimesheetSummary>),
        (status = 401, description = "Não autenticado"),
        (status = 403, description = "Apenas usuários SUPPLIER")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_my_timesheets(
    State(app_state): State<AppState>,
    locale: Locale,
    supplier: SupplierUser,
    filter: TenantFilter,
) -> Result<impl IntoResponse, ApiError> {
    let timesheets = app_state
        .timesheet_service
        .list_for_supplier(&filter, supplier.supplier_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(timesheets)))
}
