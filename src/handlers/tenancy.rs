// src/handlers/tenancy.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{i18n::Locale, rbac::AdminUser},
    models::tenancy::{CreateOrganizationPayload, Organization, TenantFilter},
    services::authz::{AuthzError, ForbiddenReason},
};

#[utoipa::path(
    get,
    path = "/api/organizations",
    tag = "Tenancy",
    responses(
        (status = 200, description = "Organizações visíveis (a própria, para admins de organização)", body = Vec<Organization>),
        (status = 403, description = "Apenas ADMIN")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_organizations(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: AdminUser,
    filter: TenantFilter,
) -> Result<impl IntoResponse, ApiError> {
    let organizations = app_state
        .organization_repo
        .list_organizations(&filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(organizations)))
}

// Só o administrador corporativo (sem organização) abre novas organizações
#[utoipa::path(
    post,
    path = "/api/organizations",
    tag = "Tenancy",
    request_body = CreateOrganizationPayload,
    responses(
        (status = 201, description = "Organização criada", body = Organization),
        (status = 403, description = "Apenas ADMIN corporativo")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_organization(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: AdminUser,
    filter: TenantFilter,
    Json(payload): Json<CreateOrganizationPayload>,
) -> Result<impl IntoResponse, ApiError> {
    if !filter.is_unrestricted() {
        return Err(AppError::Access(AuthzError::Forbidden(ForbiddenReason::CrossTenant))
            .to_api_error(&locale, &app_state.i18n_store));
    }

    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let organization = app_state
        .organization_repo
        .create_organization(payload.name.trim(), payload.tax_number.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tracing::info!(organization_id = %organization.id, "🏢 Organização criada");
    Ok((StatusCode::CREATED, Json(organization)))
}
