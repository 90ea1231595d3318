// src/handlers/fleet.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{i18n::Locale, rbac::BackOfficeUser},
    models::{
        fleet::{CreateDriverPayload, CreateSupplierPayload, CreateVehiclePayload, Driver, Supplier, Vehicle},
        tenancy::TenantFilter,
    },
};

// ---
// Tedarikçiler (Fornecedores)
// ---

#[utoipa::path(
    get,
    path = "/api/suppliers",
    tag = "Fleet",
    responses(
        (status = 200, description = "Fornecedores da organização", body = Vec<Supplier>),
        (status = 401, description = "Não autenticado"),
        (status = 403, description = "Sem acesso ao back office")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_suppliers(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: BackOfficeUser,
    filter: TenantFilter,
) -> Result<impl IntoResponse, ApiError> {
    let suppliers = app_state
        .fleet_repo
        .list_suppliers(&filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(suppliers)))
}

#[utoipa::path(
    post,
    path = "/api/suppliers",
    tag = "Fleet",
    request_body = CreateSupplierPayload,
    responses(
        (status = 201, description = "Fornecedor criado", body = Supplier),
        (status = 400, description = "Payload inválido"),
        (status = 403, description = "Sem acesso ao back office")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_supplier(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: BackOfficeUser,
    filter: TenantFilter,
    Json(payload): Json<CreateSupplierPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let supplier = app_state
        .fleet_service
        .create_supplier(&filter, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(supplier)))
}

// ---
// Araçlar (Veículos)
// ---

#[utoipa::path(
    get,
    path = "/api/vehicles",
    tag = "Fleet",
    responses(
        (status = 200, description = "Veículos da organização", body = Vec<Vehicle>),
        (status = 403, description = "Sem acesso ao back office")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_vehicles(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: BackOfficeUser,
    filter: TenantFilter,
) -> Result<impl IntoResponse, ApiError> {
    let vehicles = app_state
        .fleet_repo
        .list_vehicles(&filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(vehicles)))
}

#[utoipa::path(
    post,
    path = "/api/vehicles",
    tag = "Fleet",
    request_body = CreateVehiclePayload,
    responses(
        (status = 201, description = "Veículo criado", body = Vehicle),
        (status = 404, description = "Fornecedor não encontrado na organização")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_vehicle(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: BackOfficeUser,
    filter: TenantFilter,
    Json(payload): Json<CreateVehiclePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let vehicle = app_state
        .fleet_service
        .create_vehicle(&filter, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(vehicle)))
}

// ---
// Şoförler (Motoristas)
// ---

#[utoipa::path(
    get,
    path = "/api/drivers",
    tag = "Fleet",
    responses(
        (status = 200, description = "Motoristas da organização", body = Vec<Driver>),
        (status = 403, description = "Sem acesso ao back office")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_drivers(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: BackOfficeUser,
    filter: TenantFilter,
) -> Result<impl IntoResponse, ApiError> {
    let drivers = app_state
        .fleet_repo
        .list_drivers(&filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(drivers)))
}

#[utoipa::path(
    post,
    path = "/api/drivers",
    tag = "Fleet",
    request_body = CreateDriverPayload,
    responses(
        (status = 201, description = "Motorista criado", body = Driver),
        (status = 404, description = "Fornecedor não encontrado na organização")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_driver(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: BackOfficeUser,
    filter: TenantFilter,
    Json(payload): Json<CreateDriverPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let driver = app_state
        .fleet_service
        .create_driver(&filter, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(driver)))
}
