// src/handlers/projects.rs

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
        rbac::{BackOfficeUser, FactoryPriceEditor},
    },
    models::{
        projects::{CreateProjectPayload, CreateRoutePayload, Project, Route, RouteListQuery, UpdateFactoryPricePayload},
        tenancy::TenantFilter,
    },
};

// ---
// Projeler
// ---

#[utoipa::path(
    get,
    path = "/api/projects",
    tag = "Projects",
    responses(
        (status = 200, description = "Projetos da organização", body = Vec<Project>),
        (status = 403, description = "Sem acesso ao back office")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_projects(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: BackOfficeUser,
    filter: TenantFilter,
) -> Result<impl IntoResponse, ApiError> {
    let projects = app_state
        .project_repo
        .list_projects(&filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(projects)))
}

#[utoipa::path(
    post,
    path = "/api/projects",
    tag = "Projects",
    request_body = CreateProjectPayload,
    responses(
        (status = 201, description = "Projeto criado", body = Project),
        (status = 400, description = "Payload inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_project(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: BackOfficeUser,
    filter: TenantFilter,
    Json(payload): Json<CreateProjectPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let project = app_state
        .fleet_service
        .create_project(&filter, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(project)))
}

// ---
// Güzergahlar (Rotas)
// ---

#[utoipa::path(
    get,
    path = "/api/routes",
    tag = "Projects",
    params(RouteListQuery),
    responses(
        (status = 200, description = "Rotas (opcionalmente de um projeto)", body = Vec<Route>),
        (status = 403, description = "Sem acesso ao back office")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_routes(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: BackOfficeUser,
    filter: TenantFilter,
    Query(query): Query<RouteListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let routes = app_state
        .project_repo
        .list_routes(&filter, query.project_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(routes)))
}

#[utoipa::path(
    post,
    path = "/api/routes",
    tag = "Projects",
    request_body = CreateRoutePayload,
    responses(
        (status = 201, description = "Rota criada", body = Route),
        (status = 403, description = "Preço de fábrica exige ADMIN"),
        (status = 404, description = "Projeto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_route(
    State(app_state): State<AppState>,
    locale: Locale,
    user: BackOfficeUser,
    filter: TenantFilter,
    Json(payload): Json<CreateRoutePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let route = app_state
        .fleet_service
        .create_route(&user.principal, &filter, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(route)))
}

// PATCH /api/routes/{id}/factory-price
#[utoipa::path(
    patch,
    path = "/api/routes/{id}/factory-price",
    tag = "Projects",
    request_body = UpdateFactoryPricePayload,
    params(("id" = Uuid, Path, description = "ID da rota")),
    responses(
        (status = 200, description = "Preço de fábrica atualizado", body = Route),
        (status = 401, description = "Não autenticado"),
        (status = 403, description = "Apenas ADMIN"),
        (status = 404, description = "Rota não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_factory_price(
    State(app_state): State<AppState>,
    locale: Locale,
    editor: FactoryPriceEditor,
    filter: TenantFilter,
    Path(route_id): Path<Uuid>,
    Json(payload): Json<UpdateFactoryPricePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let route = app_state
        .project_repo
        .update_factory_price(&filter, route_id, payload.fabrika_fiyati)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?
        .ok_or_else(|| {
            AppError::ResourceNotFound(format!("Güzergah {}", route_id))
                .to_api_error(&locale, &app_state.i18n_store)
        })?;

    tracing::info!(
        route_id = %route.id,
        user_id = %editor.principal.user_id,
        fabrika_fiyati = %payload.fabrika_fiyati,
        "💰 Preço de fábrica atualizado"
    );
    Ok((StatusCode::OK, Json(route)))
}
