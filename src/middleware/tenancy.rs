// src/middleware/tenancy.rs

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::auth::{current_principal, reject},
    models::tenancy::TenantFilter,
    services::authz,
};

// O tenant não vem de cabeçalho: sai do próprio principal autenticado.
// Handlers que tocam dados de tenant recebem este extrator e repassam o
// filtro para os repositórios.
impl<S> FromRequestParts<S> for TenantFilter
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let derived = authz::require_authenticated(current_principal(parts))
            .map(authz::derive_tenant_filter);

        match derived {
            Ok(filter) => Ok(filter),
            Err(err) => Err(reject(parts, state, err).await),
        }
    }
}
