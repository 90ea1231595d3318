use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::auth::Principal,
    services::authz::{self, AuthzError},
};

// O middleware em si.
// Não rejeita nada: só reconstrói o Principal a partir do token, quando houver.
// Quem decide 401/403 são os extratores abaixo, via portão de autorização.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let bearer = request.headers().typed_get::<Authorization<Bearer>>();

    if let Some(Authorization(bearer)) = bearer {
        match app_state.auth_service.validate_token(bearer.token()) {
            Ok(principal) => {
                // Insere o principal nos "extensions" da requisição
                request.extensions_mut().insert(principal);
            }
            Err(e) => tracing::debug!("Token rejeitado: {}", e),
        }
    }

    next.run(request).await
}

pub(crate) fn current_principal(parts: &Parts) -> Option<&Principal> {
    parts.extensions.get::<Principal>()
}

/// Converte a recusa do portão em resposta traduzida.
pub(crate) async fn reject<S>(parts: &mut Parts, state: &S, err: AuthzError) -> ApiError
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    let app_state = AppState::from_ref(state);
    let locale = Locale::from_request_parts(parts, state)
        .await
        .unwrap_or_else(|never| match never {});
    AppError::Access(err).to_api_error(&locale, &app_state.i18n_store)
}

// Extrator para obter o usuário autenticado diretamente nos handlers
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Principal);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let checked = authz::require_authenticated(current_principal(parts)).cloned();
        match checked {
            Ok(principal) => Ok(AuthenticatedUser(principal)),
            Err(err) => Err(reject(parts, state, err).await),
        }
    }
}

// Portal do fornecedor: principal + o fornecedor ao qual ele está preso
#[derive(Debug, Clone)]
pub struct SupplierUser {
    pub principal: Principal,
    pub supplier_id: uuid::Uuid,
}

impl<S> FromRequestParts<S> for SupplierUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let checked = authz::require_supplier(current_principal(parts))
            .map(|(principal, supplier_id)| (principal.clone(), supplier_id));
        match checked {
            Ok((principal, supplier_id)) => Ok(SupplierUser { principal, supplier_id }),
            Err(err) => Err(reject(parts, state, err).await),
        }
    }
}
