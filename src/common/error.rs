use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use thiserror::Error;

use crate::{
    common::i18n::I18nStore,
    middleware::i18n::Locale,
    services::authz::AuthzError,
};

// Nosso tipo de erro, agora com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    // 401 / 403 vindos do portão de autorização
    #[error("Acesso: {0}")]
    Access(#[from] AuthzError),

    #[error("Organização não informada")]
    OrganizationRequired,

    #[error("Usuário SUPPLIER sem fornecedor")]
    SupplierRequired,

    #[error("Recurso não encontrado: {0}")]
    ResourceNotFound(String),

    #[error("Puantaj aprovado não pode ser alterado")]
    TimesheetLocked,

    #[error("Puantaj já existe para este período")]
    TimesheetAlreadyExists,

    #[error("Data fora do período do puantaj")]
    EntryOutsidePeriod,

    #[error("Alíquota de KDV divergente: esperado {expected}, recebido {got}")]
    MixedVatRate { expected: Decimal, got: Decimal },

    #[error("Rota não pertence ao projeto do puantaj")]
    RouteProjectMismatch,

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    // Variante para erros de banco de dados (exemplo com sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

// O erro já traduzido, pronto para virar resposta HTTP
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl AppError {
    fn status_and_key(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::ValidationError(_) => (StatusCode::BAD_REQUEST, "validation_failed"),
            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "email_already_exists"),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "invalid_credentials"),
            AppError::Access(AuthzError::Unauthenticated) => (StatusCode::UNAUTHORIZED, "unauthenticated"),
            AppError::Access(AuthzError::Forbidden(reason)) => (StatusCode::FORBIDDEN, reason.message_key()),
            AppError::OrganizationRequired => (StatusCode::BAD_REQUEST, "organization_required"),
            AppError::SupplierRequired => (StatusCode::BAD_REQUEST, "supplier_required"),
            AppError::ResourceNotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::TimesheetLocked => (StatusCode::CONFLICT, "timesheet_locked"),
            AppError::TimesheetAlreadyExists => (StatusCode::CONFLICT, "timesheet_already_exists"),
            AppError::EntryOutsidePeriod => (StatusCode::UNPROCESSABLE_ENTITY, "entry_outside_period"),
            AppError::MixedVatRate { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "mixed_vat_rate"),
            AppError::RouteProjectMismatch => (StatusCode::UNPROCESSABLE_ENTITY, "route_project_mismatch"),
            AppError::FontNotFound(_) => (StatusCode::INTERNAL_SERVER_ERROR, "font_not_found"),
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }

    /// Converte para a resposta HTTP no idioma do cliente.
    pub fn to_api_error(&self, locale: &Locale, i18n: &I18nStore) -> ApiError {
        let (status, key) = self.status_and_key();

        if status.is_server_error() {
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        // Validação: devolve os detalhes por campo, já traduzidos
        let details = match self {
            AppError::ValidationError(errors) => {
                let mut fields = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<Value> = field_errors
                        .iter()
                        .map(|e| {
                            let key = e.message.as_deref().unwrap_or(e.code.as_ref());
                            Value::String(i18n.translate(&locale.0, key))
                        })
                        .collect();
                    fields.insert(field.to_string(), Value::Array(messages));
                }
                Some(Value::Object(fields))
            }
            _ => None,
        };

        ApiError {
            status,
            error: i18n.translate(&locale.0, key),
            details,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::authz::ForbiddenReason;
    use validator::Validate;

    fn locale(lang: &str) -> Locale {
        Locale(lang.to_string())
    }

    #[test]
    fn gate_errors_map_to_401_and_403() {
        let store = I18nStore::new();

        let unauth = AppError::from(AuthzError::Unauthenticated).to_api_error(&locale("en"), &store);
        assert_eq!(unauth.status, StatusCode::UNAUTHORIZED);
        assert_eq!(unauth.error, "You need to sign in.");

        let forbidden = AppError::from(AuthzError::Forbidden(ForbiddenReason::FactoryPriceEdit))
            .to_api_error(&locale("tr"), &store);
        assert_eq!(forbidden.status, StatusCode::FORBIDDEN);
        assert_eq!(forbidden.error, "Fabrika fiyatını düzenleme yetkiniz yok.");
        assert!(forbidden.details.is_none());
    }

    #[test]
    fn validation_errors_carry_translated_details() {
        #[derive(Validate)]
        struct Payload {
            #[validate(length(min = 1, message = "required"))]
            name: String,
        }

        let errors = Payload { name: String::new() }.validate().unwrap_err();
        let api = AppError::from(errors).to_api_error(&locale("en"), &I18nStore::new());

        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        let details = api.details.unwrap();
        assert_eq!(details["name"][0], "This field is required.");
    }

    #[test]
    fn domain_errors_have_specific_statuses() {
        let store = I18nStore::new();
        let en = locale("en");

        let mixed = AppError::MixedVatRate { expected: Decimal::from(20), got: Decimal::from(10) };
        assert_eq!(mixed.to_api_error(&en, &store).status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(AppError::TimesheetLocked.to_api_error(&en, &store).status, StatusCode::CONFLICT);
        assert_eq!(
            AppError::ResourceNotFound("Güzergah".into()).to_api_error(&en, &store).status,
            StatusCode::NOT_FOUND
        );
    }
}
