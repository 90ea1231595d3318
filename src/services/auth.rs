// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;
use validator::ValidationErrors;

use crate::{
    common::{error::AppError, validation},
    db::{FleetRepository, UserRepository},
    models::{
        auth::{Claims, CreateUserPayload, Principal, Role, User},
        tenancy::TenantFilter,
    },
    services::authz,
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    fleet_repo: FleetRepository,
    jwt_secret: String,
    pool: PgPool,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        fleet_repo: FleetRepository,
        jwt_secret: String,
        pool: PgPool,
    ) -> Self {
        Self { user_repo, fleet_repo, jwt_secret, pool }
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self.user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))?
        ?;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        tracing::info!(user_id = %user.id, role = %user.role, "🔑 Login realizado");
        self.create_token(&Principal::from(&user))
    }

    /// Reconstrói o Principal a partir do token. Sem I/O.
    pub fn validate_token(&self, token: &str) -> Result<Principal, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )?;

        Ok(Principal::from(&token_data.claims))
    }

    pub fn create_token(&self, principal: &Principal) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: principal.user_id,
            role: principal.role,
            org: principal.organization_id,
            supplier: principal.supplier_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        // Usa '?' para um tratamento de erro mais limpo
        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }

    /// Cadastro feito por um ADMIN. A organização do novo usuário sai do filtro
    /// do administrador; usuários SUPPLIER precisam de um fornecedor da mesma organização.
    pub async fn create_user(
        &self,
        filter: &TenantFilter,
        payload: &CreateUserPayload,
    ) -> Result<User, AppError> {
        // Papel desconhecido nunca é gravado, mesmo sem passar pelo handler
        if let Err(err) = validation::known_role(&payload.role) {
            let mut errors = ValidationErrors::new();
            errors.add("role", err);
            return Err(AppError::ValidationError(errors));
        }

        let organization_id = authz::resolve_organization(filter, payload.organization_id)?;
        let org_filter = TenantFilter::organization(organization_id);

        let supplier_id = match (payload.role, payload.supplier_id) {
            (Role::Supplier, None) => return Err(AppError::SupplierRequired),
            (Role::Supplier, Some(id)) => Some(id),
            // Só usuários de portal ficam presos a um fornecedor
            (_, _) => None,
        };

        // 1. Hashing (Isso pode ficar fora da transação, pois não toca no banco)
        let password_clone = payload.password.clone();
        let hashed_password = tokio::task::spawn_blocking(move || {
            hash(&password_clone, bcrypt::DEFAULT_COST)
        })
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))?
            ?;

        let mut tx = self.pool.begin().await?;

        if let Some(id) = supplier_id {
            self.fleet_repo
                .find_supplier(&mut *tx, &org_filter, id)
                .await?
                .ok_or_else(|| AppError::ResourceNotFound(format!("Tedarikçi {}", id)))?;
        }

        let user = self.user_repo
            .create_user(
                &mut *tx,
                Some(organization_id),
                supplier_id,
                payload.email.trim(),
                payload.name.trim(),
                payload.role,
                &hashed_password,
            )
            .await?;

        tx.commit().await?;

        tracing::info!(user_id = %user.id, role = %user.role, "👤 Usuário criado");
        Ok(user)
    }
}
