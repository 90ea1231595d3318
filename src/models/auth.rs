// src/models/auth.rs

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;
use validator::Validate;
use utoipa::ToSchema;

use crate::common::validation::known_role;

// ---
// 1. Papel (Role)
// ---
// Enum fechado. Qualquer valor desconhecido (banco ou token) vira `Unknown`,
// e `Unknown` é negado por todos os predicados de permissão.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Manager,
    User,
    Supplier,
    Unknown,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Manager, Role::User, Role::Supplier];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Manager => "MANAGER",
            Role::User => "USER",
            Role::Supplier => "SUPPLIER",
            Role::Unknown => "UNKNOWN",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "ADMIN" => Role::Admin,
            "MANAGER" => Role::Manager,
            "USER" => Role::User,
            "SUPPLIER" => Role::Supplier,
            _ => Role::Unknown,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Usado pelo `#[sqlx(try_from = "String")]` (a coluna é TEXT)
impl From<String> for Role {
    fn from(value: String) -> Self {
        Role::parse(&value)
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Role::parse(&value))
    }
}

// ---
// 2. Principal (O ator autenticado)
// ---
// Reconstruído a cada requisição a partir do JWT. Nunca muda dentro da requisição.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub user_id: Uuid,
    #[schema(value_type = String, example = "MANAGER")]
    pub role: Role,
    pub organization_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
}

impl From<&Claims> for Principal {
    fn from(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub,
            role: claims.role,
            organization_id: claims.org,
            supplier_id: claims.supplier,
        }
    }
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            role: user.role,
            organization_id: user.organization_id,
            supplier_id: user.supplier_id,
        }
    }
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub organization_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    #[schema(example = "operasyon@firma.com.tr")]
    pub email: String,
    #[schema(example = "Ayşe Yılmaz")]
    pub name: String,

    #[sqlx(try_from = "String")]
    #[schema(value_type = String, example = "USER")]
    pub role: Role,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password_hash: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(email(message = "invalid_email"))]
    #[schema(example = "admin@firma.com.tr")]
    pub email: String,
    #[validate(length(min = 6, message = "password_too_short"))]
    pub password: String,
}

// Cadastro de usuário (somente ADMIN)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserPayload {
    #[validate(email(message = "invalid_email"))]
    pub email: String,

    #[validate(length(min = 1, message = "required"))]
    pub name: String,

    #[validate(length(min = 6, message = "password_too_short"))]
    pub password: String,

    #[validate(custom(function = "known_role"))]
    #[schema(value_type = String, example = "USER")]
    pub role: Role,

    // Obrigatório apenas quando o ADMIN não pertence a uma organização
    pub organization_id: Option<Uuid>,

    // Obrigatório para usuários SUPPLIER
    pub supplier_id: Option<Uuid>,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<Uuid>,
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_known_values() {
        for role in Role::ALL {
            assert_eq!(Role::parse(role.as_str()), role);
        }
    }

    #[test]
    fn unrecognized_role_becomes_unknown() {
        assert_eq!(Role::parse("SUPERUSER"), Role::Unknown);
        assert_eq!(Role::parse("admin"), Role::Unknown);
        assert_eq!(Role::from(String::new()), Role::Unknown);
    }

    #[test]
    fn role_round_trips_through_json() {
        let json = serde_json::to_string(&Role::Manager).unwrap();
        assert_eq!(json, "\"MANAGER\"");

        let role: Role = serde_json::from_str("\"FLEET_OWNER\"").unwrap();
        assert_eq!(role, Role::Unknown);
    }

    #[test]
    fn create_payload_rejects_unrecognized_roles() {
        let payload: CreateUserPayload = serde_json::from_str(
            r#"{"email":"x@firma.com.tr","name":"X","password":"123456","role":"SUPERVISOR"}"#,
        )
        .unwrap();
        assert_eq!(payload.role, Role::Unknown);

        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("role"));
    }

    #[test]
    fn principal_is_rebuilt_from_claims() {
        let org = Uuid::new_v4();
        let claims = Claims {
            sub: Uuid::new_v4(),
            role: Role::User,
            org: Some(org),
            supplier: None,
            exp: 0,
            iat: 0,
        };

        let principal = Principal::from(&claims);
        assert_eq!(principal.user_id, claims.sub);
        assert_eq!(principal.role, Role::User);
        assert_eq!(principal.organization_id, Some(org));
        assert_eq!(principal.supplier_id, None);
    }
}
