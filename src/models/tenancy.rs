// src/models/tenancy.rs

use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;
use utoipa::ToSchema;

// ---
// 1. Organization (O "Tenant")
// ---
// Fronteira de faturamento e de isolamento. Quase tudo pertence a exatamente uma.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: Uuid,
    #[schema(example = "Anadolu Lojistik A.Ş.")]
    pub name: String,
    #[schema(example = "1234567890")]
    pub tax_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrganizationPayload {
    #[validate(length(min = 1, message = "required"))]
    pub name: String,
    pub tax_number: Option<String>,
}

// ---
// 2. TenantFilter (A restrição de consulta)
// ---
// Derivado do Principal a cada requisição, nunca persistido.
// `None` = sem restrição (administrador de nível corporativo).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TenantFilter {
    organization_id: Option<Uuid>,
}

impl TenantFilter {
    pub fn unrestricted() -> Self {
        Self { organization_id: None }
    }

    pub fn organization(organization_id: Uuid) -> Self {
        Self { organization_id: Some(organization_id) }
    }

    pub fn organization_id(&self) -> Option<Uuid> {
        self.organization_id
    }

    pub fn is_unrestricted(&self) -> bool {
        self.organization_id.is_none()
    }
}
