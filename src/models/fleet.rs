// src/models/fleet.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;
use utoipa::ToSchema;

// --- Tedarikçi (Fornecedor / Transportadora terceirizada) ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: Uuid,
    pub organization_id: Uuid,
    #[schema(example = "Yıldız Nakliyat")]
    pub name: String,
    pub tax_number: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSupplierPayload {
    #[validate(length(min = 1, message = "required"))]
    pub name: String,
    pub tax_number: Option<String>,
    pub phone: Option<String>,
    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,
    pub organization_id: Option<Uuid>,
}

// --- Araç (Veículo) ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub supplier_id: Option<Uuid>,
    #[schema(example = "34 ABC 123")]
    pub plate: String,
    #[schema(example = "Mercedes Sprinter")]
    pub model: Option<String>,
    #[schema(example = 16)]
    pub capacity: Option<i32>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehiclePayload {
    #[validate(length(min = 1, max = 16, message = "required"))]
    pub plate: String,
    pub model: Option<String>,
    #[validate(range(min = 1, max = 100, message = "capacity_out_of_range"))]
    pub capacity: Option<i32>,
    pub supplier_id: Option<Uuid>,
    pub organization_id: Option<Uuid>,
}

// --- Şoför (Motorista) ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub supplier_id: Option<Uuid>,
    #[schema(example = "Mehmet Demir")]
    pub full_name: String,
    pub phone: Option<String>,
    pub license_number: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDriverPayload {
    #[validate(length(min = 1, message = "required"))]
    pub full_name: String,
    pub phone: Option<String>,
    pub license_number: Option<String>,
    pub supplier_id: Option<Uuid>,
    pub organization_id: Option<Uuid>,
}
