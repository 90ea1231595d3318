// src/models/projects.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;
use utoipa::{IntoParams, ToSchema};

use crate::common::validation::{non_negative_money, percentage};

// --- Proje (O contrato de transporte com uma fábrica) ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub organization_id: Uuid,
    #[schema(example = "Gebze Personel Servisi")]
    pub name: String,
    #[schema(example = "Arçelik Gebze")]
    pub factory_name: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectPayload {
    #[validate(length(min = 1, message = "required"))]
    pub name: String,
    pub factory_name: Option<String>,
    pub organization_id: Option<Uuid>,
}

// --- Güzergah (Rota) ---
// `birim_fiyat` é o preço vivo pago ao fornecedor; as linhas de puantaj
// copiam este valor no momento da criação.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub project_id: Uuid,
    #[schema(example = "Kadıköy - Gebze OSB")]
    pub name: String,
    #[schema(example = "1250.00")]
    pub birim_fiyat: Decimal,
    #[schema(example = "1600.00")]
    pub fabrika_fiyati: Option<Decimal>,
    #[schema(example = "20")]
    pub kdv_orani: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoutePayload {
    pub project_id: Uuid,

    #[validate(length(min = 1, message = "required"))]
    pub name: String,

    #[validate(custom(function = "non_negative_money"))]
    #[schema(example = "1250.00")]
    pub birim_fiyat: Decimal,

    // Preço de fábrica só pode ser definido por quem tem permissão (ver handler)
    #[validate(custom(function = "non_negative_money"))]
    pub fabrika_fiyati: Option<Decimal>,

    #[validate(custom(function = "percentage"))]
    #[schema(example = "20")]
    pub kdv_orani: Option<Decimal>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFactoryPricePayload {
    #[validate(custom(function = "non_negative_money"))]
    #[schema(example = "1600.00")]
    pub fabrika_fiyati: Decimal,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct RouteListQuery {
    pub project_id: Option<Uuid>,
}
