// src/models/reports.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;
use utoipa::{IntoParams, ToSchema};

// Linha crua vinda do banco: viagens aprovadas agrupadas por rota
#[derive(Debug, Clone, FromRow)]
pub struct FactoryTripRow {
    pub route_id: Uuid,
    pub route_name: String,
    pub project_name: String,
    pub factory_name: Option<String>,
    pub fabrika_fiyati: Option<Decimal>,
    pub sefer: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FactoryReportLine {
    pub route_id: Uuid,
    #[schema(example = "Kadıköy - Gebze OSB")]
    pub route_name: String,
    pub project_name: String,
    pub factory_name: Option<String>,
    #[schema(example = 42)]
    pub sefer: i64,
    #[schema(example = "1600.00")]
    pub fabrika_fiyati: Option<Decimal>,
    #[schema(example = "67200.00")]
    pub tutar: Decimal,
    // Rota sem preço de fábrica: entra no relatório com valor zero
    pub missing_price: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FactoryReport {
    pub yil: i32,
    pub ay: i32,
    pub lines: Vec<FactoryReportLine>,
    pub toplam_sefer: i64,
    #[schema(example = "67200.00")]
    pub toplam_tutar: Decimal,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct FactoryReportQuery {
    #[validate(range(min = 2000, max = 2100, message = "year_out_of_range"))]
    pub yil: i32,
    #[validate(range(min = 1, max = 12, message = "month_out_of_range"))]
    pub ay: i32,
    pub project_id: Option<Uuid>,
}
