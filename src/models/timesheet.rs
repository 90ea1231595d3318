// src/models/timesheet.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;
use utoipa::{IntoParams, ToSchema};

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "timesheet_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimesheetStatus {
    Draft,    // Em digitação
    Approved, // Aprovado (travado)
}

// --- Structs ---

// Puantaj: registro mensal de viagens por rota para um veículo/projeto
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Timesheet {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub project_id: Uuid,
    pub vehicle_id: Uuid,
    pub driver_id: Option<Uuid>,
    #[schema(example = 2025)]
    pub yil: i32,
    #[schema(example = 3)]
    pub ay: i32,
    pub status: TimesheetStatus,
    pub created_by: Uuid,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Timesheet {
    /// A data pertence ao mês deste puantaj?
    pub fn covers(&self, date: NaiveDate) -> bool {
        use chrono::Datelike;
        date.year() == self.yil && date.month() as i32 == self.ay
    }

    pub fn is_locked(&self) -> bool {
        self.status == TimesheetStatus::Approved
    }
}

// Uma linha por (data, rota). Os snapshots são imutáveis depois de gravados.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimesheetEntry {
    pub id: Uuid,
    pub timesheet_id: Uuid,
    pub route_id: Uuid,
    #[schema(value_type = String, format = Date, example = "2025-03-14")]
    pub tarih: NaiveDate,
    #[schema(example = 10)]
    pub sefer_sayisi: i32,
    #[schema(example = "100.00")]
    pub birim_fiyat_snapshot: Decimal,
    #[schema(example = "20")]
    pub kdv_orani_snapshot: Decimal,
}

// Derivado, nunca persistido
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimesheetCalculation {
    #[schema(example = "2000.00")]
    pub toplam: Decimal,
    #[schema(example = "400.00")]
    pub kdv: Decimal,
    #[schema(example = "2400.00")]
    pub ara_toplam: Decimal,
    #[schema(example = "200.00")]
    pub tevkifat: Decimal,
    #[schema(example = "2200.00")]
    pub fatura_tutari: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimesheetDetail {
    #[serde(flatten)]
    pub header: Timesheet,
    pub entries: Vec<TimesheetEntry>,
    pub calculation: TimesheetCalculation,
}

// Listagem com os totais já calculados (usado também pelo portal do fornecedor)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimesheetSummary {
    #[serde(flatten)]
    pub header: Timesheet,
    pub calculation: TimesheetCalculation,
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTimesheetPayload {
    pub project_id: Uuid,
    pub vehicle_id: Uuid,
    pub driver_id: Option<Uuid>,
    #[validate(range(min = 2000, max = 2100, message = "year_out_of_range"))]
    pub yil: i32,
    #[validate(range(min = 1, max = 12, message = "month_out_of_range"))]
    pub ay: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertEntryPayload {
    pub route_id: Uuid,
    #[schema(value_type = String, format = Date, example = "2025-03-14")]
    pub tarih: NaiveDate,
    #[validate(range(min = 0, max = 1000, message = "trip_count_out_of_range"))]
    pub sefer_sayisi: i32,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct TimesheetListQuery {
    pub yil: Option<i32>,
    pub ay: Option<i32>,
    pub project_id: Option<Uuid>,
}
