// src/models/dashboard.rs

use serde::Serialize;
use utoipa::ToSchema;

// Os cards do topo do painel
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub suppliers: i64,
    pub vehicles: i64,
    pub drivers: i64,
    pub projects: i64,
    pub routes: i64,
    pub draft_timesheets: i64, // Puantajes ainda não aprovados
}
