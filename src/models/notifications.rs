// src/models/notifications.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "notification_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
// Só TimesheetApproved e ReportReady são emitidos hoje; os outros completam o enum do banco
pub enum NotificationType {
    DocumentExpiry,
    TimesheetApproved,
    ReportReady,
    General,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub organization_id: Option<Uuid>,
    pub user_id: Uuid,
    pub kind: NotificationType,
    #[schema(example = "Puantaj onaylandı")]
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

// O que os serviços mandam gravar
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub organization_id: Option<Uuid>,
    pub user_id: Uuid,
    pub kind: NotificationType,
    pub title: String,
    pub message: String,
}
