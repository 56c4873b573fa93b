use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::entity::notifications::{self, NotificationType};

#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationResponse {
    pub id: Uuid,
    pub batch_id: Option<Uuid>,
    pub message: String,
    pub notification_type: NotificationType,
    pub timestamp: DateTime<Utc>,
    pub is_read: bool,
}

impl From<notifications::Model> for NotificationResponse {
    fn from(n: notifications::Model) -> Self {
        Self {
            id: n.id,
            batch_id: n.batch_id,
            message: n.message,
            notification_type: n.notification_type,
            timestamp: n.timestamp.with_timezone(&Utc),
            is_read: n.is_read,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct NotificationsQuery {
    /// Filter by batch
    pub batch_id: Option<Uuid>,
    /// Filter by read flag
    pub is_read: Option<bool>,
    /// Filter by type (info, warning, error, success)
    pub notification_type: Option<NotificationType>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateNotification {
    pub batch_id: Option<Uuid>,
    pub message: String,
    /// Defaults to info
    pub notification_type: Option<NotificationType>,
    #[serde(default)]
    pub is_read: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateNotification {
    pub message: Option<String>,
    pub notification_type: Option<NotificationType>,
    pub is_read: Option<bool>,
}
