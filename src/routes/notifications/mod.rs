mod handlers;
mod types;

pub use handlers::{
    create_notification, delete_notification, get_notification, list_notifications,
    mark_all_read, update_notification,
};
pub use types::{CreateNotification, NotificationResponse, NotificationsQuery, UpdateNotification};

// Re-export utoipa path structs for OpenAPI documentation
pub use handlers::{
    __path_create_notification, __path_delete_notification, __path_get_notification,
    __path_list_notifications, __path_mark_all_read, __path_update_notification,
};
