mod handlers;
mod types;

pub use handlers::{
    activate_settings, active_settings, create_settings, delete_settings, get_settings,
    list_settings, update_settings,
};
pub use types::{CreateSettings, SettingsResponse, UpdateSettings};

// Re-export utoipa path structs for OpenAPI documentation
pub use handlers::{
    __path_activate_settings, __path_active_settings, __path_create_settings,
    __path_delete_settings, __path_get_settings, __path_list_settings, __path_update_settings,
};
