mod handlers;
mod types;

pub use handlers::{
    create_vision_data, delete_vision_data, get_vision_data, list_vision_data, process_frame,
    start_camera, stop_camera, update_vision_data,
};
pub use types::{CreateVisionData, UpdateVisionData, VisionDataResponse, VisionQuery};

// Re-export utoipa path structs for OpenAPI documentation
pub use handlers::{
    __path_create_vision_data, __path_delete_vision_data, __path_get_vision_data,
    __path_list_vision_data, __path_process_frame, __path_start_camera, __path_stop_camera,
    __path_update_vision_data,
};
