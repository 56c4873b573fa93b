mod handlers;
mod types;

pub use handlers::{
    create_parameter, current_parameters, delete_parameter, get_parameter, list_parameters,
    update_parameter,
};
pub use types::{CreateParameter, ParameterResponse, ParametersQuery, UpdateParameter};

// Re-export utoipa path structs for OpenAPI documentation
pub use handlers::{
    __path_create_parameter, __path_current_parameters, __path_delete_parameter,
    __path_get_parameter, __path_list_parameters, __path_update_parameter,
};
