mod handlers;
mod types;

pub use handlers::{
    create_batch, delete_batch, get_batch, list_batches, load_batch_detail, simulate_parameter,
    start_production, stop_production, update_batch,
};
pub use types::{BatchDetailResponse, BatchSummary, BatchesQuery, CreateBatch, UpdateBatch};

// Re-export utoipa path structs for OpenAPI documentation
pub use handlers::{
    __path_create_batch, __path_delete_batch, __path_get_batch, __path_list_batches,
    __path_simulate_parameter, __path_start_production, __path_stop_production,
    __path_update_batch,
};
