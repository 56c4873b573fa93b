mod models;
mod state;

pub use models::StatusResponse;
pub use state::AppState;
