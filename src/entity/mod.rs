pub mod batch_parameters;
pub mod batches;
pub mod computer_vision_data;
pub mod notifications;
pub mod production_settings;
