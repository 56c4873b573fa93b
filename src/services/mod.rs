//! Business operations layered on top of the CRUD resources.
//!
//! Every operation that writes more than one row runs inside a single
//! transaction. The partial unique indexes on `is_active` turn a lost race
//! between two concurrent writers into a unique violation instead of a second
//! active row.

pub mod notifications;
pub mod production;
pub mod rate_limit;
pub mod settings;
pub mod vision;
