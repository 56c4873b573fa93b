//! Protein Line - management API for a simulated protein-bar production line
//!
//! This library exposes the core modules for testing and reuse.

pub mod common;
pub mod config;
pub mod entity;
pub mod error;
pub mod routes;
pub mod services;
pub mod simulation;
