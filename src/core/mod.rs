//! Configuration and shared data model

pub mod config;
pub mod models;
pub mod source;
