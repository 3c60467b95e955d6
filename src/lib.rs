pub mod config;
pub mod database;
pub mod entities;
pub mod errors;
pub mod models;
pub mod services;
pub mod sources;
pub mod utils;
