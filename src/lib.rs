pub mod curriculum;
pub mod db;
pub mod error;
pub mod models;
pub mod platform;
pub mod preview;
pub mod publish;
pub mod routes;
pub mod services;
pub mod state;
