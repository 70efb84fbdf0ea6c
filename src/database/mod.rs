//! Módulo de base de datos
//!
//! Maneja la conexión a PostgreSQL y la creación inicial del schema.

pub mod connection;
pub mod schema;

pub use connection::DatabaseConnection;
