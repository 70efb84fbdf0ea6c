//! Car Rental API
//!
//! Backend de alquiler de vehículos: autenticación de clientes, motor de
//! reservas con control de disponibilidad y registro de pagos.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
