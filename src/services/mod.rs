//! Servicios de dominio
//!
//! Lógica pura del motor de reservas: cálculo de tarifas y detección
//! de solapamientos de fechas. Sin acceso a base de datos.

pub mod availability;
pub mod pricing;
