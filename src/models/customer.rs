//! Modelo de Customer
//!
//! Este módulo contiene el struct Customer y su rol dentro del sistema.
//! Mapea exactamente a la tabla customers del schema.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Rol del cliente - mapea al ENUM customer_role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "customer_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CustomerRole {
    Customer,
    Admin,
}

/// Customer principal - mapea exactamente a la tabla customers
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub date_of_birth: Option<NaiveDate>,
    pub driver_license: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: CustomerRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// Verificar si el cliente tiene permisos de administrador
    pub fn is_admin(&self) -> bool {
        self.role == CustomerRole::Admin
    }
}
