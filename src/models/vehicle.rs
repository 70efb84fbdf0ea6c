//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle y sus enums de estado.
//! Mapea exactamente a la tabla vehicles del schema.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado del vehículo - mapea al ENUM vehicle_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "vehicle_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    Available,
    Rented,
    Maintenance,
    Retired,
}

/// Tipo de combustible - mapea al ENUM fuel_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "fuel_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FuelType {
    Petrol,
    Diesel,
    Hybrid,
    Electric,
}

/// Tipo de transmisión - mapea al ENUM transmission_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "transmission_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Transmission {
    Manual,
    Automatic,
}

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub color: Option<String>,
    pub license_plate: String,
    pub vin: Option<String>,
    pub fuel_type: FuelType,
    pub transmission: Transmission,
    pub seats: i32,
    pub daily_rate: Decimal,
    pub status: VehicleStatus,
    pub branch_id: Uuid,
    pub mileage: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vehicle {
    /// Un vehículo solo acepta reservas nuevas mientras está disponible
    pub fn is_bookable(&self) -> bool {
        self.status == VehicleStatus::Available
    }
}
