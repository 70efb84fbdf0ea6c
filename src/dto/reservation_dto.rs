use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::reservation::{Reservation, ReservationStatus};

// Request para crear una reserva. El cliente viene del token, nunca del body.
#[derive(Debug, Deserialize)]
pub struct CreateReservationRequest {
    pub vehicle_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_cost: Decimal,
}

// Request de cambio de estado (solo administradores).
// serde rechaza cualquier valor fuera del enum.
#[derive(Debug, Deserialize)]
pub struct UpdateReservationStatusRequest {
    pub status: ReservationStatus,
}

// Response de reserva
#[derive(Debug, Serialize)]
pub struct ReservationResponse {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub vehicle_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_cost: Decimal,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Reservation> for ReservationResponse {
    fn from(reservation: Reservation) -> Self {
        Self {
            id: reservation.id,
            customer_id: reservation.customer_id,
            vehicle_id: reservation.vehicle_id,
            start_date: reservation.start_date,
            end_date: reservation.end_date,
            total_cost: reservation.total_cost,
            status: reservation.status,
            created_at: reservation.created_at,
            updated_at: reservation.updated_at,
        }
    }
}
