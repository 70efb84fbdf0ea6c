//! Modelo de Reservation
//!
//! Este módulo contiene el struct Reservation, su enum de estado y las
//! reglas de la máquina de estados:
//! pending → confirmed → {active → completed | cancelled}

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado de la reserva - mapea al ENUM reservation_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "reservation_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Active,
    Completed,
    Cancelled,
}

impl ReservationStatus {
    /// Estados que ocupan el vehículo y bloquean reservas nuevas.
    /// Una reserva activa ocupa el vehículo físicamente, así que
    /// bloquea igual que las pendientes y confirmadas.
    pub fn blocks_booking(&self) -> bool {
        matches!(
            self,
            ReservationStatus::Pending | ReservationStatus::Confirmed | ReservationStatus::Active
        )
    }

    /// El cliente solo puede cancelar antes de que inicie el alquiler
    pub fn can_cancel(&self) -> bool {
        matches!(
            self,
            ReservationStatus::Pending | ReservationStatus::Confirmed
        )
    }
}

/// Reservation principal - mapea exactamente a la tabla reservations
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reservation {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_reservations_block_new_bookings() {
        assert!(ReservationStatus::Pending.blocks_booking());
        assert!(ReservationStatus::Confirmed.blocks_booking());
        assert!(ReservationStatus::Active.blocks_booking());
        assert!(!ReservationStatus::Completed.blocks_booking());
        assert!(!ReservationStatus::Cancelled.blocks_booking());
    }

    #[test]
    fn test_only_pending_and_confirmed_can_be_cancelled() {
        assert!(ReservationStatus::Pending.can_cancel());
        assert!(ReservationStatus::Confirmed.can_cancel());
        assert!(!ReservationStatus::Active.can_cancel());
        assert!(!ReservationStatus::Completed.can_cancel());
        assert!(!ReservationStatus::Cancelled.can_cancel());
    }
}
