use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::reservation::{Reservation, ReservationStatus};
use crate::utils::errors::AppError;

pub struct ReservationRepository {
    pool: PgPool,
}

/// Datos de una reserva nueva, ya validados por el coordinador
pub struct NewReservation {
    pub customer_id: Uuid,
    pub vehicle_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_cost: Decimal,
}

impl ReservationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_for_customer(&self, customer_id: Uuid) -> Result<Vec<Reservation>, AppError> {
        let reservations = sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE customer_id = $1 ORDER BY created_at DESC",
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reservations)
    }

    /// Carga una reserva limitada al cliente indicado.
    /// Con `customer_scope = None` (administradores) no se filtra por dueño.
    pub async fn find_scoped(
        &self,
        id: Uuid,
        customer_scope: Option<Uuid>,
    ) -> Result<Option<Reservation>, AppError> {
        let reservation = sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE id = $1 AND ($2::uuid IS NULL OR customer_id = $2)",
        )
        .bind(id)
        .bind(customer_scope)
        .fetch_optional(&self.pool)
        .await?;

        Ok(reservation)
    }

    /// Transición directa de estado (ruta administrativa)
    pub async fn update_status(
        &self,
        id: Uuid,
        status: ReservationStatus,
    ) -> Result<Option<Reservation>, AppError> {
        let reservation = sqlx::query_as::<_, Reservation>(
            "UPDATE reservations SET status = $2, updated_at = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(reservation)
    }

    /// Cancela solo si la reserva sigue en un estado cancelable.
    /// Devuelve None cuando ninguna fila cumplió la condición; el llamador
    /// distingue entre inexistente y estado no cancelable.
    pub async fn cancel(
        &self,
        id: Uuid,
        customer_scope: Option<Uuid>,
    ) -> Result<Option<Reservation>, AppError> {
        let reservation = sqlx::query_as::<_, Reservation>(
            r#"
            UPDATE reservations
            SET status = 'cancelled', updated_at = $3
            WHERE id = $1
              AND ($2::uuid IS NULL OR customer_id = $2)
              AND status IN ('pending', 'confirmed')
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(customer_scope)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(reservation)
    }
}

/// Versión transaccional de `find_scoped`, para el registro de pagos
pub async fn find_scoped_tx(
    conn: &mut PgConnection,
    id: Uuid,
    customer_scope: Option<Uuid>,
) -> Result<Option<Reservation>, AppError> {
    let reservation = sqlx::query_as::<_, Reservation>(
        "SELECT * FROM reservations WHERE id = $1 AND ($2::uuid IS NULL OR customer_id = $2)",
    )
    .bind(id)
    .bind(customer_scope)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(reservation)
}

/// Cuenta reservas bloqueantes que se solapan con [start, end).
/// Misma condición que `services::availability::periods_overlap`, ejecutada
/// sobre la transacción de la reserva para compartir su snapshot.
pub async fn count_conflicts(
    conn: &mut PgConnection,
    vehicle_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<i64, AppError> {
    let conflicts: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM reservations
        WHERE vehicle_id = $1
          AND status IN ('pending', 'confirmed', 'active')
          AND (
                (start_date <= $2 AND end_date > $2)
             OR (start_date < $3 AND end_date >= $3)
             OR (start_date >= $2 AND end_date <= $3)
          )
        "#,
    )
    .bind(vehicle_id)
    .bind(start)
    .bind(end)
    .fetch_one(&mut *conn)
    .await?;

    Ok(conflicts)
}

/// Inserta la reserva dentro de la transacción del coordinador.
/// El flujo de reserva crea directamente en 'confirmed', sin fase de espera.
pub async fn insert(
    conn: &mut PgConnection,
    reservation: NewReservation,
) -> Result<Reservation, AppError> {
    let now = Utc::now();
    let created = sqlx::query_as::<_, Reservation>(
        r#"
        INSERT INTO reservations (
            id, customer_id, vehicle_id, start_date, end_date,
            total_cost, status, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(reservation.customer_id)
    .bind(reservation.vehicle_id)
    .bind(reservation.start_date)
    .bind(reservation.end_date)
    .bind(reservation.total_cost)
    .bind(ReservationStatus::Confirmed)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    Ok(created)
}
