use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::payment::{Payment, PaymentMethod, PaymentStatus};
use crate::utils::errors::AppError;

pub struct PaymentRepository {
    pool: PgPool,
}

/// Datos de un pago nuevo, ya validados contra la reserva
pub struct NewPayment {
    pub reservation_id: Uuid,
    pub amount: Decimal,
    pub payment_date: DateTime<Utc>,
    pub payment_method: PaymentMethod,
    pub status: PaymentStatus,
    pub txn_ref: String,
}

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Transición directa de estado (ruta administrativa)
    pub async fn update_status(
        &self,
        id: Uuid,
        status: PaymentStatus,
    ) -> Result<Option<Payment>, AppError> {
        let payment = sqlx::query_as::<_, Payment>(
            "UPDATE payments SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(payment)
    }
}

/// Verifica dentro de la transacción si la reserva ya tiene un pago
pub async fn exists_for_reservation(
    conn: &mut PgConnection,
    reservation_id: Uuid,
) -> Result<bool, AppError> {
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM payments WHERE reservation_id = $1)")
            .bind(reservation_id)
            .fetch_one(&mut *conn)
            .await?;

    Ok(exists)
}

/// Inserta el pago. Si dos transacciones compiten por la misma reserva,
/// la segunda choca contra la restricción UNIQUE y se reporta como
/// pago duplicado, no como error genérico de base de datos.
pub async fn insert(conn: &mut PgConnection, payment: NewPayment) -> Result<Payment, AppError> {
    let created = sqlx::query_as::<_, Payment>(
        r#"
        INSERT INTO payments (
            id, reservation_id, amount, payment_date,
            payment_method, status, txn_ref, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(payment.reservation_id)
    .bind(payment.amount)
    .bind(payment.payment_date)
    .bind(payment.payment_method)
    .bind(payment.status)
    .bind(&payment.txn_ref)
    .bind(Utc::now())
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| match e.as_database_error().and_then(|db| db.constraint()) {
        Some("payments_reservation_id_key") => {
            AppError::AlreadyExists("Ya existe un pago para esta reserva".to_string())
        }
        _ => AppError::Database(e),
    })?;

    Ok(created)
}
