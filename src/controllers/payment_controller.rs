//! Registro de pagos
//!
//! Asocia a lo sumo un pago a cada reserva: carga la reserva con el alcance
//! del cliente, verifica que no exista pago previo, compara el monto contra
//! el costo total y persiste, todo dentro de una transacción.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::payment_dto::{
    CreatePaymentRequest, PaymentResponse, UpdatePaymentStatusRequest,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedCustomer;
use crate::models::payment::PaymentStatus;
use crate::repositories::payment_repository::{self, NewPayment, PaymentRepository};
use crate::repositories::reservation_repository;
use crate::services::pricing;
use crate::utils::errors::{not_found_error, AppError};

/// Referencia de transacción autogenerada. UUID v4 en lugar de un
/// timestamp: dos pagos registrados en el mismo milisegundo no chocan.
pub fn generate_txn_ref() -> String {
    format!("TXN-{}", Uuid::new_v4().simple())
}

pub struct PaymentController {
    pool: PgPool,
    repository: PaymentRepository,
}

impl PaymentController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PaymentRepository::new(pool.clone()),
            pool,
        }
    }

    pub async fn create(
        &self,
        caller: &AuthenticatedCustomer,
        request: CreatePaymentRequest,
    ) -> Result<ApiResponse<PaymentResponse>, AppError> {
        request.validate()?;

        let mut tx = self.pool.begin().await?;

        let reservation = reservation_repository::find_scoped_tx(
            &mut *tx,
            request.reservation_id,
            caller.customer_scope(),
        )
        .await?
        .ok_or_else(|| not_found_error("Reservation", &request.reservation_id.to_string()))?;

        if payment_repository::exists_for_reservation(&mut *tx, reservation.id).await? {
            return Err(AppError::AlreadyExists(
                "Ya existe un pago para esta reserva".to_string(),
            ));
        }

        if !pricing::amounts_match(request.amount, reservation.total_cost) {
            return Err(AppError::AmountMismatch(format!(
                "El monto no coincide con el costo de la reserva: esperado {}, recibido {}",
                reservation.total_cost, request.amount
            )));
        }

        let payment = payment_repository::insert(
            &mut *tx,
            NewPayment {
                reservation_id: reservation.id,
                amount: request.amount,
                payment_date: request.payment_date,
                payment_method: request.payment_method,
                status: request.status.unwrap_or(PaymentStatus::Completed),
                txn_ref: request.txn_ref.unwrap_or_else(generate_txn_ref),
            },
        )
        .await?;

        tx.commit().await?;

        info!(
            "💳 Pago {} registrado para la reserva {}",
            payment.id, payment.reservation_id
        );

        Ok(ApiResponse::success_with_message(
            PaymentResponse::from(payment),
            "Pago registrado exitosamente".to_string(),
        ))
    }

    /// Transición administrativa de estado del pago
    pub async fn update_status(
        &self,
        id: Uuid,
        request: UpdatePaymentStatusRequest,
    ) -> Result<ApiResponse<PaymentResponse>, AppError> {
        let payment = self
            .repository
            .update_status(id, request.status)
            .await?
            .ok_or_else(|| not_found_error("Payment", &id.to_string()))?;

        info!(
            "🔄 Pago {} actualizado a estado {:?}",
            payment.id, payment.status
        );

        Ok(ApiResponse::success_with_message(
            PaymentResponse::from(payment),
            "Estado del pago actualizado".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_txn_ref_format() {
        let txn_ref = generate_txn_ref();
        assert!(txn_ref.starts_with("TXN-"));
        // prefijo + uuid v4 en formato simple (32 hex)
        assert_eq!(txn_ref.len(), 4 + 32);
    }

    #[test]
    fn test_txn_refs_are_unique() {
        let refs: HashSet<String> = (0..1000).map(|_| generate_txn_ref()).collect();
        assert_eq!(refs.len(), 1000);
    }
}
