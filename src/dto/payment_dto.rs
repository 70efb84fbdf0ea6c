use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::payment::{Payment, PaymentMethod, PaymentStatus};

// Request para registrar el pago de una reserva
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePaymentRequest {
    pub reservation_id: Uuid,

    pub amount: Decimal,

    pub payment_method: PaymentMethod,

    pub payment_date: DateTime<Utc>,

    // Por defecto: se genera una referencia única
    #[validate(length(min = 1, max = 100))]
    pub txn_ref: Option<String>,

    // Por defecto: completed
    pub status: Option<PaymentStatus>,
}

// Request de cambio de estado (solo administradores)
#[derive(Debug, Deserialize)]
pub struct UpdatePaymentStatusRequest {
    pub status: PaymentStatus,
}

// Response de pago
#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub id: Uuid,
    pub reservation_id: Uuid,
    pub amount: Decimal,
    pub payment_date: DateTime<Utc>,
    pub payment_method: PaymentMethod,
    pub status: PaymentStatus,
    pub txn_ref: String,
    pub created_at: DateTime<Utc>,
}

impl From<Payment> for PaymentResponse {
    fn from(payment: Payment) -> Self {
        Self {
            id: payment.id,
            reservation_id: payment.reservation_id,
            amount: payment.amount,
            payment_date: payment.payment_date,
            payment_method: payment.payment_method,
            status: payment.status,
            txn_ref: payment.txn_ref,
            created_at: payment.created_at,
        }
    }
}
