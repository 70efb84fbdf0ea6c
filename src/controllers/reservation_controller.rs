//! Coordinador de reservas
//!
//! Implementa la secuencia completa de creación de una reserva:
//! validar fechas → cargar y bloquear el vehículo → verificar solapamientos
//! → verificar el costo → insertar, todo dentro de una sola transacción.
//! Cualquier fallo en cualquier paso hace rollback y no persiste nada.

use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::dto::reservation_dto::{
    CreateReservationRequest, ReservationResponse, UpdateReservationStatusRequest,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedCustomer;
use crate::repositories::reservation_repository::{self, NewReservation, ReservationRepository};
use crate::repositories::vehicle_repository;
use crate::services::pricing;
use crate::utils::errors::{not_found_error, AppError};

/// Rechaza rangos de alquiler inválidos. `today` llega como parámetro
/// para que la regla sea verificable sin reloj ni base de datos.
fn validate_rental_dates(
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
) -> Result<(), AppError> {
    if start < today {
        return Err(AppError::InvalidInput(
            "La fecha de inicio no puede estar en el pasado".to_string(),
        ));
    }
    if end <= start {
        return Err(AppError::InvalidInput(
            "La fecha de fin debe ser posterior a la fecha de inicio".to_string(),
        ));
    }
    Ok(())
}

pub struct ReservationController {
    pool: PgPool,
    repository: ReservationRepository,
}

impl ReservationController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ReservationRepository::new(pool.clone()),
            pool,
        }
    }

    /// Crea exactamente una reserva confirmada, o ninguna fila si algo falla.
    /// La identidad del cliente viene del token, nunca del body.
    pub async fn create(
        &self,
        customer_id: Uuid,
        request: CreateReservationRequest,
    ) -> Result<ApiResponse<ReservationResponse>, AppError> {
        // Validación pura de fechas, antes de tocar la base de datos
        validate_rental_dates(
            request.start_date,
            request.end_date,
            Utc::now().date_naive(),
        )?;

        // El resto de los pasos comparte una transacción; los returns
        // tempranos sueltan `tx` y eso deshace todo
        let mut tx = self.pool.begin().await?;

        // FOR UPDATE: dos reservas concurrentes del mismo vehículo se
        // serializan aquí
        let vehicle = vehicle_repository::find_for_booking(&mut *tx, request.vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &request.vehicle_id.to_string()))?;

        if !vehicle.is_bookable() {
            return Err(AppError::Unavailable(
                "El vehículo no está disponible para reservar".to_string(),
            ));
        }

        let conflicts = reservation_repository::count_conflicts(
            &mut *tx,
            vehicle.id,
            request.start_date,
            request.end_date,
        )
        .await?;
        if conflicts > 0 {
            return Err(AppError::Conflict(
                "El vehículo ya está reservado para las fechas seleccionadas".to_string(),
            ));
        }

        let days = pricing::rental_days(request.start_date, request.end_date);
        let expected = pricing::expected_total(vehicle.daily_rate, days);
        if !pricing::amounts_match(request.total_cost, expected) {
            return Err(AppError::CostMismatch(format!(
                "El costo total no coincide con la tarifa vigente: esperado {}, recibido {}",
                expected, request.total_cost
            )));
        }

        let reservation = reservation_repository::insert(
            &mut *tx,
            NewReservation {
                customer_id,
                vehicle_id: vehicle.id,
                start_date: request.start_date,
                end_date: request.end_date,
                total_cost: request.total_cost,
            },
        )
        .await?;

        tx.commit().await?;

        info!(
            "✅ Reserva {} creada: vehículo {} por {} días",
            reservation.id, vehicle.id, days
        );

        Ok(ApiResponse::success_with_message(
            ReservationResponse::from(reservation),
            "Reserva creada exitosamente".to_string(),
        ))
    }

    pub async fn list_for_customer(
        &self,
        customer_id: Uuid,
    ) -> Result<Vec<ReservationResponse>, AppError> {
        let reservations = self.repository.find_for_customer(customer_id).await?;

        Ok(reservations
            .into_iter()
            .map(ReservationResponse::from)
            .collect())
    }

    pub async fn get_scoped(
        &self,
        id: Uuid,
        caller: &AuthenticatedCustomer,
    ) -> Result<ReservationResponse, AppError> {
        let reservation = self
            .repository
            .find_scoped(id, caller.customer_scope())
            .await?
            .ok_or_else(|| not_found_error("Reservation", &id.to_string()))?;

        Ok(ReservationResponse::from(reservation))
    }

    /// Cancela una reserva propia (los administradores pueden cancelar
    /// cualquiera). Solo válido desde pending o confirmed.
    pub async fn cancel(
        &self,
        id: Uuid,
        caller: &AuthenticatedCustomer,
    ) -> Result<ApiResponse<ReservationResponse>, AppError> {
        let scope = caller.customer_scope();

        if let Some(reservation) = self.repository.cancel(id, scope).await? {
            info!("🚫 Reserva {} cancelada", reservation.id);
            return Ok(ApiResponse::success_with_message(
                ReservationResponse::from(reservation),
                "Reserva cancelada exitosamente".to_string(),
            ));
        }

        // Ninguna fila cumplió la condición: distinguir entre reserva
        // inexistente (o ajena) y estado no cancelable
        match self.repository.find_scoped(id, scope).await? {
            Some(_) => Err(AppError::InvalidInput(
                "La reserva ya no puede cancelarse en su estado actual".to_string(),
            )),
            None => Err(not_found_error("Reservation", &id.to_string())),
        }
    }

    /// Transición administrativa de estado: solo valida el enum,
    /// sin reglas de negocio adicionales
    pub async fn update_status(
        &self,
        id: Uuid,
        request: UpdateReservationStatusRequest,
    ) -> Result<ApiResponse<ReservationResponse>, AppError> {
        let reservation = self
            .repository
            .update_status(id, request.status)
            .await?
            .ok_or_else(|| not_found_error("Reservation", &id.to_string()))?;

        info!(
            "🔄 Reserva {} actualizada a estado {:?}",
            reservation.id, reservation.status
        );

        Ok(ApiResponse::success_with_message(
            ReservationResponse::from(reservation),
            "Estado de la reserva actualizado".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_rental_starting_today_is_accepted() {
        let today = date(2025, 7, 1);
        assert!(validate_rental_dates(today, date(2025, 7, 5), today).is_ok());
    }

    #[test]
    fn test_rental_starting_in_the_past_is_rejected() {
        let today = date(2025, 7, 10);
        let result = validate_rental_dates(date(2025, 7, 9), date(2025, 7, 12), today);
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_end_equal_to_start_is_rejected() {
        let today = date(2025, 7, 1);
        let result = validate_rental_dates(date(2025, 7, 3), date(2025, 7, 3), today);
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_end_before_start_is_rejected() {
        let today = date(2025, 7, 1);
        let result = validate_rental_dates(date(2025, 7, 8), date(2025, 7, 3), today);
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }
}
