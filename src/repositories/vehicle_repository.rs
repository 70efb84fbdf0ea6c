use sqlx::PgConnection;
use uuid::Uuid;

use crate::models::vehicle::Vehicle;
use crate::utils::errors::AppError;

/// Carga un vehículo dentro de la transacción de reserva, tomando el lock
/// de fila. Dos reservas concurrentes del mismo vehículo se serializan en
/// este SELECT: la segunda espera el commit de la primera y su verificación
/// de conflictos ya ve la reserva recién insertada.
pub async fn find_for_booking(
    conn: &mut PgConnection,
    vehicle_id: Uuid,
) -> Result<Option<Vehicle>, AppError> {
    let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1 FOR UPDATE")
        .bind(vehicle_id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(vehicle)
}
