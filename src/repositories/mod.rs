//! Repositorios de acceso a datos
//!
//! Cada repositorio envuelve el pool para operaciones sueltas. Las
//! operaciones que participan en la transacción de reserva o de pago son
//! funciones libres sobre `&mut PgConnection`, de modo que el coordinador
//! decide dónde empieza y termina la transacción.

pub mod customer_repository;
pub mod payment_repository;
pub mod reservation_repository;
pub mod vehicle_repository;
