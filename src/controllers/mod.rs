//! Controladores de la API
//!
//! Orquestan cada operación: validan la entrada, delegan en los
//! repositorios y arman la respuesta. Las operaciones de reserva y pago
//! corren dentro de una transacción propia con rollback ante cualquier error.

pub mod auth_controller;
pub mod payment_controller;
pub mod reservation_controller;
