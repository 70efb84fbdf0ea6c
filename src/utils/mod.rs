//! Utilidades del sistema
//!
//! Este módulo contiene el manejo de errores y tipos de resultado
//! compartidos por toda la aplicación.

pub mod errors;
