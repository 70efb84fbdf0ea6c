//! Middleware de autenticación JWT
//!
//! Este módulo maneja la autenticación JWT, extracción de tokens
//! y verificación de clientes autenticados.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
    Extension,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::EnvironmentConfig,
    models::customer::{Customer, CustomerRole},
    repositories::customer_repository::CustomerRepository,
    state::AppState,
    utils::errors::AppError,
};

/// Claims del JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // customer_id
    pub email: String,
    pub name: String,
    pub role: String,
    pub exp: usize,
    pub iat: usize,
}

/// Cliente autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedCustomer {
    pub customer_id: Uuid,
    pub email: String,
    pub name: String,
    pub role: CustomerRole,
}

impl AuthenticatedCustomer {
    pub fn is_admin(&self) -> bool {
        self.role == CustomerRole::Admin
    }

    /// Alcance de visibilidad sobre reservas y pagos:
    /// los administradores ven todo, los clientes solo lo propio
    pub fn customer_scope(&self) -> Option<Uuid> {
        if self.is_admin() {
            None
        } else {
            Some(self.customer_id)
        }
    }
}

/// Middleware de autenticación JWT
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Extraer token del header Authorization
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|auth_str| auth_str.to_str().ok())
        .and_then(|auth_str| auth_str.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Token de autorización requerido".to_string()))?;

    // Decodificar y validar JWT
    let token_data = decode::<Claims>(
        auth_header,
        &DecodingKey::from_secret(state.config.jwt_secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized("Token inválido".to_string()))?;

    let claims = token_data.claims;

    let customer_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthorized("ID de cliente inválido".to_string()))?;

    // Verificar que el cliente sigue existiendo en la base de datos
    let customer = CustomerRepository::new(state.pool.clone())
        .find_by_id(customer_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Cliente no encontrado".to_string()))?;

    let authenticated = AuthenticatedCustomer {
        customer_id: customer.id,
        email: customer.email,
        name: customer.name,
        role: customer.role,
    };

    // Inyectar cliente autenticado en las extensions
    request.extensions_mut().insert(authenticated);

    Ok(next.run(request).await)
}

/// Middleware para rutas exclusivas de administradores
pub async fn admin_only_middleware(
    Extension(customer): Extension<AuthenticatedCustomer>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !customer.is_admin() {
        return Err(AppError::Forbidden(
            "Se requieren permisos de administrador".to_string(),
        ));
    }

    Ok(next.run(request).await)
}

/// Función para generar JWT token
pub fn generate_jwt_token(
    customer: &Customer,
    config: &EnvironmentConfig,
) -> Result<String, AppError> {
    let now = chrono::Utc::now();
    let expires_at = now + chrono::Duration::seconds(config.jwt_expiration as i64);

    let claims = Claims {
        sub: customer.id.to_string(),
        email: customer.email.clone(),
        name: customer.name.clone(),
        role: if customer.is_admin() { "admin" } else { "customer" }.to_string(),
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    let encoding_key = jsonwebtoken::EncodingKey::from_secret(config.jwt_secret.as_ref());

    jsonwebtoken::encode(&jsonwebtoken::Header::default(), &claims, &encoding_key)
        .map_err(|e| AppError::Internal(format!("Error generando JWT: {}", e)))
}
