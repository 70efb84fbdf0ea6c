//! Autenticación de clientes
//!
//! Registro, login y renovación de tokens JWT. Los passwords se guardan
//! hasheados con bcrypt; nunca salen de este módulo en claro.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::config::EnvironmentConfig;
use crate::dto::auth_dto::{AuthResponse, CustomerResponse, LoginRequest, RegisterRequest};
use crate::dto::ApiResponse;
use crate::middleware::auth::generate_jwt_token;
use crate::repositories::customer_repository::{CustomerRepository, NewCustomer};
use crate::utils::errors::{already_exists_error, AppError};

pub struct AuthController {
    repository: CustomerRepository,
    config: EnvironmentConfig,
}

impl AuthController {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        Self {
            repository: CustomerRepository::new(pool),
            config,
        }
    }

    pub async fn register(
        &self,
        request: RegisterRequest,
    ) -> Result<ApiResponse<AuthResponse>, AppError> {
        request.validate()?;

        if self.repository.email_exists(&request.email).await? {
            return Err(already_exists_error("Customer", "email", &request.email));
        }

        let password_hash = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::Hash(e.to_string()))?;

        let customer = self
            .repository
            .create(NewCustomer {
                name: request.name,
                email: request.email,
                phone: request.phone,
                address: request.address,
                date_of_birth: request.date_of_birth,
                driver_license: request.driver_license,
                password_hash,
            })
            .await?;

        let token = generate_jwt_token(&customer, &self.config)?;

        info!("👤 Cliente registrado: {}", customer.email);

        Ok(ApiResponse::success_with_message(
            AuthResponse {
                token,
                customer: CustomerResponse::from(customer),
            },
            "Registro exitoso".to_string(),
        ))
    }

    pub async fn login(&self, request: LoginRequest) -> Result<ApiResponse<AuthResponse>, AppError> {
        request.validate()?;

        // Mismo mensaje para email desconocido y password incorrecto
        let customer = self
            .repository
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Credenciales inválidas".to_string()))?;

        let password_ok = bcrypt::verify(&request.password, &customer.password_hash)
            .map_err(|e| AppError::Hash(e.to_string()))?;
        if !password_ok {
            return Err(AppError::Unauthorized("Credenciales inválidas".to_string()));
        }

        let token = generate_jwt_token(&customer, &self.config)?;

        info!("🔑 Login exitoso: {}", customer.email);

        Ok(ApiResponse::success(AuthResponse {
            token,
            customer: CustomerResponse::from(customer),
        }))
    }

    /// Reemite un token para un cliente ya autenticado por el middleware
    pub async fn refresh(&self, customer_id: Uuid) -> Result<ApiResponse<AuthResponse>, AppError> {
        let customer = self
            .repository
            .find_by_id(customer_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Cliente no encontrado".to_string()))?;

        let token = generate_jwt_token(&customer, &self.config)?;

        Ok(ApiResponse::success(AuthResponse {
            token,
            customer: CustomerResponse::from(customer),
        }))
    }
}
