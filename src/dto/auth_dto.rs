use chrono::{DateTime, NaiveDate, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::customer::{Customer, CustomerRole};

lazy_static! {
    static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9\s\-().]{7,20}$").unwrap();
}

// Request de registro de cliente
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 6, max = 100))]
    pub password: String,

    #[validate(regex(path = "PHONE_REGEX", message = "invalid phone number format"))]
    pub phone: String,

    #[validate(length(min = 5, max = 255))]
    pub address: String,

    pub date_of_birth: Option<NaiveDate>,

    #[validate(length(min = 5, max = 30))]
    pub driver_license: Option<String>,
}

// Request de login
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

// Perfil del cliente (sin password_hash)
#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub date_of_birth: Option<NaiveDate>,
    pub driver_license: Option<String>,
    pub role: CustomerRole,
    pub created_at: DateTime<Utc>,
}

// Response de autenticación: token JWT + perfil
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub customer: CustomerResponse,
}

impl From<Customer> for CustomerResponse {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id,
            name: customer.name,
            email: customer.email,
            phone: customer.phone,
            address: customer.address,
            date_of_birth: customer.date_of_birth,
            driver_license: customer.driver_license,
            role: customer.role,
            created_at: customer.created_at,
        }
    }
}
