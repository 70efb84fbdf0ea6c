use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::customer::{Customer, CustomerRole};
use crate::utils::errors::{already_exists_error, AppError};

pub struct CustomerRepository {
    pool: PgPool,
}

/// Datos de un cliente nuevo listos para insertar (password ya hasheado)
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub date_of_birth: Option<NaiveDate>,
    pub driver_license: Option<String>,
    pub password_hash: String,
}

impl CustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserta el cliente. Dos registros concurrentes con el mismo email
    /// chocan contra la restricción UNIQUE y el perdedor se reporta como
    /// duplicado, no como error genérico de base de datos.
    pub async fn create(&self, customer: NewCustomer) -> Result<Customer, AppError> {
        let now = Utc::now();
        let created = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (
                id, name, email, phone, address, date_of_birth,
                driver_license, password_hash, role, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(&customer.address)
        .bind(customer.date_of_birth)
        .bind(&customer.driver_license)
        .bind(&customer.password_hash)
        .bind(CustomerRole::Customer)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e.as_database_error().and_then(|db| db.constraint()) {
            Some("customers_email_key") => {
                already_exists_error("Customer", "email", &customer.email)
            }
            Some("customers_driver_license_key") => already_exists_error(
                "Customer",
                "driver_license",
                customer.driver_license.as_deref().unwrap_or(""),
            ),
            _ => AppError::Database(e),
        })?;

        Ok(created)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Customer>, AppError> {
        let customer = sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(customer)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, AppError> {
        let customer = sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(customer)
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM customers WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }
}
