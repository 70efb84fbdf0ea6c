//! Creación del schema y datos de demostración
//!
//! Al arrancar, si la tabla `customers` no existe se asume base vacía:
//! se crean tipos, tablas e índices en una sola transacción y se cargan
//! sucursales, cuentas y una flota pequeña para poder probar la API.

use sqlx::{PgConnection, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::utils::errors::AppError;

/// Sentencias DDL en orden de dependencias
const SCHEMA_STATEMENTS: &[&str] = &[
    // Tipos enumerados
    "CREATE TYPE customer_role AS ENUM ('customer', 'admin')",
    "CREATE TYPE vehicle_status AS ENUM ('available', 'rented', 'maintenance', 'retired')",
    "CREATE TYPE fuel_type AS ENUM ('petrol', 'diesel', 'hybrid', 'electric')",
    "CREATE TYPE transmission_type AS ENUM ('manual', 'automatic')",
    "CREATE TYPE reservation_status AS ENUM ('pending', 'confirmed', 'active', 'completed', 'cancelled')",
    "CREATE TYPE payment_method AS ENUM ('card', 'debit', 'cash', 'bank_transfer')",
    "CREATE TYPE payment_status AS ENUM ('pending', 'completed', 'failed', 'refunded')",
    // Tablas
    r#"
    CREATE TABLE customers (
        id UUID PRIMARY KEY,
        name VARCHAR(100) NOT NULL,
        email VARCHAR(255) NOT NULL UNIQUE,
        phone VARCHAR(20) NOT NULL,
        address VARCHAR(255) NOT NULL,
        date_of_birth DATE,
        driver_license VARCHAR(30) UNIQUE,
        password_hash VARCHAR(255) NOT NULL,
        role customer_role NOT NULL DEFAULT 'customer',
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE branches (
        id UUID PRIMARY KEY,
        name VARCHAR(100) NOT NULL,
        location VARCHAR(100) NOT NULL,
        phone VARCHAR(20),
        email VARCHAR(255),
        address VARCHAR(255),
        manager_name VARCHAR(100),
        opening_hours VARCHAR(50) NOT NULL DEFAULT '9:00 AM - 6:00 PM',
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE vehicles (
        id UUID PRIMARY KEY,
        make VARCHAR(50) NOT NULL,
        model VARCHAR(50) NOT NULL,
        year INTEGER NOT NULL CHECK (year >= 1900 AND year <= 2030),
        color VARCHAR(30),
        license_plate VARCHAR(20) NOT NULL UNIQUE,
        vin VARCHAR(17) UNIQUE,
        fuel_type fuel_type NOT NULL,
        transmission transmission_type NOT NULL,
        seats INTEGER NOT NULL CHECK (seats BETWEEN 1 AND 12),
        daily_rate NUMERIC(10,2) NOT NULL CHECK (daily_rate > 0),
        status vehicle_status NOT NULL DEFAULT 'available',
        branch_id UUID NOT NULL REFERENCES branches(id),
        mileage INTEGER NOT NULL DEFAULT 0 CHECK (mileage >= 0),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE reservations (
        id UUID PRIMARY KEY,
        customer_id UUID NOT NULL REFERENCES customers(id),
        vehicle_id UUID NOT NULL REFERENCES vehicles(id),
        start_date DATE NOT NULL,
        end_date DATE NOT NULL,
        total_cost NUMERIC(10,2) NOT NULL CHECK (total_cost >= 0),
        status reservation_status NOT NULL DEFAULT 'pending',
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        CONSTRAINT valid_date_range CHECK (end_date > start_date)
    )
    "#,
    // El UNIQUE sobre reservation_id respalda el pago único por reserva
    // incluso ante inserciones concurrentes
    r#"
    CREATE TABLE payments (
        id UUID PRIMARY KEY,
        reservation_id UUID NOT NULL UNIQUE REFERENCES reservations(id),
        amount NUMERIC(10,2) NOT NULL CHECK (amount > 0),
        payment_date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        payment_method payment_method NOT NULL,
        status payment_status NOT NULL DEFAULT 'completed',
        txn_ref VARCHAR(100) NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    // Índices
    "CREATE INDEX idx_vehicles_branch ON vehicles(branch_id)",
    "CREATE INDEX idx_vehicles_status ON vehicles(status)",
    "CREATE INDEX idx_reservations_customer ON reservations(customer_id)",
    "CREATE INDEX idx_reservations_vehicle ON reservations(vehicle_id)",
    "CREATE INDEX idx_reservations_dates ON reservations(start_date, end_date)",
    "CREATE INDEX idx_reservations_status ON reservations(status)",
    "CREATE INDEX idx_payments_status ON payments(status)",
];

/// Crea el schema y los datos de demostración si la base está vacía
pub async fn initialize_database(pool: &PgPool) -> Result<(), AppError> {
    let schema_present: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM information_schema.tables
            WHERE table_schema = 'public' AND table_name = 'customers'
        )
        "#,
    )
    .fetch_one(pool)
    .await?;

    if schema_present {
        info!("✅ Schema de base de datos ya inicializado");
        return Ok(());
    }

    info!("🛠️ Base de datos vacía, creando schema...");

    let mut tx = pool.begin().await?;

    for statement in SCHEMA_STATEMENTS {
        sqlx::query(statement).execute(&mut *tx).await?;
    }

    seed_demo_data(&mut *tx).await?;

    tx.commit().await?;

    info!("✅ Schema creado y datos de demostración cargados");

    Ok(())
}

/// Inserta sucursales, cuentas de prueba y una flota pequeña
async fn seed_demo_data(conn: &mut PgConnection) -> Result<(), AppError> {
    let centro = Uuid::new_v4();
    let aeropuerto = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO branches (id, name, location, phone, email, address, manager_name)
        VALUES
            ($1, 'Sucursal Centro', 'Madrid', '+34 910 000 001',
             'centro@carrental.example', 'Gran Vía 1, Madrid', 'Lucía Romero'),
            ($2, 'Sucursal Aeropuerto', 'Madrid', '+34 910 000 002',
             'aeropuerto@carrental.example', 'Terminal 4, Aeropuerto de Barajas', 'Carlos Vidal')
        "#,
    )
    .bind(centro)
    .bind(aeropuerto)
    .execute(&mut *conn)
    .await?;

    let admin_hash = bcrypt::hash("Admin123!", bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::Hash(e.to_string()))?;
    let customer_hash = bcrypt::hash("Cliente123!", bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::Hash(e.to_string()))?;

    sqlx::query(
        r#"
        INSERT INTO customers (id, name, email, phone, address, driver_license, password_hash, role)
        VALUES
            ($1, 'Administrador', 'admin@carrental.example', '+34 600 000 001',
             'Oficina Central, Madrid', NULL, $2, 'admin'),
            ($3, 'Cliente Demo', 'cliente@carrental.example', '+34 600 000 002',
             'Calle Alcalá 50, Madrid', 'B-12345678', $4, 'customer')
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&admin_hash)
    .bind(Uuid::new_v4())
    .bind(&customer_hash)
    .execute(&mut *conn)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO vehicles (id, make, model, year, color, license_plate, fuel_type,
                              transmission, seats, daily_rate, branch_id, mileage)
        VALUES
            ($1, 'Toyota', 'Corolla', 2022, 'Blanco', '1234-ABC', 'hybrid',
             'automatic', 5, 45.00, $5, 25000),
            ($2, 'Volkswagen', 'Golf', 2021, 'Gris', '5678-DEF', 'petrol',
             'manual', 5, 38.50, $5, 40000),
            ($3, 'Renault', 'Kangoo', 2020, 'Azul', '9012-GHI', 'diesel',
             'manual', 7, 52.00, $6, 61000),
            ($4, 'Tesla', 'Model 3', 2023, 'Negro', '3456-JKL', 'electric',
             'automatic', 5, 89.90, $6, 12000)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(Uuid::new_v4())
    .bind(Uuid::new_v4())
    .bind(Uuid::new_v4())
    .bind(centro)
    .bind(aeropuerto)
    .execute(&mut *conn)
    .await?;

    info!("🚗 Flota de demostración insertada (4 vehículos, 2 sucursales)");

    Ok(())
}
