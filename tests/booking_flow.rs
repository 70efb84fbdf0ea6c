//! Flujo completo de reservas y pagos contra una base real
//!
//! Estos tests necesitan PostgreSQL accesible vía `DATABASE_URL` y se
//! ejecutan con `cargo test -- --ignored`. Cada test crea sus propios
//! datos con identificadores únicos, así pueden correr sobre la misma
//! base sin limpiarla entre ejecuciones.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::sync::Barrier;
use uuid::Uuid;

use car_rental::controllers::payment_controller::PaymentController;
use car_rental::controllers::reservation_controller::ReservationController;
use car_rental::database::schema;
use car_rental::dto::payment_dto::CreatePaymentRequest;
use car_rental::dto::reservation_dto::{CreateReservationRequest, UpdateReservationStatusRequest};
use car_rental::middleware::auth::AuthenticatedCustomer;
use car_rental::models::customer::{Customer, CustomerRole};
use car_rental::models::payment::{PaymentMethod, PaymentStatus};
use car_rental::models::reservation::ReservationStatus;
use car_rental::models::vehicle::{FuelType, Transmission, VehicleStatus};
use car_rental::repositories::customer_repository::{CustomerRepository, NewCustomer};
use car_rental::utils::errors::AppError;

async fn test_pool() -> PgPool {
    let url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL debe estar definida para los tests de integración");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("no se pudo conectar a la base de test");

    schema::initialize_database(&pool)
        .await
        .expect("no se pudo inicializar el schema");

    pool
}

async fn insert_branch(pool: &PgPool) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO branches (id, name, location) VALUES ($1, 'Sucursal Test', 'Madrid')")
        .bind(id)
        .execute(pool)
        .await
        .expect("no se pudo insertar la sucursal");
    id
}

async fn insert_vehicle(pool: &PgPool, daily_rate: Decimal, status: VehicleStatus) -> Uuid {
    let branch_id = insert_branch(pool).await;
    let id = Uuid::new_v4();
    let plate = format!("T-{}", &id.simple().to_string()[..8]);

    sqlx::query(
        r#"
        INSERT INTO vehicles (id, make, model, year, license_plate, fuel_type,
                              transmission, seats, daily_rate, status, branch_id)
        VALUES ($1, 'Seat', 'Ibiza', 2022, $2, $3, $4, 5, $5, $6, $7)
        "#,
    )
    .bind(id)
    .bind(&plate)
    .bind(FuelType::Petrol)
    .bind(Transmission::Manual)
    .bind(daily_rate)
    .bind(status)
    .bind(branch_id)
    .execute(pool)
    .await
    .expect("no se pudo insertar el vehículo");

    id
}

async fn insert_customer(pool: &PgPool) -> Customer {
    let repository = CustomerRepository::new(pool.clone());
    let email = format!("cliente-{}@test.example", Uuid::new_v4().simple());
    // Coste bajo: el hash real no importa en estos tests
    let password_hash = bcrypt::hash("Secret123!", 4).expect("no se pudo hashear");

    repository
        .create(NewCustomer {
            name: "Cliente Test".to_string(),
            email,
            phone: "+34 600 111 222".to_string(),
            address: "Calle de Pruebas 1, Madrid".to_string(),
            date_of_birth: None,
            driver_license: None,
            password_hash,
        })
        .await
        .expect("no se pudo crear el cliente")
}

fn caller_for(customer: &Customer) -> AuthenticatedCustomer {
    AuthenticatedCustomer {
        customer_id: customer.id,
        email: customer.email.clone(),
        name: customer.name.clone(),
        role: customer.role,
    }
}

fn future_range(days_ahead: i64, length: i64) -> (NaiveDate, NaiveDate) {
    let start = Utc::now().date_naive() + Duration::days(days_ahead);
    (start, start + Duration::days(length))
}

fn booking_request(
    vehicle_id: Uuid,
    start_date: NaiveDate,
    end_date: NaiveDate,
    total_cost: Decimal,
) -> CreateReservationRequest {
    CreateReservationRequest {
        vehicle_id,
        start_date,
        end_date,
        total_cost,
    }
}

async fn reservation_count(pool: &PgPool, vehicle_id: Uuid) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM reservations WHERE vehicle_id = $1")
        .bind(vehicle_id)
        .fetch_one(pool)
        .await
        .expect("no se pudo contar las reservas")
}

async fn payment_count(pool: &PgPool, reservation_id: Uuid) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM payments WHERE reservation_id = $1")
        .bind(reservation_id)
        .fetch_one(pool)
        .await
        .expect("no se pudo contar los pagos")
}

#[tokio::test]
#[ignore = "necesita PostgreSQL vía DATABASE_URL"]
async fn test_booking_succeeds_and_persists() {
    let pool = test_pool().await;
    let customer = insert_customer(&pool).await;
    let vehicle_id = insert_vehicle(&pool, Decimal::new(4500, 2), VehicleStatus::Available).await;
    let (start, end) = future_range(10, 5);

    let controller = ReservationController::new(pool.clone());
    let response = controller
        .create(
            customer.id,
            booking_request(vehicle_id, start, end, Decimal::new(22500, 2)),
        )
        .await
        .expect("la reserva debería crearse");

    let reservation = response.data.expect("respuesta sin datos");
    assert_eq!(reservation.status, ReservationStatus::Confirmed);
    assert_eq!(reservation.total_cost, Decimal::new(22500, 2));
    assert_eq!(reservation.customer_id, customer.id);
    assert_eq!(reservation_count(&pool, vehicle_id).await, 1);
}

#[tokio::test]
#[ignore = "necesita PostgreSQL vía DATABASE_URL"]
async fn test_booking_accepts_cost_within_tolerance() {
    let pool = test_pool().await;
    let customer = insert_customer(&pool).await;
    let vehicle_id = insert_vehicle(&pool, Decimal::new(4500, 2), VehicleStatus::Available).await;
    let (start, end) = future_range(10, 5);

    // 225.01 contra 225.00 esperado: dentro de la tolerancia de céntimos
    let controller = ReservationController::new(pool.clone());
    let response = controller
        .create(
            customer.id,
            booking_request(vehicle_id, start, end, Decimal::new(22501, 2)),
        )
        .await
        .expect("una diferencia de un céntimo debería aceptarse");

    assert!(response.success);
    assert_eq!(reservation_count(&pool, vehicle_id).await, 1);
}

#[tokio::test]
#[ignore = "necesita PostgreSQL vía DATABASE_URL"]
async fn test_booking_rejected_on_cost_mismatch() {
    let pool = test_pool().await;
    let customer = insert_customer(&pool).await;
    let vehicle_id = insert_vehicle(&pool, Decimal::new(4500, 2), VehicleStatus::Available).await;
    let (start, end) = future_range(10, 5);

    let controller = ReservationController::new(pool.clone());
    let error = controller
        .create(
            customer.id,
            booking_request(vehicle_id, start, end, Decimal::new(20000, 2)),
        )
        .await
        .unwrap_err();

    assert!(matches!(error, AppError::CostMismatch(_)));
    assert_eq!(reservation_count(&pool, vehicle_id).await, 0);
}

#[tokio::test]
#[ignore = "necesita PostgreSQL vía DATABASE_URL"]
async fn test_booking_rejected_on_date_conflict() {
    let pool = test_pool().await;
    let customer = insert_customer(&pool).await;
    let vehicle_id = insert_vehicle(&pool, Decimal::new(4500, 2), VehicleStatus::Available).await;
    let (start, end) = future_range(10, 5);

    let controller = ReservationController::new(pool.clone());
    controller
        .create(
            customer.id,
            booking_request(vehicle_id, start, end, Decimal::new(22500, 2)),
        )
        .await
        .expect("la primera reserva debería crearse");

    // Solapa dos días con la reserva existente
    let error = controller
        .create(
            customer.id,
            booking_request(
                vehicle_id,
                start + Duration::days(3),
                end + Duration::days(3),
                Decimal::new(22500, 2),
            ),
        )
        .await
        .unwrap_err();

    assert!(matches!(error, AppError::Conflict(_)));
    assert_eq!(reservation_count(&pool, vehicle_id).await, 1);
}

#[tokio::test]
#[ignore = "necesita PostgreSQL vía DATABASE_URL"]
async fn test_back_to_back_bookings_do_not_conflict() {
    let pool = test_pool().await;
    let customer = insert_customer(&pool).await;
    let vehicle_id = insert_vehicle(&pool, Decimal::new(4500, 2), VehicleStatus::Available).await;
    let (start, end) = future_range(10, 5);

    let controller = ReservationController::new(pool.clone());
    controller
        .create(
            customer.id,
            booking_request(vehicle_id, start, end, Decimal::new(22500, 2)),
        )
        .await
        .expect("la primera reserva debería crearse");

    // La devolución y la recogida pueden compartir día
    controller
        .create(
            customer.id,
            booking_request(
                vehicle_id,
                end,
                end + Duration::days(3),
                Decimal::new(13500, 2),
            ),
        )
        .await
        .expect("una reserva que empieza el día de la devolución debería aceptarse");

    assert_eq!(reservation_count(&pool, vehicle_id).await, 2);
}

#[tokio::test]
#[ignore = "necesita PostgreSQL vía DATABASE_URL"]
async fn test_cancelled_reservation_frees_the_dates() {
    let pool = test_pool().await;
    let customer = insert_customer(&pool).await;
    let vehicle_id = insert_vehicle(&pool, Decimal::new(4500, 2), VehicleStatus::Available).await;
    let (start, end) = future_range(10, 5);

    let controller = ReservationController::new(pool.clone());
    let first = controller
        .create(
            customer.id,
            booking_request(vehicle_id, start, end, Decimal::new(22500, 2)),
        )
        .await
        .expect("la primera reserva debería crearse")
        .data
        .expect("respuesta sin datos");

    let cancelled = controller
        .cancel(first.id, &caller_for(&customer))
        .await
        .expect("una reserva confirmada debería poder cancelarse")
        .data
        .expect("respuesta sin datos");
    assert_eq!(cancelled.status, ReservationStatus::Cancelled);

    // Las mismas fechas vuelven a estar libres
    controller
        .create(
            customer.id,
            booking_request(vehicle_id, start, end, Decimal::new(22500, 2)),
        )
        .await
        .expect("las fechas de una reserva cancelada deberían quedar libres");
}

#[tokio::test]
#[ignore = "necesita PostgreSQL vía DATABASE_URL"]
async fn test_booking_rejected_when_vehicle_not_available() {
    let pool = test_pool().await;
    let customer = insert_customer(&pool).await;
    let vehicle_id = insert_vehicle(&pool, Decimal::new(4500, 2), VehicleStatus::Maintenance).await;
    let (start, end) = future_range(10, 5);

    let controller = ReservationController::new(pool.clone());
    let error = controller
        .create(
            customer.id,
            booking_request(vehicle_id, start, end, Decimal::new(22500, 2)),
        )
        .await
        .unwrap_err();

    assert!(matches!(error, AppError::Unavailable(_)));
    assert_eq!(reservation_count(&pool, vehicle_id).await, 0);
}

#[tokio::test]
#[ignore = "necesita PostgreSQL vía DATABASE_URL"]
async fn test_booking_rejected_for_unknown_vehicle() {
    let pool = test_pool().await;
    let customer = insert_customer(&pool).await;
    let (start, end) = future_range(10, 5);

    let controller = ReservationController::new(pool.clone());
    let error = controller
        .create(
            customer.id,
            booking_request(Uuid::new_v4(), start, end, Decimal::new(22500, 2)),
        )
        .await
        .unwrap_err();

    assert!(matches!(error, AppError::NotFound(_)));
}

#[tokio::test]
#[ignore = "necesita PostgreSQL vía DATABASE_URL"]
async fn test_booking_rejected_when_start_date_in_past() {
    let pool = test_pool().await;
    let customer = insert_customer(&pool).await;
    let yesterday = Utc::now().date_naive() - Duration::days(1);

    // La validación de fechas corre antes de consultar el vehículo
    let controller = ReservationController::new(pool.clone());
    let error = controller
        .create(
            customer.id,
            booking_request(
                Uuid::new_v4(),
                yesterday,
                yesterday + Duration::days(3),
                Decimal::new(13500, 2),
            ),
        )
        .await
        .unwrap_err();

    assert!(matches!(error, AppError::InvalidInput(_)));
}

#[tokio::test]
#[ignore = "necesita PostgreSQL vía DATABASE_URL"]
async fn test_booking_rejected_when_end_not_after_start() {
    let pool = test_pool().await;
    let customer = insert_customer(&pool).await;
    let (start, _) = future_range(10, 5);

    let controller = ReservationController::new(pool.clone());
    let error = controller
        .create(
            customer.id,
            booking_request(Uuid::new_v4(), start, start, Decimal::new(0, 2)),
        )
        .await
        .unwrap_err();

    assert!(matches!(error, AppError::InvalidInput(_)));
}

#[tokio::test]
#[ignore = "necesita PostgreSQL vía DATABASE_URL"]
async fn test_concurrent_bookings_single_winner() {
    let pool = test_pool().await;
    let customer = insert_customer(&pool).await;
    let vehicle_id = insert_vehicle(&pool, Decimal::new(4500, 2), VehicleStatus::Available).await;
    let (start, end) = future_range(10, 5);

    let barrier = Arc::new(Barrier::new(2));
    let mut handles = Vec::new();

    for _ in 0..2 {
        let pool = pool.clone();
        let barrier = barrier.clone();
        let customer_id = customer.id;

        handles.push(tokio::spawn(async move {
            let controller = ReservationController::new(pool);
            barrier.wait().await;
            controller
                .create(
                    customer_id,
                    booking_request(vehicle_id, start, end, Decimal::new(22500, 2)),
                )
                .await
        }));
    }

    let mut successes = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.expect("la tarea no debería panicar") {
            Ok(_) => successes += 1,
            Err(error) => {
                assert!(matches!(error, AppError::Conflict(_)));
                conflicts += 1;
            }
        }
    }

    // El bloqueo de fila sobre el vehículo serializa las dos transacciones;
    // la perdedora ve la reserva ya confirmada como conflicto de fechas
    assert_eq!(successes, 1);
    assert_eq!(conflicts, 1);
    assert_eq!(reservation_count(&pool, vehicle_id).await, 1);
}

#[tokio::test]
#[ignore = "necesita PostgreSQL vía DATABASE_URL"]
async fn test_payment_flow_and_duplicate_rejected() {
    let pool = test_pool().await;
    let customer = insert_customer(&pool).await;
    let vehicle_id = insert_vehicle(&pool, Decimal::new(4500, 2), VehicleStatus::Available).await;
    let (start, end) = future_range(10, 5);
    let caller = caller_for(&customer);

    let reservation = ReservationController::new(pool.clone())
        .create(
            customer.id,
            booking_request(vehicle_id, start, end, Decimal::new(22500, 2)),
        )
        .await
        .expect("la reserva debería crearse")
        .data
        .expect("respuesta sin datos");

    let controller = PaymentController::new(pool.clone());
    let payment = controller
        .create(
            &caller,
            CreatePaymentRequest {
                reservation_id: reservation.id,
                amount: Decimal::new(22500, 2),
                payment_method: PaymentMethod::Card,
                payment_date: Utc::now(),
                txn_ref: None,
                status: None,
            },
        )
        .await
        .expect("el pago debería registrarse")
        .data
        .expect("respuesta sin datos");

    assert!(payment.txn_ref.starts_with("TXN-"));
    assert_eq!(payment.status, PaymentStatus::Completed);
    assert_eq!(payment.amount, Decimal::new(22500, 2));

    // Un segundo pago sobre la misma reserva se rechaza
    let error = controller
        .create(
            &caller,
            CreatePaymentRequest {
                reservation_id: reservation.id,
                amount: Decimal::new(22500, 2),
                payment_method: PaymentMethod::Cash,
                payment_date: Utc::now(),
                txn_ref: None,
                status: None,
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(error, AppError::AlreadyExists(_)));
    assert_eq!(payment_count(&pool, reservation.id).await, 1);

    // El pago original queda intacto
    let stored_ref: String =
        sqlx::query_scalar("SELECT txn_ref FROM payments WHERE reservation_id = $1")
            .bind(reservation.id)
            .fetch_one(&pool)
            .await
            .expect("no se pudo leer el pago");
    assert_eq!(stored_ref, payment.txn_ref);
}

#[tokio::test]
#[ignore = "necesita PostgreSQL vía DATABASE_URL"]
async fn test_payment_rejected_on_amount_mismatch() {
    let pool = test_pool().await;
    let customer = insert_customer(&pool).await;
    let vehicle_id = insert_vehicle(&pool, Decimal::new(4500, 2), VehicleStatus::Available).await;
    let (start, end) = future_range(10, 5);
    let caller = caller_for(&customer);

    let reservation = ReservationController::new(pool.clone())
        .create(
            customer.id,
            booking_request(vehicle_id, start, end, Decimal::new(22500, 2)),
        )
        .await
        .expect("la reserva debería crearse")
        .data
        .expect("respuesta sin datos");

    let error = PaymentController::new(pool.clone())
        .create(
            &caller,
            CreatePaymentRequest {
                reservation_id: reservation.id,
                amount: Decimal::new(20000, 2),
                payment_method: PaymentMethod::Card,
                payment_date: Utc::now(),
                txn_ref: None,
                status: None,
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(error, AppError::AmountMismatch(_)));
    assert_eq!(payment_count(&pool, reservation.id).await, 0);
}

#[tokio::test]
#[ignore = "necesita PostgreSQL vía DATABASE_URL"]
async fn test_payment_scoped_to_reservation_owner() {
    let pool = test_pool().await;
    let customer = insert_customer(&pool).await;
    let vehicle_id = insert_vehicle(&pool, Decimal::new(4500, 2), VehicleStatus::Available).await;
    let (start, end) = future_range(10, 5);

    let reservation = ReservationController::new(pool.clone())
        .create(
            customer.id,
            booking_request(vehicle_id, start, end, Decimal::new(22500, 2)),
        )
        .await
        .expect("la reserva debería crearse")
        .data
        .expect("respuesta sin datos");

    // Otro cliente no puede ver ni pagar la reserva
    let stranger = AuthenticatedCustomer {
        customer_id: Uuid::new_v4(),
        email: "otro@test.example".to_string(),
        name: "Otro Cliente".to_string(),
        role: CustomerRole::Customer,
    };

    let error = PaymentController::new(pool.clone())
        .create(
            &stranger,
            CreatePaymentRequest {
                reservation_id: reservation.id,
                amount: Decimal::new(22500, 2),
                payment_method: PaymentMethod::Card,
                payment_date: Utc::now(),
                txn_ref: None,
                status: None,
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(error, AppError::NotFound(_)));
}

#[tokio::test]
#[ignore = "necesita PostgreSQL vía DATABASE_URL"]
async fn test_cancel_refused_once_active() {
    let pool = test_pool().await;
    let customer = insert_customer(&pool).await;
    let vehicle_id = insert_vehicle(&pool, Decimal::new(4500, 2), VehicleStatus::Available).await;
    let (start, end) = future_range(10, 5);

    let controller = ReservationController::new(pool.clone());
    let reservation = controller
        .create(
            customer.id,
            booking_request(vehicle_id, start, end, Decimal::new(22500, 2)),
        )
        .await
        .expect("la reserva debería crearse")
        .data
        .expect("respuesta sin datos");

    // Transición administrativa a 'active': el coche ya fue entregado
    controller
        .update_status(
            reservation.id,
            UpdateReservationStatusRequest {
                status: ReservationStatus::Active,
            },
        )
        .await
        .expect("el cambio de estado debería aplicarse");

    let error = controller
        .cancel(reservation.id, &caller_for(&customer))
        .await
        .unwrap_err();

    assert!(matches!(error, AppError::InvalidInput(_)));
}

#[tokio::test]
#[ignore = "necesita PostgreSQL vía DATABASE_URL"]
async fn test_duplicate_customer_email_rejected() {
    let pool = test_pool().await;
    let repository = CustomerRepository::new(pool.clone());
    let email = format!("cliente-{}@test.example", Uuid::new_v4().simple());
    let password_hash = bcrypt::hash("Secret123!", 4).expect("no se pudo hashear");

    let new_customer = |hash: String| NewCustomer {
        name: "Cliente Test".to_string(),
        email: email.clone(),
        phone: "+34 600 111 222".to_string(),
        address: "Calle de Pruebas 1, Madrid".to_string(),
        date_of_birth: None,
        driver_license: None,
        password_hash: hash,
    };

    repository
        .create(new_customer(password_hash.clone()))
        .await
        .expect("el primer registro debería funcionar");

    // El segundo insert choca contra la restricción UNIQUE del email,
    // la ruta que queda abierta cuando dos registros compiten
    let error = repository
        .create(new_customer(password_hash))
        .await
        .unwrap_err();

    assert!(matches!(error, AppError::AlreadyExists(_)));
}

#[tokio::test]
#[ignore = "necesita PostgreSQL vía DATABASE_URL"]
async fn test_vehicle_year_bounds_enforced() {
    let pool = test_pool().await;
    let branch_id = insert_branch(&pool).await;

    for year in [1890_i32, 2035] {
        let id = Uuid::new_v4();
        let plate = format!("T-{}", &id.simple().to_string()[..8]);

        let result = sqlx::query(
            r#"
            INSERT INTO vehicles (id, make, model, year, license_plate, fuel_type,
                                  transmission, seats, daily_rate, branch_id)
            VALUES ($1, 'Seat', 'Ibiza', $2, $3, $4, $5, 5, 45.00, $6)
            "#,
        )
        .bind(id)
        .bind(year)
        .bind(&plate)
        .bind(FuelType::Petrol)
        .bind(Transmission::Manual)
        .bind(branch_id)
        .execute(&pool)
        .await;

        assert!(result.is_err(), "el año {} debería violar el CHECK", year);
    }
}
