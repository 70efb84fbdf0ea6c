use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use std::net::SocketAddr;
use tokio::signal;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use car_rental::config::EnvironmentConfig;
use car_rental::database::{schema, DatabaseConnection};
use car_rental::middleware::cors::cors_layer;
use car_rental::routes;
use car_rental::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::default();

    // Configurar logging (DEBUG en desarrollo, INFO en el resto)
    let log_level = if config.is_development() {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(log_level).init();

    info!("🚗 Car Rental - API de Reservas");
    info!("===============================");

    // Inicializar base de datos
    let db_connection = match DatabaseConnection::new_default().await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    let pool = db_connection.pool().clone();

    // Crear schema y datos de demostración si la base está vacía
    if let Err(e) = schema::initialize_database(&pool).await {
        error!("❌ Error inicializando el schema: {}", e);
        return Err(anyhow::anyhow!("Error de base de datos: {}", e));
    }

    // Crear router de la API
    let app_state = AppState::new(pool, config.clone());

    let app = Router::new()
        .route("/health", get(health_endpoint))
        .nest(
            "/api/auth",
            routes::auth_routes::create_auth_router(app_state.clone()),
        )
        .nest(
            "/api/reservations",
            routes::reservation_routes::create_reservation_router(app_state.clone()),
        )
        .nest(
            "/api/payments",
            routes::payment_routes::create_payment_router(app_state.clone()),
        )
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config))
        .with_state(app_state);

    // Puerto del servidor
    let addr: SocketAddr = config.server_url().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🔐 Endpoints - Auth:");
    info!("   POST /api/auth/register - Registrar cliente");
    info!("   POST /api/auth/login - Login de cliente");
    info!("   POST /api/auth/refresh - Renovar token");
    info!("📅 Endpoints - Reservas:");
    info!("   POST /api/reservations - Crear reserva");
    info!("   GET  /api/reservations/my - Mis reservas");
    info!("   GET  /api/reservations/:id - Obtener reserva");
    info!("   DELETE /api/reservations/:id - Cancelar reserva");
    info!("   PUT  /api/reservations/:id - Cambiar estado (admin)");
    info!("💳 Endpoints - Pagos:");
    info!("   POST /api/payments - Registrar pago");
    info!("   PUT  /api/payments/:id - Cambiar estado (admin)");

    // Iniciar servidor en background
    let server_handle = tokio::spawn(async move {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                error!("❌ Error del servidor: {}", e);
                e
            })
    });

    // Esperar a que el servidor termine
    if let Err(e) = server_handle.await? {
        error!("❌ Servidor terminó con error: {}", e);
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Health check simple
async fn health_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "car-rental-api",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
