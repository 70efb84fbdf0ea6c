use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::post,
    Extension, Json, Router,
};

use crate::controllers::auth_controller::AuthController;
use crate::dto::auth_dto::{AuthResponse, LoginRequest, RegisterRequest};
use crate::dto::ApiResponse;
use crate::middleware::auth::{auth_middleware, AuthenticatedCustomer};
use crate::state::AppState;
use crate::utils::errors::AppResult;

/// Configura las rutas de autenticación
///
/// Registro y login son públicos; refresh exige un token todavía vigente.
pub fn create_auth_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/refresh", post(refresh_token))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .merge(protected)
}

async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<AuthResponse>>)> {
    let controller = AuthController::new(state.pool.clone(), state.config.clone());
    let response = controller.register(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<AuthResponse>>> {
    let controller = AuthController::new(state.pool.clone(), state.config.clone());
    let response = controller.login(request).await?;
    Ok(Json(response))
}

async fn refresh_token(
    State(state): State<AppState>,
    Extension(customer): Extension<AuthenticatedCustomer>,
) -> AppResult<Json<ApiResponse<AuthResponse>>> {
    let controller = AuthController::new(state.pool.clone(), state.config.clone());
    let response = controller.refresh(customer.customer_id).await?;
    Ok(Json(response))
}
