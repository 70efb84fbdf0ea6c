use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::payment_controller::PaymentController;
use crate::dto::payment_dto::{
    CreatePaymentRequest, PaymentResponse, UpdatePaymentStatusRequest,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::{admin_only_middleware, auth_middleware, AuthenticatedCustomer};
use crate::state::AppState;
use crate::utils::errors::AppResult;

/// Configura las rutas de pagos
pub fn create_payment_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_payment))
        .route(
            "/:id",
            put(update_payment_status).route_layer(middleware::from_fn(admin_only_middleware)),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn create_payment(
    State(state): State<AppState>,
    Extension(customer): Extension<AuthenticatedCustomer>,
    Json(request): Json<CreatePaymentRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<PaymentResponse>>)> {
    let controller = PaymentController::new(state.pool.clone());
    let response = controller.create(&customer, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_payment_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePaymentStatusRequest>,
) -> AppResult<Json<ApiResponse<PaymentResponse>>> {
    let controller = PaymentController::new(state.pool.clone());
    let response = controller.update_status(id, request).await?;
    Ok(Json(response))
}
