use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::reservation_controller::ReservationController;
use crate::dto::reservation_dto::{
    CreateReservationRequest, ReservationResponse, UpdateReservationStatusRequest,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::{admin_only_middleware, auth_middleware, AuthenticatedCustomer};
use crate::state::AppState;
use crate::utils::errors::AppResult;

/// Configura las rutas de reservas
///
/// Todas exigen token. El cambio de estado además exige rol admin.
pub fn create_reservation_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_reservation))
        .route("/my", get(list_my_reservations))
        .route("/:id", get(get_reservation))
        .route("/:id", delete(cancel_reservation))
        .route(
            "/:id",
            put(update_reservation_status)
                .route_layer(middleware::from_fn(admin_only_middleware)),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn create_reservation(
    State(state): State<AppState>,
    Extension(customer): Extension<AuthenticatedCustomer>,
    Json(request): Json<CreateReservationRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<ReservationResponse>>)> {
    let controller = ReservationController::new(state.pool.clone());
    let response = controller.create(customer.customer_id, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_my_reservations(
    State(state): State<AppState>,
    Extension(customer): Extension<AuthenticatedCustomer>,
) -> AppResult<Json<Vec<ReservationResponse>>> {
    let controller = ReservationController::new(state.pool.clone());
    let response = controller.list_for_customer(customer.customer_id).await?;
    Ok(Json(response))
}

async fn get_reservation(
    State(state): State<AppState>,
    Extension(customer): Extension<AuthenticatedCustomer>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ReservationResponse>> {
    let controller = ReservationController::new(state.pool.clone());
    let response = controller.get_scoped(id, &customer).await?;
    Ok(Json(response))
}

async fn cancel_reservation(
    State(state): State<AppState>,
    Extension(customer): Extension<AuthenticatedCustomer>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ReservationResponse>>> {
    let controller = ReservationController::new(state.pool.clone());
    let response = controller.cancel(id, &customer).await?;
    Ok(Json(response))
}

async fn update_reservation_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateReservationStatusRequest>,
) -> AppResult<Json<ApiResponse<ReservationResponse>>> {
    let controller = ReservationController::new(state.pool.clone());
    let response = controller.update_status(id, request).await?;
    Ok(Json(response))
}
