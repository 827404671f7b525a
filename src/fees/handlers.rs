// HTTP handlers for the fee ledger endpoints

use crate::auth::models::Principal;
use crate::fees::error::FeeError;
use crate::fees::models::{
    CreateFeeRequest, Fee, FeeListQuery, FeeStats, RecordPaymentRequest, UpdateFeeRequest,
};
use crate::response::ApiResponse;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

/// Handler for GET /api/fees
pub async fn get_fees(
    State(state): State<AppState>,
    _principal: Principal,
    Query(params): Query<FeeListQuery>,
) -> Result<Json<ApiResponse<Vec<Fee>>>, FeeError> {
    let fees = state.fees.list_fees(params.status, params.limit).await?;
    Ok(Json(ApiResponse::list(fees)))
}

/// Handler for GET /api/fees/:id
pub async fn get_fee(
    State(state): State<AppState>,
    _principal: Principal,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Fee>>, FeeError> {
    let fee = state.fees.get_fee(id).await?;
    Ok(Json(ApiResponse::data(fee)))
}

/// Handler for GET /api/fees/student/:id
pub async fn get_student_fees(
    State(state): State<AppState>,
    _principal: Principal,
    Path(student_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<Fee>>>, FeeError> {
    let fees = state.fees.fees_for_student(student_id).await?;
    Ok(Json(ApiResponse::list(fees)))
}

/// Handler for GET /api/fees/history/:id
pub async fn get_payment_history(
    State(state): State<AppState>,
    _principal: Principal,
    Path(student_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<Fee>>>, FeeError> {
    let fees = state.fees.paid_history(student_id).await?;
    Ok(Json(ApiResponse::list(fees)))
}

/// Handler for GET /api/fees/pending (admin only)
pub async fn get_pending_fees(
    State(state): State<AppState>,
    _principal: Principal,
) -> Result<Json<ApiResponse<Vec<Fee>>>, FeeError> {
    let fees = state.fees.pending_fees().await?;
    Ok(Json(ApiResponse::list(fees)))
}

/// Handler for GET /api/fees/overdue (admin only)
pub async fn get_overdue_fees(
    State(state): State<AppState>,
    _principal: Principal,
) -> Result<Json<ApiResponse<Vec<Fee>>>, FeeError> {
    let fees = state.fees.overdue_fees().await?;
    Ok(Json(ApiResponse::list(fees)))
}

/// Handler for GET /api/fees/stats (admin only)
pub async fn get_fee_stats(
    State(state): State<AppState>,
    _principal: Principal,
) -> Result<Json<ApiResponse<FeeStats>>, FeeError> {
    let stats = state.fees.stats().await?;
    Ok(Json(ApiResponse::data(stats)))
}

/// Handler for POST /api/fees (admin only)
pub async fn create_fee(
    State(state): State<AppState>,
    principal: Principal,
    Json(payload): Json<CreateFeeRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Fee>>), FeeError> {
    let fee = state.fees.create_fee(payload).await?;

    tracing::info!(
        "Fee created for student {} by {}",
        fee.student_id,
        principal.username()
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Fee created successfully", fee)),
    ))
}

/// Handler for POST /api/fees/:id/payment (admin only)
pub async fn record_payment(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecordPaymentRequest>,
) -> Result<Json<ApiResponse<Fee>>, FeeError> {
    let fee = state.fees.record_payment(id, payload).await?;

    tracing::info!(
        "Payment recorded on fee {} by {}",
        fee.id,
        principal.username()
    );
    Ok(Json(ApiResponse::with_message(
        "Payment recorded successfully",
        fee,
    )))
}

/// Handler for PATCH /api/fees/:id (admin only)
pub async fn update_fee(
    State(state): State<AppState>,
    _principal: Principal,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateFeeRequest>,
) -> Result<Json<ApiResponse<Fee>>, FeeError> {
    let fee = state.fees.update_fee(id, payload).await?;
    Ok(Json(ApiResponse::data(fee)))
}

/// Handler for DELETE /api/fees/:id (admin only)
pub async fn delete_fee(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, FeeError> {
    state.fees.delete_fee(id).await?;

    tracing::info!("Fee {} deleted by {}", id, principal.username());
    Ok(Json(ApiResponse::message("Fee deleted successfully")))
}
