// HTTP handlers for attendance endpoints

use crate::attendance::models::{
    AttendanceMethod, AttendanceRecord, AttendanceStatus, FaceCheckInRequest,
    ManualAttendanceRequest,
};
use crate::attendance::repository::AttendanceRepository;
use crate::auth::models::Principal;
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

/// Handler for POST /api/attendance/mark (admin only)
/// Face-recognition check-in from the kiosk. One record per student per day.
pub async fn mark_by_face(
    State(state): State<AppState>,
    principal: Principal,
    Json(payload): Json<FaceCheckInRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AttendanceRecord>>), ApiError> {
    let student_id = payload
        .student_id
        .ok_or_else(|| ApiError::BadRequest("Please provide studentId".to_string()))?;

    let repo = AttendanceRepository::new(state.db.clone());
    let now = Utc::now();
    let today = now.date_naive();

    if repo.exists_for_date(student_id, today).await? {
        return Err(ApiError::BadRequest(
            "Attendance already marked for today".to_string(),
        ));
    }

    let record = AttendanceRecord {
        id: Uuid::new_v4(),
        student_id,
        date: today,
        status: AttendanceStatus::Present,
        method: AttendanceMethod::FaceRecognition,
        confidence: payload.confidence,
        check_in_time: Some(now),
        marked_by: Some(principal.id()),
        created_at: now,
    };

    let created = repo.insert(&record).await?;

    tracing::info!("Attendance marked for student {} via face", student_id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Attendance marked successfully",
            created,
        )),
    ))
}

/// Handler for POST /api/attendance/mark-manual (admin only)
/// Roll call for one date; existing records for the same day are replaced.
pub async fn mark_manual(
    State(state): State<AppState>,
    principal: Principal,
    Json(payload): Json<ManualAttendanceRequest>,
) -> Result<Json<ApiResponse<Vec<AttendanceRecord>>>, ApiError> {
    if payload.records.is_empty() {
        return Err(ApiError::BadRequest(
            "Please provide attendance records".to_string(),
        ));
    }

    let repo = AttendanceRepository::new(state.db.clone());
    let now = Utc::now();
    let date = payload.date.unwrap_or_else(|| now.date_naive());

    let mut saved = Vec::with_capacity(payload.records.len());
    for entry in payload.records {
        let record = AttendanceRecord {
            id: Uuid::new_v4(),
            student_id: entry.student_id,
            date,
            status: entry.status,
            method: AttendanceMethod::Manual,
            confidence: None,
            check_in_time: (entry.status == AttendanceStatus::Present).then_some(now),
            marked_by: Some(principal.id()),
            created_at: now,
        };
        saved.push(repo.upsert(&record).await?);
    }

    tracing::info!(
        "Manual attendance recorded for {} students by {}",
        saved.len(),
        principal.username()
    );
    Ok(Json(ApiResponse::with_message(
        "Attendance recorded successfully",
        saved,
    )))
}

/// Handler for GET /api/attendance/today
pub async fn get_today_attendance(
    State(state): State<AppState>,
    _principal: Principal,
) -> Result<Json<ApiResponse<Vec<AttendanceRecord>>>, ApiError> {
    let records = AttendanceRepository::new(state.db.clone())
        .for_date(Utc::now().date_naive())
        .await?;

    Ok(Json(ApiResponse::list(records)))
}

/// Handler for GET /api/attendance/student/:id
pub async fn get_student_attendance(
    State(state): State<AppState>,
    _principal: Principal,
    Path(student_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<AttendanceRecord>>>, ApiError> {
    let records = AttendanceRepository::new(state.db.clone())
        .for_student(student_id)
        .await?;

    Ok(Json(ApiResponse::list(records)))
}
