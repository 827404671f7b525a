// HTTP handlers for student enrollment endpoints

use crate::auth::{models::Principal, password::PasswordService};
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::students::models::{
    Belt, CreateStudentRequest, Student, StudentResponse, StudentStatus, UpdateStudentRequest,
};
use crate::students::repository::StudentsRepository;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Query parameters for the student list.
#[derive(Debug, Deserialize)]
pub struct StudentListQuery {
    pub status: Option<StudentStatus>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StudentSearchQuery {
    pub q: Option<String>,
}

const SEARCH_LIMIT: i64 = 10;

/// Handler for GET /api/students
#[utoipa::path(
    get,
    path = "/api/students",
    params(
        ("status" = Option<StudentStatus>, Query, description = "Filter by enrollment status"),
        ("search" = Option<String>, Query, description = "Case-insensitive name search")
    ),
    responses(
        (status = 200, description = "List of students", body = [StudentResponse]),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "students"
)]
pub async fn get_students(
    State(state): State<AppState>,
    _principal: Principal,
    Query(params): Query<StudentListQuery>,
) -> Result<Json<ApiResponse<Vec<StudentResponse>>>, ApiError> {
    let students = StudentsRepository::new(state.db.clone())
        .list(params.status, params.search.as_deref())
        .await?;

    let responses: Vec<StudentResponse> = students.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::list(responses)))
}

/// Handler for GET /api/students/search?q=
#[utoipa::path(
    get,
    path = "/api/students/search",
    params(("q" = String, Query, description = "Search query")),
    responses(
        (status = 200, description = "Matching students", body = [StudentResponse]),
        (status = 400, description = "Missing search query")
    ),
    tag = "students"
)]
pub async fn search_students(
    State(state): State<AppState>,
    _principal: Principal,
    Query(params): Query<StudentSearchQuery>,
) -> Result<Json<ApiResponse<Vec<StudentResponse>>>, ApiError> {
    let query = params
        .q
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Please provide a search query".to_string()))?;

    let students = StudentsRepository::new(state.db.clone())
        .search(&query, SEARCH_LIMIT)
        .await?;

    let responses: Vec<StudentResponse> = students.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::list(responses)))
}

/// Handler for GET /api/students/:id
#[utoipa::path(
    get,
    path = "/api/students/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student found", body = StudentResponse),
        (status = 404, description = "Student not found")
    ),
    tag = "students"
)]
pub async fn get_student(
    State(state): State<AppState>,
    _principal: Principal,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<StudentResponse>>, ApiError> {
    let student = StudentsRepository::new(state.db.clone())
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound {
            resource: "Student",
        })?;

    Ok(Json(ApiResponse::data(student.into())))
}

/// Handler for POST /api/students
/// Admin-only: enrolls a new student with login credentials.
#[utoipa::path(
    post,
    path = "/api/students",
    request_body = CreateStudentRequest,
    responses(
        (status = 201, description = "Student created", body = StudentResponse),
        (status = 400, description = "Invalid input data"),
        (status = 409, description = "Duplicate username, email or phone number")
    ),
    tag = "students"
)]
pub async fn create_student(
    State(state): State<AppState>,
    principal: Principal,
    Json(payload): Json<CreateStudentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<StudentResponse>>), ApiError> {
    payload.validate()?;

    let password_hash = PasswordService::hash_password(&payload.password)
        .map_err(|_| ApiError::Internal("Failed to hash student password".to_string()))?;

    let now = Utc::now();
    let student = Student {
        id: Uuid::new_v4(),
        username: payload.username,
        email: payload.email,
        phone_number: payload.phone_number,
        parent_phone: payload.parent_phone,
        password_hash,
        name: payload.name,
        age: payload.age,
        gender: payload.gender,
        belt: payload.belt.unwrap_or(Belt::Beginner),
        status: payload.status.unwrap_or(StudentStatus::Active),
        address: payload.address,
        profile_image: payload.profile_image,
        join_date: payload.join_date.unwrap_or(now),
        created_at: now,
        updated_at: now,
    };

    let created = StudentsRepository::new(state.db.clone())
        .insert(&student)
        .await?;

    tracing::info!(
        "New student created: {} by {}",
        created.name,
        principal.username()
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(created.into())),
    ))
}

/// Handler for PUT /api/students/:id
#[utoipa::path(
    put,
    path = "/api/students/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    request_body = UpdateStudentRequest,
    responses(
        (status = 200, description = "Student updated", body = StudentResponse),
        (status = 404, description = "Student not found")
    ),
    tag = "students"
)]
pub async fn update_student(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStudentRequest>,
) -> Result<Json<ApiResponse<StudentResponse>>, ApiError> {
    payload.validate()?;

    let updated = StudentsRepository::new(state.db.clone())
        .update(id, &payload)
        .await?
        .ok_or(ApiError::NotFound {
            resource: "Student",
        })?;

    tracing::info!(
        "Student updated: {} by {}",
        updated.name,
        principal.username()
    );
    Ok(Json(ApiResponse::data(updated.into())))
}

/// Handler for DELETE /api/students/:id
#[utoipa::path(
    delete,
    path = "/api/students/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student deleted"),
        (status = 404, description = "Student not found")
    ),
    tag = "students"
)]
pub async fn delete_student(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let deleted = StudentsRepository::new(state.db.clone()).delete(id).await?;

    if !deleted {
        return Err(ApiError::NotFound {
            resource: "Student",
        });
    }

    tracing::info!("Student deleted: {} by {}", id, principal.username());
    Ok(Json(ApiResponse::message("Student deleted successfully")))
}
