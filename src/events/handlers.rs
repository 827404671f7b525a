// HTTP handlers for event endpoints

use crate::auth::models::Principal;
use crate::error::ApiError;
use crate::events::models::{
    CreateEventRequest, Event, EventListQuery, UpdateEventRequest, DEFAULT_EVENT_TYPE,
};
use crate::events::repository::EventsRepository;
use crate::response::ApiResponse;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

const DEFAULT_LIST_LIMIT: i64 = 50;

/// Handler for GET /api/events
pub async fn get_events(
    State(state): State<AppState>,
    _principal: Principal,
    Query(params): Query<EventListQuery>,
) -> Result<Json<ApiResponse<Vec<Event>>>, ApiError> {
    let after = params.upcoming.unwrap_or(false).then(Utc::now);

    let events = EventsRepository::new(state.db.clone())
        .list(
            params.event_type.as_deref(),
            after,
            params.limit.unwrap_or(DEFAULT_LIST_LIMIT),
        )
        .await?;

    Ok(Json(ApiResponse::list(events)))
}

/// Handler for GET /api/events/:id
pub async fn get_event(
    State(state): State<AppState>,
    _principal: Principal,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Event>>, ApiError> {
    let event = EventsRepository::new(state.db.clone())
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound { resource: "Event" })?;

    Ok(Json(ApiResponse::data(event)))
}

/// Handler for POST /api/events (admin only)
pub async fn create_event(
    State(state): State<AppState>,
    principal: Principal,
    Json(payload): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Event>>), ApiError> {
    let (title, date, location) = match (payload.title, payload.date, payload.location) {
        (Some(t), Some(d), Some(l)) if !t.is_empty() && !l.is_empty() => (t, d, l),
        _ => {
            return Err(ApiError::BadRequest(
                "Please provide title, date, and location".to_string(),
            ))
        }
    };

    let now = Utc::now();
    let event = Event {
        id: Uuid::new_v4(),
        title,
        description: payload.description,
        date,
        time: payload.time,
        location,
        event_type: payload
            .event_type
            .unwrap_or_else(|| DEFAULT_EVENT_TYPE.to_string()),
        participants: payload.participants.unwrap_or_default(),
        created_by: principal.id(),
        created_at: now,
        updated_at: now,
    };

    let created = EventsRepository::new(state.db.clone()).insert(&event).await?;

    tracing::info!(
        "Event created: {} by {}",
        created.title,
        principal.username()
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Event created successfully",
            created,
        )),
    ))
}

/// Handler for PUT /api/events/:id (admin only)
pub async fn update_event(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEventRequest>,
) -> Result<Json<ApiResponse<Event>>, ApiError> {
    let updated = EventsRepository::new(state.db.clone())
        .update(id, &payload)
        .await?
        .ok_or(ApiError::NotFound { resource: "Event" })?;

    tracing::info!("Event updated: {} by {}", updated.title, principal.username());
    Ok(Json(ApiResponse::data(updated)))
}

/// Handler for DELETE /api/events/:id (admin only)
pub async fn delete_event(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let deleted = EventsRepository::new(state.db.clone()).delete(id).await?;

    if !deleted {
        return Err(ApiError::NotFound { resource: "Event" });
    }

    tracing::info!("Event {} deleted by {}", id, principal.username());
    Ok(Json(ApiResponse::message("Event deleted successfully")))
}
