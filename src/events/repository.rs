// Data access layer for events

use crate::events::models::{Event, UpdateEventRequest};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

const EVENT_COLUMNS: &str = "id, title, description, date, time, location, event_type, \
     participants, created_by, created_at, updated_at";

#[derive(Clone)]
pub struct EventsRepository {
    pool: PgPool,
}

impl EventsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, event: &Event) -> Result<Event, sqlx::Error> {
        let query = format!(
            "INSERT INTO events (id, title, description, date, time, location, event_type, \
             participants, created_by, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {EVENT_COLUMNS}"
        );

        sqlx::query_as::<_, Event>(&query)
            .bind(event.id)
            .bind(&event.title)
            .bind(&event.description)
            .bind(event.date)
            .bind(&event.time)
            .bind(&event.location)
            .bind(&event.event_type)
            .bind(&event.participants)
            .bind(event.created_by)
            .bind(event.created_at)
            .bind(event.updated_at)
            .fetch_one(&self.pool)
            .await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");

        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn list(
        &self,
        event_type: Option<&str>,
        after: Option<DateTime<Utc>>,
        limit: i64,
    ) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!(
            "SELECT {EVENT_COLUMNS} FROM events \
             WHERE ($1::text IS NULL OR event_type = $1) \
             AND ($2::timestamptz IS NULL OR date >= $2) \
             ORDER BY date DESC LIMIT $3"
        );

        sqlx::query_as::<_, Event>(&query)
            .bind(event_type)
            .bind(after)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
    }

    /// Read-merge-write update; returns None when the event does not exist.
    pub async fn update(
        &self,
        id: Uuid,
        changes: &UpdateEventRequest,
    ) -> Result<Option<Event>, sqlx::Error> {
        let Some(mut event) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        if let Some(title) = &changes.title {
            event.title = title.clone();
        }
        if let Some(description) = &changes.description {
            event.description = Some(description.clone());
        }
        if let Some(date) = changes.date {
            event.date = date;
        }
        if let Some(time) = &changes.time {
            event.time = Some(time.clone());
        }
        if let Some(location) = &changes.location {
            event.location = location.clone();
        }
        if let Some(event_type) = &changes.event_type {
            event.event_type = event_type.clone();
        }
        if let Some(participants) = &changes.participants {
            event.participants = participants.clone();
        }

        let query = format!(
            "UPDATE events SET title = $2, description = $3, date = $4, time = $5, \
             location = $6, event_type = $7, participants = $8, updated_at = $9 \
             WHERE id = $1 RETURNING {EVENT_COLUMNS}"
        );

        let updated = sqlx::query_as::<_, Event>(&query)
            .bind(event.id)
            .bind(&event.title)
            .bind(&event.description)
            .bind(event.date)
            .bind(&event.time)
            .bind(&event.location)
            .bind(&event.event_type)
            .bind(&event.participants)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;

        Ok(Some(updated))
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
