// Attendance models and DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AttendanceMethod {
    FaceRecognition,
    Manual,
}

/// One attendance record: a student on a calendar date.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub student_id: Uuid,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub method: AttendanceMethod,
    pub confidence: Option<f64>,
    pub check_in_time: Option<DateTime<Utc>>,
    pub marked_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Face-recognition check-in request, sent by the kiosk after a match.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceCheckInRequest {
    pub student_id: Option<Uuid>,
    pub confidence: Option<f64>,
}

/// One entry in a manual attendance batch.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualAttendanceEntry {
    pub student_id: Uuid,
    pub status: AttendanceStatus,
}

/// Manual marking request: a roll call for one date.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualAttendanceRequest {
    pub date: Option<NaiveDate>,
    pub records: Vec<ManualAttendanceEntry>,
}
