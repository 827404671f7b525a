// Attendance tracking module

pub mod handlers;
pub mod models;
pub mod repository;

pub use models::{AttendanceMethod, AttendanceRecord, AttendanceStatus};
pub use repository::AttendanceRepository;
