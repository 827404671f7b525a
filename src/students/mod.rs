// Student enrollment module

pub mod handlers;
pub mod models;
pub mod repository;

pub use models::{Belt, Student, StudentResponse, StudentStatus};
pub use repository::StudentsRepository;
