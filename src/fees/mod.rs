// Fee ledger module

pub mod error;
pub mod handlers;
pub mod lifecycle;
pub mod models;
pub mod repository;
pub mod service;

pub use error::FeeError;
pub use models::{Fee, FeeStatus, PaymentMethod};
pub use repository::{FeeStore, FeesRepository};
pub use service::FeeService;
