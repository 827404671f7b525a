// Center events module

pub mod handlers;
pub mod models;
pub mod repository;

pub use models::Event;
pub use repository::EventsRepository;
