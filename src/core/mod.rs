pub mod errors;
pub mod models;
pub mod notifications;
pub mod settings;
