pub mod auth;
pub mod enquiries;
pub mod health;
pub mod users;
