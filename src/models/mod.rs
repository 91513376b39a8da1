pub mod enquiry;
pub mod user;

pub use enquiry::{CreateEnquiry, Enquiry};
pub use user::{CreateUserRequest, LoginRequest, UpdateUserRequest, User};
