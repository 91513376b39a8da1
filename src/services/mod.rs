pub mod enquiry;
pub mod notification;
pub mod users;

pub use enquiry::EnquiryService;
pub use notification::Notifier;
pub use users::UsersService;
