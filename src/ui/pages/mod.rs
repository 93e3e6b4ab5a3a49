pub mod account;
pub mod auth;
pub mod load_details;
pub mod loads;

pub use account::AccountPage;
pub use auth::{ForgotPasswordPage, LoginPage, RegisterPage};
pub use load_details::LoadDetailsPage;
pub use loads::LoadsPage;
