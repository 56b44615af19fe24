pub mod auth;
pub mod email;
pub mod password_reset;

pub use auth::AuthService;
pub use email::EmailService;
pub use password_reset::{IssuedCode, PasswordResetService};
