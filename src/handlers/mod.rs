pub mod health;
pub mod login;
pub mod password_reset;
pub mod register;
pub mod settings;

pub use health::health_check;
pub use login::login;
pub use password_reset::{
    request_password_reset, resend_reset_code, reset_password, verify_reset_code,
};
pub use register::register;
pub use settings::change_password;
