pub mod account;
pub mod reset_session;

pub use account::Account;
pub use reset_session::{ResetSession, ResetState};
