pub mod account;
pub mod reset_session;

pub use account::AccountRepository;
pub use reset_session::{ResetSessionStore, VerifyOutcome};
