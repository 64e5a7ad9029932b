pub mod config;
pub mod contact;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{MemberError, MemberResult};
