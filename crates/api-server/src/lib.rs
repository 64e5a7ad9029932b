//! REST API for the MemberDesk platform.

pub mod blast_rest;
pub mod members_rest;
pub mod reports_rest;
pub mod rest;
pub mod server;

pub use rest::AppState;
pub use server::ApiServer;
