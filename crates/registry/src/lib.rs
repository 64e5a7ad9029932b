//! Member registry — the member store contract, an in-memory implementation,
//! the registration approval workflow, and activity listings.

pub mod activities;
pub mod memory;
pub mod models;
pub mod registrations;
pub mod store;

pub use memory::MemberRegistry;
pub use store::{GroupField, GroupRow, MemberStore, SelectOrder};
