//! Data models for the SkinVault inventory tracker.
//!
//! Wire formats are camelCase for application-owned records and snake_case
//! for catalog entries, which mirror the external skins API.

mod catalog;
mod condition;
mod item;
mod user;

pub use catalog::*;
pub use condition::*;
pub use item::*;
pub use user::*;
