//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod identifier;
mod role;
mod security;
mod user;

pub use role::{Role, RoleId};
pub use security::{AccessDecision, Permission};
pub use user::{EmailAddress, RecordStamps, UserId, UserProfile, UserRecord, UserStatus};
