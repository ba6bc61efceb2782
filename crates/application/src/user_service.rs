//! User administration service.
//!
//! Creates and lists the users of the admin client. Role references are
//! checked against the role store on creation so every stored user points
//! at roles the permission resolver can walk.

use std::sync::Arc;

use crate::{RoleRepository, UserRepository};

/// Application service for user records.
#[derive(Clone)]
pub struct UserService {
    user_repository: Arc<dyn UserRepository>,
    role_repository: Arc<dyn RoleRepository>,
}

impl UserService {
    /// Creates a new user service.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        role_repository: Arc<dyn RoleRepository>,
    ) -> Self {
        Self {
            user_repository,
            role_repository,
        }
    }
}

mod registration;
mod retrieval;
