//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod firestore_access_audit_repository;
mod firestore_client;
mod firestore_role_repository;
mod firestore_user_repository;
mod in_memory_access_audit_repository;
mod in_memory_directory_repository;

pub use firestore_access_audit_repository::FirestoreAccessAuditRepository;
pub use firestore_client::{FirestoreClient, FirestoreConfig};
pub use firestore_role_repository::FirestoreRoleRepository;
pub use firestore_user_repository::FirestoreUserRepository;
pub use in_memory_access_audit_repository::InMemoryAccessAuditRepository;
pub use in_memory_directory_repository::InMemoryDirectoryRepository;
