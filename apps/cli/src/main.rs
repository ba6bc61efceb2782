//! sion-admin command-line client.

#![forbid(unsafe_code)]

mod cli_config;
mod command;
mod output;

use std::env;
use std::sync::Arc;

use sion_application::{
    AccessAuditRepository, AuthorizationService, Deadline, PermissionResolver, RoleRepository,
    RoleService, UserRepository, UserService,
};
use sion_core::{AppError, AppResult};
use sion_infrastructure::{
    FirestoreAccessAuditRepository, FirestoreClient, FirestoreRoleRepository,
    FirestoreUserRepository, InMemoryAccessAuditRepository, InMemoryDirectoryRepository,
};
use tracing::{info, warn};

use crate::cli_config::{CliConfig, DirectoryBackend, init_tracing};
use crate::command::Command;

struct Directory {
    role_repository: Arc<dyn RoleRepository>,
    user_repository: Arc<dyn UserRepository>,
    audit_repository: Arc<dyn AccessAuditRepository>,
}

struct Services {
    resolver: PermissionResolver,
    authorization: AuthorizationService,
    roles: RoleService,
    users: UserService,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let command = Command::parse(env::args().skip(1))?;
    let config = CliConfig::load()?;
    let services = build_services(build_directory(&config)?);
    let output = execute(&services, &config, command).await?;

    print!("{output}");
    Ok(())
}

/// Seeds roles when configured, then runs `command`.
///
/// The seed and the command each get their own `request_timeout` budget.
async fn execute(services: &Services, config: &CliConfig, command: Command) -> AppResult<String> {
    if config.seed_roles_on_start && command != Command::Seed {
        Deadline::after(config.request_timeout)
            .run("seed roles", services.roles.seed_default_roles())
            .await?;
    }

    let label = command.label();
    info!(command = label, actor = %config.actor, "running command");
    Deadline::after(config.request_timeout)
        .run(label, run_command(services, config.actor.as_str(), command))
        .await
}

fn build_directory(config: &CliConfig) -> AppResult<Directory> {
    match &config.backend {
        DirectoryBackend::Firestore(firestore_config) => {
            let http_client = reqwest::Client::builder()
                .timeout(config.request_timeout)
                .build()
                .map_err(|error| {
                    AppError::Internal(format!("failed to build HTTP client: {error}"))
                })?;
            let client = FirestoreClient::new(http_client, firestore_config.clone());

            info!(
                project_id = firestore_config.project_id(),
                "using Firestore directory"
            );
            Ok(Directory {
                role_repository: Arc::new(FirestoreRoleRepository::new(client.clone())),
                user_repository: Arc::new(FirestoreUserRepository::new(client.clone())),
                audit_repository: Arc::new(FirestoreAccessAuditRepository::new(client)),
            })
        }
        DirectoryBackend::Memory => {
            warn!("using in-memory directory, nothing is persisted");
            let repository = Arc::new(InMemoryDirectoryRepository::new());
            Ok(Directory {
                role_repository: repository.clone(),
                user_repository: repository,
                audit_repository: Arc::new(InMemoryAccessAuditRepository::new()),
            })
        }
    }
}

fn build_services(directory: Directory) -> Services {
    let resolver = PermissionResolver::new(directory.role_repository.clone());

    Services {
        authorization: AuthorizationService::new(
            resolver.clone(),
            directory.user_repository.clone(),
            directory.audit_repository,
        ),
        resolver,
        roles: RoleService::new(directory.role_repository.clone()),
        users: UserService::new(directory.user_repository, directory.role_repository),
    }
}

async fn run_command(services: &Services, actor: &str, command: Command) -> AppResult<String> {
    match command {
        Command::Seed => services
            .roles
            .seed_default_roles()
            .await
            .map(|report| output::seed_report(&report)),
        Command::Roles => services
            .roles
            .list_roles()
            .await
            .map(|roles| output::roles(&roles)),
        Command::Resolve(role_id) => services
            .resolver
            .resolve_permissions(&role_id)
            .await
            .map(|permissions| output::permissions(&permissions)),
        Command::Chain(role_id) => services
            .resolver
            .resolve_chain(&role_id)
            .await
            .map(|chain| output::chain(&chain)),
        Command::Permissions(user_id) => services
            .authorization
            .get_user_permissions(&user_id)
            .await
            .map(|permissions| output::permissions(&permissions)),
        Command::Check(user_id, permission) => services
            .authorization
            .check_permission(&user_id, &permission)
            .await
            .map(output::decision),
        Command::Users => services
            .users
            .list_users()
            .await
            .map(|users| output::users(&users)),
        Command::AddUser(input) => services
            .users
            .add_user(actor, input)
            .await
            .map(|user| output::users(std::slice::from_ref(&user))),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::cli_config::{CliConfig, DirectoryBackend};
    use crate::command::Command;

    use super::{build_directory, build_services, execute};

    fn memory_config(seed_roles_on_start: bool) -> CliConfig {
        CliConfig {
            backend: DirectoryBackend::Memory,
            request_timeout: Duration::from_secs(5),
            seed_roles_on_start,
            actor: "tester".to_owned(),
        }
    }

    #[tokio::test]
    async fn startup_seed_runs_before_the_command() {
        let config = memory_config(true);
        let services = build_services(build_directory(&config).unwrap_or_else(|_| unreachable!()));

        let output = execute(&services, &config, Command::Roles).await;
        assert_eq!(output.unwrap_or_default().lines().count(), 6);
    }

    #[tokio::test]
    async fn command_runs_alone_when_startup_seed_is_off() {
        let config = memory_config(false);
        let services = build_services(build_directory(&config).unwrap_or_else(|_| unreachable!()));

        let output = execute(&services, &config, Command::Roles).await;
        assert!(output.is_ok());
        assert_eq!(output.unwrap_or_default(), "");
    }
}
