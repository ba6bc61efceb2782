use std::env;
use std::time::Duration;

use sion_core::AppError;
use sion_infrastructure::FirestoreConfig;
use tracing_subscriber::EnvFilter;

const DEFAULT_DATABASE_ID: &str = "(default)";
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_ACTOR: &str = "sion-admin";

#[derive(Debug, Clone)]
pub enum DirectoryBackend {
    Firestore(FirestoreConfig),
    Memory,
}

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub backend: DirectoryBackend,
    pub request_timeout: Duration,
    pub seed_roles_on_start: bool,
    pub actor: String,
}

impl CliConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_source(|name| env::var(name).ok())
    }

    fn from_source(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let optional = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let backend = match optional("DIRECTORY_BACKEND")
            .unwrap_or_else(|| "firestore".to_owned())
            .as_str()
        {
            "firestore" => DirectoryBackend::Firestore(firestore_config(&optional)?),
            "memory" => DirectoryBackend::Memory,
            other => {
                return Err(AppError::Validation(format!(
                    "DIRECTORY_BACKEND must be either 'firestore' or 'memory', got '{other}'"
                )));
            }
        };

        let request_timeout_ms = match optional("REQUEST_TIMEOUT_MS") {
            Some(value) => value.parse::<u64>().map_err(|error| {
                AppError::Validation(format!("invalid REQUEST_TIMEOUT_MS value '{value}': {error}"))
            })?,
            None => DEFAULT_REQUEST_TIMEOUT_MS,
        };
        if request_timeout_ms == 0 {
            return Err(AppError::Validation(
                "REQUEST_TIMEOUT_MS must be greater than zero".to_owned(),
            ));
        }

        let seed_roles_on_start = optional("SEED_ROLES_ON_START")
            .map(|value| !value.eq_ignore_ascii_case("false"))
            .unwrap_or(true);
        let actor = optional("CLI_ACTOR").unwrap_or_else(|| DEFAULT_ACTOR.to_owned());

        Ok(Self {
            backend,
            request_timeout: Duration::from_millis(request_timeout_ms),
            seed_roles_on_start,
            actor,
        })
    }
}

fn firestore_config(
    optional: &impl Fn(&str) -> Option<String>,
) -> Result<FirestoreConfig, AppError> {
    let project_id = required_env(optional, "FIRESTORE_PROJECT_ID")?;
    let database_id =
        optional("FIRESTORE_DATABASE_ID").unwrap_or_else(|| DEFAULT_DATABASE_ID.to_owned());

    let config = match optional("FIRESTORE_EMULATOR_HOST") {
        Some(host) => FirestoreConfig::for_emulator(host.as_str(), project_id, database_id)?,
        None => FirestoreConfig::new(project_id, database_id)?,
    };

    Ok(config
        .api_key(optional("FIRESTORE_API_KEY"))
        .access_token(optional("FIRESTORE_ACCESS_TOKEN")))
}

fn required_env(
    optional: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<String, AppError> {
    optional(name).ok_or_else(|| AppError::Validation(format!("{name} is required")))
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
