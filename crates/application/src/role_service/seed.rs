use std::collections::{HashMap, HashSet};

use sion_core::{AppError, AppResult};
use sion_domain::{Role, RoleId};
use tracing::{debug, info};

use super::{RoleService, default_role_catalog};

/// Outcome of a seeding pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoleSeedReport {
    /// Roles that did not exist before.
    pub created: usize,
    /// Roles whose stored version differed and was replaced.
    pub updated: usize,
    /// Roles already stored exactly as defined.
    pub unchanged: usize,
}

impl RoleService {
    /// Upserts the built-in role catalog.
    pub async fn seed_default_roles(&self) -> AppResult<RoleSeedReport> {
        self.seed_roles(default_role_catalog()?).await
    }

    /// Upserts the given roles by id.
    ///
    /// The combined graph of stored and seeded roles is validated before any
    /// write: every parent must exist and no chain may loop. Roles already
    /// stored unchanged are not rewritten, so seeding is idempotent.
    pub async fn seed_roles(&self, roles: Vec<Role>) -> AppResult<RoleSeedReport> {
        let stored: HashMap<RoleId, Role> = self
            .role_repository
            .list_roles()
            .await?
            .into_iter()
            .map(|role| (role.id().clone(), role))
            .collect();

        validate_seed_graph(&roles, &stored)?;

        let mut report = RoleSeedReport::default();
        for role in roles {
            match stored.get(role.id()) {
                Some(existing) if existing == &role => {
                    debug!(role_id = %role.id(), "role already seeded");
                    report.unchanged += 1;
                }
                Some(_) => {
                    info!(role_id = %role.id(), "updating seeded role");
                    self.role_repository.save_role(role).await?;
                    report.updated += 1;
                }
                None => {
                    info!(role_id = %role.id(), "creating seeded role");
                    self.role_repository.save_role(role).await?;
                    report.created += 1;
                }
            }
        }

        info!(
            created = report.created,
            updated = report.updated,
            unchanged = report.unchanged,
            "role seeding finished"
        );

        Ok(report)
    }
}

fn validate_seed_graph(roles: &[Role], stored: &HashMap<RoleId, Role>) -> AppResult<()> {
    let mut graph: HashMap<&RoleId, Option<&RoleId>> = stored
        .values()
        .map(|role| (role.id(), role.inherits_from()))
        .collect();

    let mut seeded_ids = HashSet::new();
    for role in roles {
        if !seeded_ids.insert(role.id()) {
            return Err(AppError::Validation(format!(
                "role '{}' appears more than once in the seed set",
                role.id()
            )));
        }
        graph.insert(role.id(), role.inherits_from());
    }

    for role in roles {
        let mut path = vec![role.id()];
        let mut current = role.inherits_from();

        while let Some(parent) = current {
            if let Some(start) = path.iter().position(|visited| *visited == parent) {
                let cycle = path[start..]
                    .iter()
                    .map(|id| id.as_str())
                    .chain(std::iter::once(parent.as_str()))
                    .collect::<Vec<_>>()
                    .join(" -> ");
                return Err(AppError::InheritanceCycle(cycle));
            }

            let Some(next) = graph.get(parent) else {
                return Err(AppError::NotFound(format!(
                    "role '{parent}' inherited by '{}' is neither seeded nor stored",
                    path.last().map(|id| id.as_str()).unwrap_or_default()
                )));
            };

            path.push(parent);
            current = *next;
        }
    }

    Ok(())
}
