use sion_core::AppResult;
use sion_domain::{Permission, Role, RoleId};

struct SeedRole {
    id: &'static str,
    name: &'static str,
    permissions: &'static [&'static str],
    inherits_from: Option<&'static str>,
}

const DEFAULT_ROLES: [SeedRole; 6] = [
    SeedRole {
        id: "pastorGeneral",
        name: "Pastor General",
        permissions: &["manageAll", "viewAll"],
        inherits_from: None,
    },
    SeedRole {
        id: "pastorMinisterial",
        name: "Pastor Ministerial",
        permissions: &["manageArea", "viewAll"],
        inherits_from: Some("pastorGeneral"),
    },
    SeedRole {
        id: "liderDeCartera",
        name: "Líder de Cartera",
        permissions: &["manageArea"],
        inherits_from: Some("pastorMinisterial"),
    },
    SeedRole {
        id: "administrador",
        name: "Administrador",
        permissions: &["manageFinances", "viewAll"],
        inherits_from: Some("pastorGeneral"),
    },
    SeedRole {
        id: "servidor",
        name: "Servidor",
        permissions: &["serve"],
        inherits_from: None,
    },
    SeedRole {
        id: "miembro",
        name: "Miembro",
        permissions: &["attend"],
        inherits_from: None,
    },
];

/// Returns the built-in role definitions seeded into every deployment.
pub fn default_role_catalog() -> AppResult<Vec<Role>> {
    DEFAULT_ROLES
        .iter()
        .map(|entry| {
            let permissions = entry
                .permissions
                .iter()
                .map(|value| Permission::new(*value))
                .collect::<AppResult<Vec<_>>>()?;

            Role::new(
                RoleId::new(entry.id)?,
                entry.name,
                permissions,
                entry.inherits_from.map(RoleId::new).transpose()?,
            )
        })
        .collect()
}
