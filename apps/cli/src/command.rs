use sion_application::CreateUserInput;
use sion_core::AppError;
use sion_domain::{Permission, RoleId, UserId};

pub const USAGE: &str = "usage: sion-admin <command>

commands:
  seed                                  seed the default role catalog
  roles                                 list stored roles
  resolve <role-id>                     print the permissions a role grants
  chain <role-id>                       print a role's inheritance chain
  permissions <user-id>                 print the permissions a user holds
  check <user-id> <permission>          report whether a user holds a permission
  users                                 list stored users
  add-user <name> <email> [role-id...]  create a user";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Seed,
    Roles,
    Resolve(RoleId),
    Chain(RoleId),
    Permissions(UserId),
    Check(UserId, Permission),
    Users,
    AddUser(CreateUserInput),
}

impl Command {
    /// Parses command-line arguments, excluding the program name.
    pub fn parse<I>(args: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let name = args
            .next()
            .ok_or_else(|| AppError::Validation(format!("missing command\n\n{USAGE}")))?;
        let rest: Vec<String> = args.collect();

        let command = match (name.as_str(), rest.as_slice()) {
            ("seed", []) => Self::Seed,
            ("roles", []) => Self::Roles,
            ("users", []) => Self::Users,
            ("resolve", [role_id]) => Self::Resolve(RoleId::new(role_id.as_str())?),
            ("chain", [role_id]) => Self::Chain(RoleId::new(role_id.as_str())?),
            ("permissions", [user_id]) => Self::Permissions(UserId::new(user_id.as_str())?),
            ("check", [user_id, permission]) => Self::Check(
                UserId::new(user_id.as_str())?,
                Permission::new(permission.as_str())?,
            ),
            ("add-user", [name, email, role_ids @ ..]) => Self::AddUser(CreateUserInput {
                name: name.clone(),
                email: email.clone(),
                role_ids: role_ids.to_vec(),
                ..CreateUserInput::default()
            }),
            (
                "seed" | "roles" | "users" | "resolve" | "chain" | "permissions" | "check"
                | "add-user",
                _,
            ) => {
                return Err(AppError::Validation(format!(
                    "wrong arguments for '{name}'\n\n{USAGE}"
                )));
            }
            (other, _) => {
                return Err(AppError::Validation(format!(
                    "unknown command '{other}'\n\n{USAGE}"
                )));
            }
        };

        Ok(command)
    }

    /// Label used for logs and deadline errors.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Seed => "seed",
            Self::Roles => "roles",
            Self::Resolve(_) => "resolve",
            Self::Chain(_) => "chain",
            Self::Permissions(_) => "permissions",
            Self::Check(_, _) => "check",
            Self::Users => "users",
            Self::AddUser(_) => "add-user",
        }
    }
}
