use std::collections::BTreeSet;
use std::fmt::Write;

use sion_application::RoleSeedReport;
use sion_domain::{AccessDecision, Permission, Role, RoleId, UserRecord};

pub fn seed_report(report: &RoleSeedReport) -> String {
    format!(
        "created {} role(s), updated {}, unchanged {}\n",
        report.created, report.updated, report.unchanged
    )
}

pub fn roles(roles: &[Role]) -> String {
    let mut output = String::new();
    for role in roles {
        let _ = writeln!(
            output,
            "{}\t{}\t{}\t{}",
            role.id(),
            role.name(),
            role.inherits_from().map_or("-", RoleId::as_str),
            joined(role.permissions().iter().map(Permission::as_str)),
        );
    }
    output
}

pub fn chain(chain: &[Role]) -> String {
    format!("{}\n", chain.iter().map(|role| role.id().as_str()).collect::<Vec<_>>().join(" -> "))
}

pub fn permissions(permissions: &BTreeSet<Permission>) -> String {
    permissions
        .iter()
        .map(|permission| format!("{permission}\n"))
        .collect()
}

pub fn decision(granted: bool) -> String {
    format!("{}\n", AccessDecision::from_membership(granted).as_str())
}

pub fn users(users: &[UserRecord]) -> String {
    let mut output = String::new();
    for user in users {
        let _ = writeln!(
            output,
            "{}\t{}\t{}\t{}\t{}",
            user.id(),
            user.profile().effective_display_name(),
            user.profile().email.as_str(),
            user.status().as_str(),
            joined(user.role_ids().iter().map(RoleId::as_str)),
        );
    }
    output
}

fn joined<'a>(values: impl Iterator<Item = &'a str>) -> String {
    let values: Vec<&str> = values.collect();
    if values.is_empty() {
        return "-".to_owned();
    }
    values.join(",")
}
