use pricemap_model::Role;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectionError {
    /// Required roles with no source column and no default.
    #[error("missing required columns: {}", format_roles(roles))]
    MissingRequiredRoles { roles: Vec<Role> },

    /// Column roles must be unique before projection.
    #[error("role {role} is assigned to more than one column")]
    DuplicateAssignment { role: Role },
}

fn format_roles(roles: &[Role]) -> String {
    roles
        .iter()
        .map(Role::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, ProjectionError>;
