//! Role→operation capability matrix.
//!
//! One central policy table instead of per-handler role checks. Pure:
//! no IO, no panics, no business logic.

use thiserror::Error;

use crate::Role;

/// Operations exposed at the service boundary.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Operation {
    CreatePickupPoint,
    ListPickupPoints,
    OpenReception,
    CloseReception,
    AddProduct,
    RemoveLastProduct,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::CreatePickupPoint => "pickup_points.create",
            Operation::ListPickupPoints => "pickup_points.list",
            Operation::OpenReception => "receptions.open",
            Operation::CloseReception => "receptions.close",
            Operation::AddProduct => "products.add",
            Operation::RemoveLastProduct => "products.remove_last",
        }
    }
}

impl core::fmt::Display for Operation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("role '{role}' is not permitted to perform '{operation}'")]
    Forbidden { role: Role, operation: Operation },
}

/// The capability matrix: which role may perform which operation.
pub fn allowed(role: Role, operation: Operation) -> bool {
    match operation {
        Operation::CreatePickupPoint => role == Role::Moderator,
        Operation::ListPickupPoints => matches!(role, Role::Moderator | Role::Employee),
        Operation::OpenReception
        | Operation::CloseReception
        | Operation::AddProduct
        | Operation::RemoveLastProduct => role == Role::Employee,
    }
}

/// Authorize a role for an operation.
pub fn authorize(role: Role, operation: Operation) -> Result<(), AuthzError> {
    if allowed(role, operation) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden { role, operation })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_OPS: [Operation; 6] = [
        Operation::CreatePickupPoint,
        Operation::ListPickupPoints,
        Operation::OpenReception,
        Operation::CloseReception,
        Operation::AddProduct,
        Operation::RemoveLastProduct,
    ];

    #[test]
    fn moderator_capabilities() {
        let granted: Vec<_> = ALL_OPS
            .iter()
            .copied()
            .filter(|op| allowed(Role::Moderator, *op))
            .collect();
        assert_eq!(
            granted,
            vec![Operation::CreatePickupPoint, Operation::ListPickupPoints]
        );
    }

    #[test]
    fn employee_capabilities() {
        let granted: Vec<_> = ALL_OPS
            .iter()
            .copied()
            .filter(|op| allowed(Role::Employee, *op))
            .collect();
        assert_eq!(
            granted,
            vec![
                Operation::ListPickupPoints,
                Operation::OpenReception,
                Operation::CloseReception,
                Operation::AddProduct,
                Operation::RemoveLastProduct,
            ]
        );
    }

    #[test]
    fn authorize_reports_role_and_operation() {
        let err = authorize(Role::Employee, Operation::CreatePickupPoint).unwrap_err();
        assert_eq!(
            err,
            AuthzError::Forbidden {
                role: Role::Employee,
                operation: Operation::CreatePickupPoint,
            }
        );
    }
}
