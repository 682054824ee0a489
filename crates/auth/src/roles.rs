use core::str::FromStr;

use serde::{Deserialize, Serialize};

use pickpoint_core::DomainError;

/// Role of an authenticated user.
///
/// The role set is closed: moderators administer pickup points and read
/// history, employees run the receiving workflow. A closed enum (rather than
/// an opaque string) lets the capability matrix match exhaustively.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Moderator,
    Employee,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Moderator => "moderator",
            Role::Employee => "employee",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "moderator" => Ok(Role::Moderator),
            "employee" => Ok(Role::Employee),
            other => Err(DomainError::validation(format!(
                "unknown role '{other}' (expected 'moderator' or 'employee')"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_roles() {
        assert_eq!("moderator".parse::<Role>().unwrap(), Role::Moderator);
        assert_eq!("employee".parse::<Role>().unwrap(), Role::Employee);
    }

    #[test]
    fn parse_rejects_unknown_role() {
        let err = "admin".parse::<Role>().unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
