use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::constants::{ROLE_ADMIN, ROLE_STAFF};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Subject from the identity provider; also keys the user's wizard session
    pub sub: String,
    pub roles: Vec<String>,
}

impl AuthenticatedUser {
    /// Check if user has a specific role
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(ROLE_ADMIN)
    }

    /// Staff-level access: status triage, full report listing
    pub fn has_staff_access(&self) -> bool {
        self.has_role(ROLE_STAFF) || self.is_admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{create_citizen_user, create_staff_user};

    #[test]
    fn test_staff_access_includes_admin() {
        let admin = AuthenticatedUser {
            sub: "a".to_string(),
            roles: vec!["admin".to_string()],
        };
        let staff = create_staff_user();
        let citizen = create_citizen_user();

        assert!(admin.has_staff_access());
        assert!(staff.has_staff_access());
        assert!(!citizen.has_staff_access());
        assert!(!staff.is_admin());
    }
}
