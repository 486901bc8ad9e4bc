#[cfg(test)]
use crate::features::auth::model::AuthenticatedUser;
#[cfg(test)]
use crate::shared::constants::{ROLE_CITIZEN, ROLE_STAFF};

#[cfg(test)]
pub fn create_citizen_user() -> AuthenticatedUser {
    AuthenticatedUser {
        sub: "test-citizen-sub".to_string(),
        roles: vec![ROLE_CITIZEN.to_string()],
    }
}

#[cfg(test)]
pub fn create_staff_user() -> AuthenticatedUser {
    AuthenticatedUser {
        sub: "test-staff-sub".to_string(),
        roles: vec![ROLE_STAFF.to_string()],
    }
}
