/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Citizen role - can submit reports and track their own submissions
pub const ROLE_CITIZEN: &str = "citizen";

/// Staff role - can triage reports and edit their status
pub const ROLE_STAFF: &str = "staff";

/// Admin role - full access, implies staff access
pub const ROLE_ADMIN: &str = "admin";
