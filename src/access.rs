use serde::{Deserialize, Serialize};

/// Back-office roles as issued by the payments API.
///
/// Role claims arrive as free-form strings in storage, so anything we do not
/// recognise maps to [`Role::Unknown`] instead of failing the session. Route
/// checks treat unknown roles permissively; only the roles with explicit
/// restrictions are ever denied anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Admin,
    CallCenterManager,
    Technician,
    CustomerSupport,
    Customer,
    FinancialController,
    Unknown,
}

impl Role {
    /// Case-insensitive match on the stored claim. Surrounding whitespace is
    /// not stripped, so `" admin"` is a distinct, unrecognised value.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "superadmin" => Self::SuperAdmin,
            "admin" => Self::Admin,
            "callcentermanager" => Self::CallCenterManager,
            "technician" => Self::Technician,
            "customersupport" => Self::CustomerSupport,
            "customer" => Self::Customer,
            "financialcontroller" => Self::FinancialController,
            _ => Self::Unknown,
        }
    }

    /// Numeric id used by the API, where one exists.
    #[must_use]
    pub const fn id(self) -> Option<u8> {
        match self {
            Self::SuperAdmin => Some(1),
            Self::Admin => Some(2),
            Self::CallCenterManager => Some(3),
            Self::Technician => Some(4),
            Self::CustomerSupport => Some(5),
            Self::Customer => Some(6),
            Self::FinancialController => Some(7),
            Self::Unknown => None,
        }
    }

    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::SuperAdmin | Self::Admin)
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::Unknown
    }
}

/// Whether `route` may be shown for the given session state.
///
/// Deny rules are deliberately narrow: customers see nothing, technicians
/// lose the `/admin` subtree, and everyone else, unrecognised roles
/// included, sees everything. New roles added on the API side therefore
/// degrade to full visibility rather than a blank shell.
#[must_use]
pub fn route_visible(signed_in: bool, role: Role, route: &str) -> bool {
    if !signed_in {
        return false;
    }
    match role {
        Role::Customer => false,
        Role::Technician => !route.starts_with("/admin"),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_roles_in_any_case() {
        assert_eq!(Role::parse("Admin"), Role::Admin);
        assert_eq!(Role::parse("ADMIN"), Role::Admin);
        assert_eq!(Role::parse("superadmin"), Role::SuperAdmin);
        assert_eq!(Role::parse("CallCenterManager"), Role::CallCenterManager);
        assert_eq!(Role::parse("CustomerSupport"), Role::CustomerSupport);
        assert_eq!(Role::parse("financialcontroller"), Role::FinancialController);
    }

    #[test]
    fn does_not_trim_before_matching() {
        assert_eq!(Role::parse(" admin"), Role::Unknown);
        assert_eq!(Role::parse("admin "), Role::Unknown);
    }

    #[test]
    fn unrecognised_roles_map_to_unknown() {
        assert_eq!(Role::parse(""), Role::Unknown);
        assert_eq!(Role::parse("auditor"), Role::Unknown);
    }

    #[test]
    fn ids_match_the_api_enumeration() {
        assert_eq!(Role::SuperAdmin.id(), Some(1));
        assert_eq!(Role::CallCenterManager.id(), Some(3));
        assert_eq!(Role::Technician.id(), Some(4));
        assert_eq!(Role::Customer.id(), Some(6));
        assert_eq!(Role::FinancialController.id(), Some(7));
        assert_eq!(Role::Unknown.id(), None);
    }

    #[test]
    fn signed_out_sessions_see_nothing() {
        for role in [Role::SuperAdmin, Role::CallCenterManager, Role::Unknown] {
            assert!(!route_visible(false, role, "/home"));
        }
    }

    #[test]
    fn customers_are_denied_every_route() {
        assert!(!route_visible(true, Role::Customer, "/home"));
        assert!(!route_visible(true, Role::Customer, "/transactions"));
    }

    #[test]
    fn technicians_lose_the_admin_prefix() {
        assert!(!route_visible(true, Role::Technician, "/admin"));
        assert!(!route_visible(true, Role::Technician, "/admin/users"));
        assert!(route_visible(true, Role::Technician, "/home"));
        // Plain prefix match, so siblings that happen to share it are caught.
        assert!(!route_visible(true, Role::Technician, "/administrate"));
    }

    #[test]
    fn unknown_roles_are_permissive() {
        assert!(route_visible(true, Role::Unknown, "/home"));
        assert!(route_visible(true, Role::Unknown, "/admin"));
    }

    #[test]
    fn admin_detection_covers_both_tiers() {
        assert!(Role::SuperAdmin.is_admin());
        assert!(Role::Admin.is_admin());
        assert!(!Role::CallCenterManager.is_admin());
        assert!(!Role::Unknown.is_admin());
    }
}
