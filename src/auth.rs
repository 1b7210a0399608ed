//! Staff roles and the capability checks derived from them.
//!
//! Identity and session validation happen outside this service; requests
//! arrive carrying an already-authenticated actor id plus a role. This module
//! keeps the role set closed and expresses authorization as capability
//! methods instead of numeric role comparisons.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    SuperAdmin,
    BranchAdmin,
    Manager,
    Pharmacist,
    Cashier,
}

impl StaffRole {
    pub fn is_cashier(&self) -> bool {
        matches!(self, StaffRole::Cashier)
    }

    /// Elevated roles that may quick-approve price override requests.
    pub fn can_quick_approve(&self) -> bool {
        matches!(self, StaffRole::SuperAdmin | StaffRole::BranchAdmin)
    }

    /// Roles allowed to edit pricing controls and the discount catalog.
    pub fn can_manage_pricing(&self) -> bool {
        matches!(
            self,
            StaffRole::SuperAdmin | StaffRole::BranchAdmin | StaffRole::Manager
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StaffRole::SuperAdmin => "super_admin",
            StaffRole::BranchAdmin => "branch_admin",
            StaffRole::Manager => "manager",
            StaffRole::Pharmacist => "pharmacist",
            StaffRole::Cashier => "cashier",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_admins_quick_approve() {
        assert!(StaffRole::SuperAdmin.can_quick_approve());
        assert!(StaffRole::BranchAdmin.can_quick_approve());
        assert!(!StaffRole::Manager.can_quick_approve());
        assert!(!StaffRole::Pharmacist.can_quick_approve());
        assert!(!StaffRole::Cashier.can_quick_approve());
    }

    #[test]
    fn cashier_flag() {
        assert!(StaffRole::Cashier.is_cashier());
        assert!(!StaffRole::Manager.is_cashier());
    }
}
