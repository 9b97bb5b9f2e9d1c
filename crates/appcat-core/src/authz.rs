//! Single authorization table for role-gated workflow operations.

use crate::identity::Role;

/// A role-gated operation on the app-request workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Submit a new app request.
    SubmitRequest,
    /// List app requests across the organization.
    ListRequests,
    /// Approve a pending request.
    ApproveRequest,
    /// Reject a pending request.
    RejectRequest,
}

/// Whether `role` may perform `op`. Every role check in the service goes
/// through this table.
#[must_use]
pub fn allows(op: Operation, role: Role) -> bool {
    match op {
        Operation::SubmitRequest => role == Role::User,
        Operation::ListRequests | Operation::ApproveRequest | Operation::RejectRequest => {
            matches!(role, Role::OrgAdmin | Role::ProductAdmin)
        }
    }
}
