//! Ownership and role authorization, extracted into one reusable policy
//! instead of being re-implemented per controller.

use crate::models::Role;

/// Relation a requester must hold toward a resource for an action to be
/// permitted.
///
/// `Author`/`SelfOnly` reject everyone but the owner, admins included:
/// content edits and profile changes have no admin override. The `*OrAdmin`
/// relations add the admin escape hatch used by delete operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Author,
    AuthorOrAdmin,
    SelfOnly,
    SelfOrAdmin,
}

/// Decide whether a requester may act on a resource owned by `owner_id`.
///
/// `requester_role` must come from the persisted user record at the time of
/// the call, never from a token payload: tokens are not revocable and role
/// can change after issuance.
pub fn permits(relation: Relation, requester_id: i32, requester_role: Role, owner_id: i32) -> bool {
    let is_owner = requester_id == owner_id;
    match relation {
        Relation::Author | Relation::SelfOnly => is_owner,
        Relation::AuthorOrAdmin | Relation::SelfOrAdmin => {
            is_owner || matches!(requester_role, Role::Admin)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn author_relation_ignores_role() {
        assert!(permits(Relation::Author, 1, Role::User, 1));
        assert!(!permits(Relation::Author, 2, Role::User, 1));
        // Admins get no override on edits.
        assert!(!permits(Relation::Author, 2, Role::Admin, 1));
    }

    #[test]
    fn author_or_admin_allows_either() {
        assert!(permits(Relation::AuthorOrAdmin, 1, Role::User, 1));
        assert!(permits(Relation::AuthorOrAdmin, 2, Role::Admin, 1));
        assert!(!permits(Relation::AuthorOrAdmin, 2, Role::User, 1));
    }

    #[test]
    fn self_only_has_no_admin_override() {
        assert!(permits(Relation::SelfOnly, 5, Role::User, 5));
        assert!(!permits(Relation::SelfOnly, 6, Role::Admin, 5));
    }

    #[test]
    fn self_or_admin_allows_admin_to_act_on_others() {
        assert!(permits(Relation::SelfOrAdmin, 5, Role::User, 5));
        assert!(permits(Relation::SelfOrAdmin, 6, Role::Admin, 5));
        assert!(!permits(Relation::SelfOrAdmin, 6, Role::User, 5));
    }
}
