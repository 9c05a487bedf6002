//! Authorization policy.
//!
//! Every write is checked with [`authorize`], a pure lookup over a static
//! role table:
//!
//! | Role        | Catalog    | Reviews / comments               | Accounts          |
//! |-------------|------------|----------------------------------|-------------------|
//! | `user`      | read       | read, create, update/delete own  | read/update own   |
//! | `moderator` | read       | read, create, update/delete any  | read/update own   |
//! | `admin`     | everything | everything                       | everything        |
//!
//! Reads of the catalog, reviews and comments are public; callers serving
//! anonymous requests skip the check entirely.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::roles::Role;
use crate::types::DbId;

/// The authenticated caller, as supplied by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: DbId,
    pub role: Role,
}

impl Principal {
    pub fn new(user_id: DbId, role: Role) -> Self {
        Self { user_id, role }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Read => "read",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        })
    }
}

/// What an action targets. Instance variants carry the owner used for
/// "own content" checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// Categories, genres and titles.
    Catalog,
    /// The review collection of a title (creating a review).
    Reviews,
    Review { author_id: DbId },
    /// The comment collection of a review (creating a comment).
    Comments,
    Comment { author_id: DbId },
    /// The user directory (listing and creating accounts).
    Users,
    Account { user_id: DbId },
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Resource::Catalog => "catalog entries",
            Resource::Reviews | Resource::Review { .. } => "reviews",
            Resource::Comments | Resource::Comment { .. } => "comments",
            Resource::Users => "users",
            Resource::Account { .. } => "this account",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        self == Decision::Allow
    }
}

impl From<bool> for Decision {
    fn from(allowed: bool) -> Self {
        if allowed {
            Decision::Allow
        } else {
            Decision::Deny
        }
    }
}

/// Evaluate the role table for `principal` performing `action` on `resource`.
pub fn authorize(principal: &Principal, action: Action, resource: Resource) -> Decision {
    let role = principal.role;

    let allowed = match resource {
        Resource::Catalog => action == Action::Read || role.is_admin(),
        Resource::Reviews | Resource::Comments => {
            matches!(action, Action::Read | Action::Create) || role.is_admin()
        }
        Resource::Review { author_id } | Resource::Comment { author_id } => {
            action == Action::Read
                || author_id == principal.user_id
                || role.is_moderator()
                || role.is_admin()
        }
        Resource::Users => role.is_admin(),
        Resource::Account { user_id } => {
            role.is_admin()
                || (user_id == principal.user_id && matches!(action, Action::Read | Action::Update))
        }
    };

    Decision::from(allowed)
}

/// Like [`authorize`], but turns a denial into [`CoreError::Forbidden`].
pub fn ensure(principal: &Principal, action: Action, resource: Resource) -> Result<(), CoreError> {
    if authorize(principal, action, resource).is_allowed() {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "Role '{}' may not {action} {resource}",
            principal.role
        )))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    const ALL_ACTIONS: [Action; 4] = [Action::Read, Action::Create, Action::Update, Action::Delete];

    fn user(id: DbId) -> Principal {
        Principal::new(id, Role::User)
    }

    fn moderator(id: DbId) -> Principal {
        Principal::new(id, Role::Moderator)
    }

    fn admin(id: DbId) -> Principal {
        Principal::new(id, Role::Admin)
    }

    #[test]
    fn test_catalog_is_read_only_below_admin() {
        for principal in [user(1), moderator(2)] {
            assert!(authorize(&principal, Action::Read, Resource::Catalog).is_allowed());
            for action in [Action::Create, Action::Update, Action::Delete] {
                assert_eq!(authorize(&principal, action, Resource::Catalog), Decision::Deny);
            }
        }
        for action in ALL_ACTIONS {
            assert!(authorize(&admin(3), action, Resource::Catalog).is_allowed());
        }
    }

    #[test]
    fn test_any_role_can_create_reviews_and_comments() {
        for principal in [user(1), moderator(2), admin(3)] {
            assert!(authorize(&principal, Action::Create, Resource::Reviews).is_allowed());
            assert!(authorize(&principal, Action::Create, Resource::Comments).is_allowed());
        }
    }

    #[test]
    fn test_user_writes_only_own_content() {
        let own = Resource::Review { author_id: 1 };
        let other = Resource::Review { author_id: 2 };

        assert!(authorize(&user(1), Action::Update, own).is_allowed());
        assert!(authorize(&user(1), Action::Delete, own).is_allowed());
        assert!(authorize(&user(1), Action::Read, other).is_allowed());
        assert_eq!(authorize(&user(1), Action::Update, other), Decision::Deny);
        assert_eq!(
            authorize(&user(1), Action::Delete, Resource::Comment { author_id: 2 }),
            Decision::Deny
        );
    }

    #[test]
    fn test_moderator_and_admin_write_any_content() {
        let foreign_review = Resource::Review { author_id: 99 };
        let foreign_comment = Resource::Comment { author_id: 99 };
        for principal in [moderator(2), admin(3)] {
            for resource in [foreign_review, foreign_comment] {
                assert!(authorize(&principal, Action::Update, resource).is_allowed());
                assert!(authorize(&principal, Action::Delete, resource).is_allowed());
            }
        }
    }

    #[test]
    fn test_user_directory_is_admin_only() {
        for action in ALL_ACTIONS {
            assert_eq!(authorize(&user(1), action, Resource::Users), Decision::Deny);
            assert_eq!(authorize(&moderator(2), action, Resource::Users), Decision::Deny);
            assert!(authorize(&admin(3), action, Resource::Users).is_allowed());
        }
    }

    #[test]
    fn test_own_account_can_be_read_and_updated_but_not_deleted() {
        let own = Resource::Account { user_id: 1 };
        assert!(authorize(&user(1), Action::Read, own).is_allowed());
        assert!(authorize(&user(1), Action::Update, own).is_allowed());
        assert_eq!(authorize(&user(1), Action::Delete, own), Decision::Deny);
        assert_eq!(
            authorize(&moderator(2), Action::Read, Resource::Account { user_id: 1 }),
            Decision::Deny
        );
        assert!(authorize(&admin(3), Action::Delete, own).is_allowed());
    }

    #[test]
    fn test_ensure_reports_forbidden() {
        let result = ensure(&user(1), Action::Delete, Resource::Catalog);
        assert_matches!(result, Err(CoreError::Forbidden(msg)) if msg.contains("'user' may not delete"));
        assert!(ensure(&admin(1), Action::Delete, Resource::Catalog).is_ok());
    }
}
