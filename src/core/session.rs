//! Explicit caller context for every mutating operation.
//!
//! There is deliberately no ambient "current user": whoever calls into the
//! core passes a [`Session`], and each operation checks the role itself
//! rather than trusting the UI to have hidden a button.

use crate::errors::{Error, Result};

/// Role of the calling user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Full access, including the executive roster
    Admin,
    /// May record money movement and approve loans/disbursements
    Treasurer,
    /// Ordinary member; read access scoped to their own records
    Member,
}

impl Role {
    /// Lowercase name used in error messages.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Treasurer => "treasurer",
            Self::Member => "member",
        }
    }
}

/// The identity and role of the caller of a core operation.
#[derive(Debug, Clone)]
pub struct Session {
    /// Username recorded as the acting party on mutations
    pub username: String,
    /// Role used for authorization checks
    pub role: Role,
    /// For member-role sessions, the member record they belong to
    pub member_id: Option<String>,
}

impl Session {
    /// Creates a session.
    #[must_use]
    pub fn new(username: impl Into<String>, role: Role, member_id: Option<String>) -> Self {
        Self {
            username: username.into(),
            role,
            member_id,
        }
    }

    /// Whether the caller holds an office with bookkeeping powers.
    #[must_use]
    pub fn is_officer(&self) -> bool {
        matches!(self.role, Role::Admin | Role::Treasurer)
    }

    /// Fails with [`Error::Unauthorized`] unless the caller is a treasurer or
    /// admin.
    pub fn require_officer(&self, action: &str) -> Result<()> {
        if self.is_officer() {
            Ok(())
        } else {
            Err(Error::Unauthorized {
                role: self.role.as_str().to_string(),
                action: action.to_string(),
            })
        }
    }

    /// Fails with [`Error::Unauthorized`] unless the caller is an admin.
    pub fn require_admin(&self, action: &str) -> Result<()> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(Error::Unauthorized {
                role: self.role.as_str().to_string(),
                action: action.to_string(),
            })
        }
    }

    /// Fails unless the caller may act on behalf of `member_id`. Officers may
    /// act for anyone; a member-role session only for its own member record.
    pub fn require_self_or_officer(&self, member_id: &str, action: &str) -> Result<()> {
        if self.is_officer() || self.member_id.as_deref() == Some(member_id) {
            Ok(())
        } else {
            Err(Error::Unauthorized {
                role: self.role.as_str().to_string(),
                action: action.to_string(),
            })
        }
    }
}
