//! Session context handed to listing views by the host.

use serde::{Deserialize, Serialize};

use crate::domain::types::UserId;
use crate::services::{ServiceError, ServiceResult};

/// Signed-in shopper as known to the storefront.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: UserId,
    pub name: String,
}

impl SessionUser {
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    user: Option<SessionUser>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self { user: None }
    }

    pub fn signed_in(user: SessionUser) -> Self {
        Self { user: Some(user) }
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Identity of the signed-in shopper, for session-scoped actions.
    pub fn require_user(&self) -> ServiceResult<UserId> {
        self.user.as_ref().map(|user| user.id).ok_or_else(|| {
            log::warn!("Session-scoped action attempted without a signed-in user");
            ServiceError::Unauthorized
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_session_has_no_user() {
        let session = Session::anonymous();
        assert!(!session.is_authenticated());
        assert_eq!(session.require_user(), Err(ServiceError::Unauthorized));
    }

    #[test]
    fn signed_in_session_yields_the_user_id() {
        let session = Session::signed_in(SessionUser::new(UserId::new(9).unwrap(), "Lee"));

        assert!(session.is_authenticated());
        assert_eq!(session.require_user(), Ok(UserId::new(9).unwrap()));
        assert_eq!(session.user().map(|user| user.name.as_str()), Some("Lee"));
    }
}
