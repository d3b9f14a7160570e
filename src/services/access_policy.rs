//! Access policy - decides whether a caller may perform an operation.

use super::identity_service::Claims;
use crate::errors::{AppError, AppResult};

/// Requirement attached to an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessRule {
    /// Anyone, with or without a token
    Public,
    /// Any verified identity
    Authenticated,
    /// Verified identity with the admin role
    AdminOnly,
}

/// Check `claims` against `rule`.
///
/// Missing claims fail with `Unauthorized`; claims with an insufficient
/// role fail with `Forbidden`. The two are never merged.
pub fn require(claims: Option<&Claims>, rule: AccessRule) -> AppResult<Option<&Claims>> {
    match (rule, claims) {
        (AccessRule::Public, claims) => Ok(claims),
        (_, None) => Err(AppError::Unauthorized),
        (AccessRule::Authenticated, Some(claims)) => Ok(Some(claims)),
        (AccessRule::AdminOnly, Some(claims)) if claims.is_admin() => Ok(Some(claims)),
        (AccessRule::AdminOnly, Some(_)) => Err(AppError::Forbidden),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;
    use crate::errors::ErrorKind;
    use uuid::Uuid;

    fn claims(role: UserRole) -> Claims {
        Claims {
            sub: Uuid::new_v4(),
            username: "bob".to_string(),
            email: "bob@example.com".to_string(),
            role,
            iat: 0,
            exp: 0,
        }
    }

    #[test]
    fn test_public_allows_anonymous() {
        assert!(require(None, AccessRule::Public).unwrap().is_none());
        let user = claims(UserRole::User);
        assert_eq!(require(Some(&user), AccessRule::Public).unwrap(), Some(&user));
    }

    #[test]
    fn test_authenticated_requires_claims() {
        let err = require(None, AccessRule::Authenticated).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthenticated);

        let user = claims(UserRole::User);
        assert!(require(Some(&user), AccessRule::Authenticated).is_ok());
    }

    #[test]
    fn test_admin_only_distinguishes_unauthenticated_from_forbidden() {
        assert!(matches!(
            require(None, AccessRule::AdminOnly),
            Err(AppError::Unauthorized)
        ));

        let user = claims(UserRole::User);
        let err = require(Some(&user), AccessRule::AdminOnly).unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        let admin = claims(UserRole::Admin);
        assert!(require(Some(&admin), AccessRule::AdminOnly).is_ok());
    }
}
