//! Identity resolution from gateway headers.
//!
//! The upstream gateway authenticates the caller and forwards
//! `x-user-id`, `x-user-role`, and `x-org-id`. Absent or unrecognised
//! values fall back to the anonymous `USER` identity, so admin-gated
//! operations fail closed with `Forbidden`.

use appcat_core::identity::{Identity, Role};
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use std::convert::Infallible;

const DEFAULT_USER_ID: &str = "anonymous";
const DEFAULT_ORG_ID: &str = "unaffiliated";

/// Build an [`Identity`] from gateway headers.
#[must_use]
pub fn resolve_identity(headers: &HeaderMap) -> Identity {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    };

    let role = header("x-user-role")
        .and_then(|r| r.parse::<Role>().ok())
        .unwrap_or(Role::User);

    Identity {
        user_id: header("x-user-id").unwrap_or_else(|| DEFAULT_USER_ID.to_owned()),
        role,
        organization_id: header("x-org-id").unwrap_or_else(|| DEFAULT_ORG_ID.to_owned()),
    }
}

/// Extractor wrapper so handlers can take the caller identity directly.
#[derive(Debug, Clone)]
pub struct Caller(pub Identity);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(resolve_identity(&parts.headers)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(entries: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in entries {
            map.insert(*name, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn resolves_all_headers() {
        let id = resolve_identity(&headers(&[
            ("x-user-id", "u-1"),
            ("x-user-role", "ORG_ADMIN"),
            ("x-org-id", "org-1"),
        ]));
        assert_eq!(id.user_id, "u-1");
        assert_eq!(id.role, Role::OrgAdmin);
        assert_eq!(id.organization_id, "org-1");
    }

    #[test]
    fn missing_headers_default_to_anonymous_user() {
        let id = resolve_identity(&HeaderMap::new());
        assert_eq!(id.user_id, "anonymous");
        assert_eq!(id.role, Role::User);
        assert_eq!(id.organization_id, "unaffiliated");
    }

    #[test]
    fn unknown_role_falls_back_to_user() {
        let id = resolve_identity(&headers(&[("x-user-role", "SUPERUSER")]));
        assert_eq!(id.role, Role::User);
    }
}
