//! Public-path classification for outgoing requests.
//!
//! A request is *public* when the caller forces it (the skip-auth override)
//! or when its path contains one of the known public endpoint fragments.
//! Both the request side (should a credential be attached?) and the failure
//! side (is a 401/403 a session problem?) use this same rule, computed from
//! the original request's path, so the two can never disagree.

use url::Url;

/// Path fragments that mark an endpoint as reachable without a credential.
pub const PUBLIC_PATH_HINTS: &[&str] = &[
    "/login",
    "/register",
    "/auth/login",
    "/auth/register",
    "/usuarios",
    "/cadastro",
];

/// Header the caller sets to force public classification for one request.
pub const SKIP_AUTH_HEADER: &str = "X-Skip-Auth";

/// Resolve the path component of a request target against the base URL.
///
/// Targets are normally absolute paths (`/carrinho/abc?x=1`); resolving
/// against the base strips query/fragment and tolerates targets that are
/// already full URLs.
#[must_use]
pub fn request_path(base_url: &str, target: &str) -> String {
    Url::parse(base_url)
        .ok()
        .and_then(|base| base.join(target).ok())
        .map_or_else(
            || {
                // Base did not parse; best effort on the raw target.
                target
                    .split(['?', '#'])
                    .next()
                    .unwrap_or(target)
                    .to_string()
            },
            |url| url.path().to_string(),
        )
}

/// Whether a request against `path` is public.
///
/// The override always wins; otherwise the (lowercased) path is matched
/// against [`PUBLIC_PATH_HINTS`] by substring.
#[must_use]
pub fn is_public(path: &str, skip_auth: bool) -> bool {
    if skip_auth {
        return true;
    }
    let lower = path.to_lowercase();
    PUBLIC_PATH_HINTS.iter().any(|hint| lower.contains(hint))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://localhost:3333";

    #[test]
    fn test_request_path_strips_query() {
        assert_eq!(request_path(BASE, "/carrinho?x=1"), "/carrinho");
        assert_eq!(request_path(BASE, "/produtos/abc#frag"), "/produtos/abc");
    }

    #[test]
    fn test_request_path_accepts_full_url() {
        assert_eq!(
            request_path(BASE, "http://elsewhere/login?next=1"),
            "/login"
        );
    }

    #[test]
    fn test_public_hints_match_by_substring() {
        assert!(is_public("/login", false));
        assert!(is_public("/auth/login", false));
        assert!(is_public("/api/v2/cadastro", false));
        assert!(is_public("/LOGIN", false));
        assert!(!is_public("/carrinho", false));
        assert!(!is_public("/produtos", false));
    }

    #[test]
    fn test_override_always_wins() {
        assert!(is_public("/carrinho", true));
        assert!(is_public("/produtos/abc", true));
    }
}
