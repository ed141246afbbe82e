//! Route guard decisions derived from the auth status.

use crate::auth::AuthStatus;

/// Landing route for signed-out operators.
pub const LOGIN_ROUTE: &str = "/auth/login";
/// Landing route for signed-in operators.
pub const HOME_ROUTE: &str = "/";

/// Which side of the guard a route sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteArea {
    /// Requires an authenticated user.
    Private,
    /// Login and similar pages, only for signed-out operators.
    Auth,
}

/// What the view should do for a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Session state is still resolving.
    ShowLoader,
    /// Navigate elsewhere.
    Redirect(&'static str),
    /// Render the requested route.
    Render,
}

/// Decide how to handle a route in `area` given the current auth status.
#[must_use]
pub const fn decide_route(status: &AuthStatus, area: RouteArea) -> RouteDecision {
    if status.is_pending() {
        return RouteDecision::ShowLoader;
    }
    let signed_in = status.user().is_some();
    match (area, signed_in) {
        (RouteArea::Private, false) => RouteDecision::Redirect(LOGIN_ROUTE),
        (RouteArea::Auth, true) => RouteDecision::Redirect(HOME_ROUTE),
        _ => RouteDecision::Render,
    }
}

/// Classify a path. Everything under `/auth/` is the auth area.
#[must_use]
pub fn area_for_path(path: &str) -> RouteArea {
    if path == "/auth" || path.starts_with("/auth/") {
        RouteArea::Auth
    } else {
        RouteArea::Private
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amc_api_models::CurrentUser;

    fn signed_in() -> AuthStatus {
        AuthStatus::Authenticated(CurrentUser {
            name: Some("Admin".to_string()),
            ..CurrentUser::default()
        })
    }

    #[test]
    fn pending_states_show_loader() {
        for status in [AuthStatus::Unknown, AuthStatus::Authenticating] {
            assert_eq!(
                decide_route(&status, RouteArea::Private),
                RouteDecision::ShowLoader
            );
            assert_eq!(
                decide_route(&status, RouteArea::Auth),
                RouteDecision::ShowLoader
            );
        }
    }

    #[test]
    fn private_routes_require_a_user() {
        let signed_out = AuthStatus::Unauthenticated { error: None };
        assert_eq!(
            decide_route(&signed_out, RouteArea::Private),
            RouteDecision::Redirect(LOGIN_ROUTE)
        );
        assert_eq!(
            decide_route(&signed_in(), RouteArea::Private),
            RouteDecision::Render
        );
    }

    #[test]
    fn auth_routes_bounce_signed_in_users_home() {
        assert_eq!(
            decide_route(&signed_in(), RouteArea::Auth),
            RouteDecision::Redirect(HOME_ROUTE)
        );
        let failed = AuthStatus::Unauthenticated {
            error: Some("Invalid credentials".to_string()),
        };
        assert_eq!(decide_route(&failed, RouteArea::Auth), RouteDecision::Render);
    }

    #[test]
    fn paths_map_to_areas() {
        assert_eq!(area_for_path("/auth/login"), RouteArea::Auth);
        assert_eq!(area_for_path("/clients/4"), RouteArea::Private);
        assert_eq!(area_for_path("/authors"), RouteArea::Private);
    }
}
