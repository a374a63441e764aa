use axum::{Extension, Router, http::StatusCode, routing::get};
use maud::{Markup, html};
use tower_sessions::Session as CookieSession;

use crate::{
    appstate::AppState,
    controller::RouteProvider,
    guard::Session,
    toast,
    views::{sidebar::dashboard_shell, utils::root_layout},
};

/// Pages of the signed-in area. Mounted behind the session guard, so every
/// handler can rely on a verified [`Session`] in the request extensions.
pub struct Dashboard;

impl RouteProvider for Dashboard {
    fn provide_routes(router: Router<AppState>) -> Router<AppState> {
        router
            .route("/dashboard", get(Dashboard::overview))
            .route("/dashboard/account", get(Dashboard::account))
    }
}

impl Dashboard {
    pub async fn overview(
        Extension(session): Extension<Session>,
        cookie_session: CookieSession,
    ) -> (StatusCode, Markup) {
        let toasts = toast::drain(&cookie_session).await;
        let content = html! {
            div class="stack" {
                h1 { "Dashboard" }
                p class="text-muted" { "Signed in as " (session.name) "." }
            }
        };
        (
            StatusCode::OK,
            root_layout(
                "Real Estate: Dashboard",
                &toasts,
                dashboard_shell("/dashboard", "Dashboard", &session, content),
            ),
        )
    }

    pub async fn account(
        Extension(session): Extension<Session>,
        cookie_session: CookieSession,
    ) -> (StatusCode, Markup) {
        let toasts = toast::drain(&cookie_session).await;
        let content = html! {
            div class="card stack" {
                h1 { "Account" }
                dl {
                    dt { "Name" } dd { (session.name) }
                    dt { "Email" } dd { (session.email) }
                    dt { "Member since" } dd { (session.member_since) }
                }
            }
        };
        (
            StatusCode::OK,
            root_layout(
                "Real Estate: Account",
                &toasts,
                dashboard_shell("/dashboard/account", "Account", &session, content),
            ),
        )
    }
}
