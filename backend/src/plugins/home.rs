use axum::{Router, http::StatusCode, routing::get};
use axum_login::AuthSession;
use maud::{Markup, html};
use tower_sessions::Session;

use crate::{
    appstate::AppState,
    controller::RouteProvider,
    model::database::Database,
    toast,
    views::{navbar::external_navigation, utils::root_layout},
};

/// Public landing page.
pub struct Home;

impl RouteProvider for Home {
    fn provide_routes(router: Router<AppState>) -> Router<AppState> {
        router.route("/", get(Home::page))
    }
}

impl Home {
    pub async fn page(auth: AuthSession<Database>, session: Session) -> (StatusCode, Markup) {
        let toasts = toast::drain(&session).await;
        let signed_in = auth.user.is_some();
        let body = html! {
            (external_navigation())
            main class="hero" {
                h1 { "Find, list and manage your properties" }
                p class="text-muted" { "Everything about your real estate portfolio in one place." }
                div class="cluster" {
                    @if signed_in {
                        a class="btn btn--primary" href="/dashboard" { "Open dashboard" }
                    } @else {
                        a class="btn btn--primary" href="/signup" { "Get started" }
                        a class="btn btn--secondary" href="/login" { "Sign in" }
                    }
                }
            }
        };
        (StatusCode::OK, root_layout("Real Estate", &toasts, body))
    }
}
