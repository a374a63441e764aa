use maud::{Markup, html};

use crate::guard::Session;

const SIDEBAR_LINKS: [(&str, &str); 2] = [("/dashboard", "Dashboard"), ("/dashboard/account", "Account")];

pub fn app_sidebar(active: &str) -> Markup {
    html! {
        aside class="sidebar sidebar--inset" {
            a class="brand" href="/" { "My real estate" }
            nav {
                ul {
                    @for (href, label) in SIDEBAR_LINKS {
                        li {
                            a href=(href) class=[(href == active).then_some("active")] { (label) }
                        }
                    }
                }
            }
            form class="sidebar__footer" method="POST" action="/logout" {
                button class="btn btn--ghost" type="submit" { "Sign out" }
            }
        }
    }
}

pub fn site_header(title: &str, session: &Session) -> Markup {
    html! {
        header class="site-header" {
            h2 { (title) }
            span class="text-muted" { (session.email) }
        }
    }
}

/// Sidebar and inset content area used by every dashboard page.
pub fn dashboard_shell(active: &str, title: &str, session: &Session, content: Markup) -> Markup {
    html! {
        div class="sidebar-provider" {
            (app_sidebar(active))
            main class="sidebar-inset" {
                (site_header(title, session))
                div class="main" { (content) }
            }
        }
    }
}
