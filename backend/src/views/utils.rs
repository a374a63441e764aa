use maud::{DOCTYPE, Markup, html};

use crate::toast::Toast;

const FONTS_URL: &str = "https://fonts.googleapis.com/css2?family=Inter:wght@400;500;600&family=Roboto+Mono&display=swap";

pub fn default_header(page_name: &str) -> Markup {
    html! {
        head {
            meta charset="utf-8";
            meta name="viewport" content="width=device-width, initial-scale=1";
            meta name="description" content="Real Estate";
            title { (page_name) }
            link rel="preconnect" href="https://fonts.gstatic.com" crossorigin;
            link rel="stylesheet" href=(FONTS_URL);
            link rel="stylesheet" href="/public/css/app.css";
        }
    }
}

/// Outer document shared by every page, with the toaster rendered last.
pub fn root_layout(page_name: &str, toasts: &[Toast], content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" class="font-inter font-roboto-mono" {
            (default_header(page_name))
            body {
                (content)
                (toaster(toasts))
            }
        }
    }
}

pub fn toaster(toasts: &[Toast]) -> Markup {
    html! {
        div class="toaster" role="status" aria-live="polite" {
            @for toast in toasts {
                div class=(toast.kind.class()) { (toast.message) }
            }
        }
    }
}

pub fn page_not_found() -> Markup {
    root_layout(
        "Real Estate: Not found",
        &[],
        html! {
            main class="auth" {
                div class="card" {
                    h1 { "404: Page not found" }
                    a href="/" { "Back home" }
                }
            }
        },
    )
}

pub fn error_page() -> Markup {
    root_layout(
        "Real Estate: Error",
        &[],
        html! {
            main class="auth" {
                div class="card" {
                    h1 { "Something went wrong" }
                    p class="text-muted" { "Please try again in a moment." }
                }
            }
        },
    )
}
