use maud::{Markup, html};

/// Public marketing navigation.
pub fn external_navigation() -> Markup {
    html! {
        header class="site-nav" {
            a class="brand" href="/" { "My real estate" }
            nav class="site-nav__links" {
                a href="#" { "Properties" }
                a href="#" { "Listings" }
                a href="#" { "Agents" }
                a href="/dashboard" { "Dashboard" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn links_to_the_dashboard() {
        let nav = external_navigation().into_string();
        assert!(nav.contains("My real estate"));
        for label in ["Properties", "Listings", "Agents"] {
            assert!(nav.contains(label));
        }
        assert!(nav.contains(r#"href="/dashboard""#));
    }
}
