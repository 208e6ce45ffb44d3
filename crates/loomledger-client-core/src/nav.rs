use serde::Serialize;

pub const NAV_LINK_SELECTOR: &str = ".nav-link, .dropdown-item";
pub const ACTIVE_CLASS: &str = "active";
pub const TOOLTIP_SELECTOR: &str = r#"[data-bs-toggle="tooltip"]"#;

/// Options handed to the page's Bootstrap `Tooltip` constructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TooltipOptions {
    pub trigger: String,
    pub boundary: String,
}

impl Default for TooltipOptions {
    fn default() -> Self {
        Self {
            trigger: "hover".to_string(),
            boundary: "viewport".to_string(),
        }
    }
}

/// A navigation link is active when its literal `href` equals the page path.
pub fn is_active_link(href: Option<&str>, current_path: &str) -> bool {
    href == Some(current_path)
}

/// `active` flag for each link in document order. Links that do not match lose
/// any `active` class the server rendered.
pub fn active_link_states<'a>(
    hrefs: impl IntoIterator<Item = Option<&'a str>>,
    current_path: &str,
) -> Vec<bool> {
    hrefs
        .into_iter()
        .map(|href| is_active_link(href, current_path))
        .collect()
}
