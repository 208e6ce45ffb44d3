use serde::{Deserialize, Serialize};

use crate::storage::{KeyValueStore, SIDEBAR_COLLAPSED_KEY, StorageError, THEME_KEY};

pub const THEME_ATTRIBUTE: &str = "data-theme";
pub const SIDEBAR_COLLAPSED_CLASS: &str = "collapsed";
pub const SIDEBAR_MOBILE_OPEN_CLASS: &str = "mobile-open";
pub const OVERLAY_ACTIVE_CLASS: &str = "active";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Stored or attribute value; anything unrecognised is the light default.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("dark") => Self::Dark,
            _ => Self::Light,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Icon offered for switching away from this theme.
    pub fn icon_class(self) -> &'static str {
        match self {
            Self::Light => "bi bi-moon fs-5",
            Self::Dark => "bi bi-sun fs-5",
        }
    }
}

/// Persisted UI flags. Each flag is read once at startup and written on every
/// change.
#[derive(Debug, Clone, Default)]
pub struct UiPreferences<S> {
    store: S,
}

impl<S: KeyValueStore> UiPreferences<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn sidebar_collapsed(&self) -> bool {
        match self.store.get(SIDEBAR_COLLAPSED_KEY) {
            Ok(value) => value.as_deref() == Some("true"),
            Err(error) => {
                tracing::warn!(%error, "failed to read sidebar preference");
                false
            }
        }
    }

    pub fn persist_sidebar_collapsed(&self, collapsed: bool) -> Result<(), StorageError> {
        self.store
            .set(SIDEBAR_COLLAPSED_KEY, if collapsed { "true" } else { "false" })
    }

    pub fn theme(&self) -> Theme {
        match self.store.get(THEME_KEY) {
            Ok(value) => Theme::parse(value.as_deref()),
            Err(error) => {
                tracing::warn!(%error, "failed to read theme preference");
                Theme::default()
            }
        }
    }

    pub fn persist_theme(&self, theme: Theme) -> Result<(), StorageError> {
        self.store.set(THEME_KEY, theme.as_str())
    }
}

/// Desktop collapse flag plus the transient mobile overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SidebarState {
    pub collapsed: bool,
    pub mobile_open: bool,
}

impl SidebarState {
    pub fn restored(collapsed: bool) -> Self {
        Self {
            collapsed,
            mobile_open: false,
        }
    }

    /// Takes the collapse flag from the rendered sidebar, which may carry a
    /// server-rendered `collapsed` class the stored flag does not know about.
    pub fn adopt_rendered(&mut self, collapsed: bool) {
        self.collapsed = collapsed;
    }

    /// Flips the collapse flag, or forces it when `force` is given. Returns the
    /// new value, which the caller reflects onto the DOM and persists.
    pub fn toggle(&mut self, force: Option<bool>) -> bool {
        self.collapsed = force.unwrap_or(!self.collapsed);
        self.collapsed
    }

    pub fn open_mobile(&mut self) -> MobileSidebarView {
        self.mobile_open = true;
        self.mobile_view()
    }

    pub fn close_mobile(&mut self) -> MobileSidebarView {
        self.mobile_open = false;
        self.mobile_view()
    }

    pub fn mobile_view(&self) -> MobileSidebarView {
        MobileSidebarView {
            open: self.mobile_open,
            body_overflow: if self.mobile_open { "hidden" } else { "" },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MobileSidebarView {
    /// Drives both `mobile-open` on the sidebar and `active` on the overlay.
    pub open: bool,
    pub body_overflow: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn theme_defaults_to_light_when_unset_or_unknown() {
        let prefs = UiPreferences::new(MemoryStore::default());
        assert_eq!(prefs.theme(), Theme::Light);

        let prefs = UiPreferences::new(MemoryStore::with_entries([(THEME_KEY, "sepia")]));
        assert_eq!(prefs.theme(), Theme::Light);
    }

    #[test]
    fn toggling_theme_twice_restores_value_and_icon() {
        let prefs = UiPreferences::new(MemoryStore::with_entries([(THEME_KEY, "dark")]));
        let original = prefs.theme();

        let once = original.toggled();
        prefs.persist_theme(once).expect("persist");
        assert_eq!(prefs.theme(), Theme::Light);
        assert_eq!(once.icon_class(), "bi bi-moon fs-5");

        let twice = prefs.theme().toggled();
        prefs.persist_theme(twice).expect("persist");
        assert_eq!(prefs.theme(), original);
        assert_eq!(twice.icon_class(), "bi bi-sun fs-5");
    }

    #[test]
    fn theme_parse_follows_root_attribute() {
        assert_eq!(Theme::parse(Some("dark")).toggled(), Theme::Light);
        assert_eq!(Theme::parse(None).toggled(), Theme::Dark);
        assert_eq!(Theme::parse(Some("")).toggled(), Theme::Dark);
    }

    #[test]
    fn sidebar_restores_only_from_literal_true() {
        let prefs = UiPreferences::new(MemoryStore::with_entries([(SIDEBAR_COLLAPSED_KEY, "true")]));
        assert!(prefs.sidebar_collapsed());

        let prefs = UiPreferences::new(MemoryStore::with_entries([(SIDEBAR_COLLAPSED_KEY, "1")]));
        assert!(!prefs.sidebar_collapsed());
    }

    #[test]
    fn toggle_follows_server_rendered_collapse() {
        let prefs = UiPreferences::new(MemoryStore::default());
        let mut sidebar = SidebarState::restored(prefs.sidebar_collapsed());
        assert!(!sidebar.collapsed);

        sidebar.adopt_rendered(true);
        assert!(!sidebar.toggle(None));
        prefs.persist_sidebar_collapsed(sidebar.collapsed).expect("persist");
        assert!(!prefs.sidebar_collapsed());
    }

    #[test]
    fn sidebar_toggle_and_force() {
        let prefs = UiPreferences::new(MemoryStore::default());
        let mut sidebar = SidebarState::restored(prefs.sidebar_collapsed());

        assert!(sidebar.toggle(None));
        prefs.persist_sidebar_collapsed(sidebar.collapsed).expect("persist");
        assert!(prefs.sidebar_collapsed());

        assert!(sidebar.toggle(Some(true)));
        assert!(!sidebar.toggle(Some(false)));
        prefs.persist_sidebar_collapsed(sidebar.collapsed).expect("persist");
        assert!(!prefs.sidebar_collapsed());
    }

    #[test]
    fn mobile_sidebar_locks_body_scroll_while_open() {
        let mut sidebar = SidebarState::default();
        let open = sidebar.open_mobile();
        assert!(open.open);
        assert_eq!(open.body_overflow, "hidden");

        let closed = sidebar.close_mobile();
        assert!(!closed.open);
        assert_eq!(closed.body_overflow, "");
        assert!(!sidebar.collapsed);
    }
}
