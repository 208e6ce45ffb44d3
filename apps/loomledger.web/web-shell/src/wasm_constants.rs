pub(crate) const SIDEBAR_ID: &str = "sidebar";
pub(crate) const SIDEBAR_TOGGLE_ID: &str = "sidebarToggle";
pub(crate) const SIDEBAR_TOGGLE_MOBILE_ID: &str = "sidebarToggleMobile";
pub(crate) const SIDEBAR_OVERLAY_ID: &str = "sidebarOverlay";
pub(crate) const SIDEBAR_CLOSE_MOBILE_ID: &str = "sidebarCloseMobile";
pub(crate) const THEME_TOGGLE_ID: &str = "themeToggle";
pub(crate) const THEME_ICON_ID: &str = "themeIcon";
pub(crate) const GLOBAL_SEARCH_ID: &str = "globalSearch";
pub(crate) const SEARCH_RESULTS_ID: &str = "searchResults";
pub(crate) const NOTIFICATIONS_LIST_SELECTOR: &str = ".notifications-list";
pub(crate) const NOTIFICATION_COUNT_ID: &str = "notificationCount";
pub(crate) const TOAST_CONTAINER_ID: &str = "toastContainer";
pub(crate) const CONFIRM_MODAL_ID: &str = "globalConfirmDeleteModal";
pub(crate) const CONFIRM_BACKDROP_ID: &str = "globalConfirmDeleteBackdrop";
pub(crate) const CONFIRM_BUTTON_SELECTOR: &str = ".confirm-btn";
pub(crate) const MODAL_OPEN_BODY_CLASS: &str = "modal-open";
pub(crate) const SEARCH_ROW_CLASS: &str =
    "dropdown-item py-2 d-flex justify-content-between align-items-center";
pub(crate) const SEARCH_BADGE_CLASS: &str = "badge bg-light text-muted fw-normal";
pub(crate) const SEARCH_EMPTY_CLASS: &str = "px-3 py-2 smaller text-muted";
pub(crate) const NOTIFICATION_ENTRY_CLASS: &str = "p-3 border-bottom last-child-no-border";
pub(crate) const NOTIFICATION_HEADER_CLASS: &str =
    "d-flex justify-content-between align-items-start mb-1";
pub(crate) const NOTIFICATION_EMPTY_CLASS: &str = "p-3 text-center text-muted smaller";
