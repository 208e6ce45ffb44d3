#![allow(clippy::needless_pass_by_value)]

#[cfg(any(target_arch = "wasm32", test))]
mod console_sink;
#[cfg(target_arch = "wasm32")]
mod wasm_constants;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::cell::RefCell;
    use std::rc::Rc;

    use loomledger_client_core::config::{ClientConfig, ConfigError, DEFAULT_LOG_FILTER};
    use loomledger_client_core::confirm::{
        ConfirmButtonView, ConfirmContent, ConfirmDialog, ConfirmFailure, ConfirmOptions,
        ConfirmOutcome, ConfirmPhase, is_dismiss_key,
    };
    use loomledger_client_core::error::ApiError;
    use loomledger_client_core::http::{
        ApiClient, HttpMethod, HttpRequest, HttpResponse, HttpTransport,
    };
    use loomledger_client_core::nav::{
        ACTIVE_CLASS, NAV_LINK_SELECTOR, TOOLTIP_SELECTOR, TooltipOptions, active_link_states,
    };
    use loomledger_client_core::notifications::{
        NO_NOTIFICATIONS_TEXT, Notification, NotificationBadge, PollGate, fetch_notifications,
        run_poll_loop,
    };
    use loomledger_client_core::preferences::{
        MobileSidebarView, OVERLAY_ACTIVE_CLASS, SIDEBAR_COLLAPSED_CLASS,
        SIDEBAR_MOBILE_OPEN_CLASS, SidebarState, THEME_ATTRIBUTE, Theme, UiPreferences,
    };
    use loomledger_client_core::search::{
        NO_RESULTS_TEXT, PANEL_HIDDEN_CLASS, SearchInput, SearchPanel, SearchPolicy,
        SearchSession, SearchTicket, search_after_quiet,
    };
    use loomledger_client_core::session::{Navigator, SessionStore};
    use loomledger_client_core::storage::{KeyValueStore, StorageError};
    use loomledger_client_core::toast::{
        TOAST_AUTO_HIDE, TOAST_CONTAINER_CLASS, TOAST_CONTAINER_Z_INDEX, TOAST_FADE, ToastKind,
        ToastSpec,
    };
    use serde::Serialize;
    use serde_json::Value;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::{JsFuture, spawn_local};
    use web_sys::{Element, HtmlButtonElement, HtmlElement, HtmlInputElement};

    use crate::wasm_constants::*;

    mod chrome;
    mod confirm;
    mod dom;
    mod logging;
    mod network;
    mod notifications;
    mod platform;
    mod search;
    mod services;
    mod toast;

    use chrome::*;
    use confirm::*;
    use dom::*;
    use logging::init_logging;
    use network::*;
    use notifications::*;
    use platform::*;
    use search::install_search;
    use services::*;
    use toast::ToastHost;

    thread_local! {
        static SERVICES: RefCell<Option<Rc<UiServices>>> = const { RefCell::new(None) };
        static PAGE_HANDLERS: RefCell<Vec<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(Vec::new()) };
        static CONFIRM_CLICK_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(None) };
    }

    #[wasm_bindgen(start)]
    pub fn start() {
        console_error_panic_hook::set_once();
        let (config, config_error) = match ClientConfig::from_lookup(host_global) {
            Ok(config) => (config, None),
            Err(error) => (ClientConfig::default(), Some(error)),
        };
        init_logging(&config.log_filter);
        if let Some(error) = config_error {
            report_config_error(&error);
        }
        tracing::info!(api_url = %config.api_url, "starting dashboard page runtime");

        let services = UiServices::new(config);
        install_services(Rc::clone(&services));
        if let Err(error) = when_dom_ready(move || boot(&services)) {
            tracing::error!(%error, "failed to schedule page wiring");
        }
    }

    fn report_config_error(error: &ConfigError) {
        tracing::warn!(%error, "invalid host configuration, using defaults");
    }

    fn boot(services: &Rc<UiServices>) {
        run_step("sidebar", install_sidebar(services));
        run_step("theme", install_theme(services));
        run_step("search", install_search(services));
        run_step("navigation", highlight_active_nav());
        run_step("tooltips", init_tooltips());
        run_step("notifications", install_notifications(services));
        tracing::debug!("page wiring complete");
    }

    fn run_step(step: &str, result: Result<(), String>) {
        if let Err(error) = result {
            tracing::error!(step, %error, "page wiring step failed");
        }
    }

    #[wasm_bindgen]
    pub fn set_token(token: String) -> Result<(), JsValue> {
        let services = current_services()?;
        services
            .session()
            .set_token(&token)
            .map_err(|error| JsValue::from_str(&error.to_string()))
    }

    #[wasm_bindgen]
    pub fn get_token() -> Option<String> {
        current_services().ok()?.session().token()
    }

    #[wasm_bindgen]
    pub fn remove_token() -> Result<(), JsValue> {
        let services = current_services()?;
        services
            .session()
            .remove_token()
            .map_err(|error| JsValue::from_str(&error.to_string()))
    }

    #[wasm_bindgen]
    pub fn is_authenticated() -> bool {
        current_services().is_ok_and(|services| services.session().is_authenticated())
    }

    #[wasm_bindgen]
    pub fn logout() {
        match current_services() {
            Ok(services) => services.logout(),
            Err(_) => tracing::warn!("logout requested before the page runtime started"),
        }
    }

    #[wasm_bindgen]
    pub fn show_toast(message: JsValue, kind: Option<String>) -> Result<(), JsValue> {
        let services = current_services()?;
        let kind = match kind.as_deref() {
            None => ToastKind::default(),
            Some(raw) => ToastKind::parse(raw).unwrap_or_else(|| {
                tracing::debug!(kind = raw, "unknown toast kind, using info");
                ToastKind::default()
            }),
        };
        let spec = ToastSpec::new(&message_value(&message), kind);
        services.toasts.show(&spec).map_err(|error| JsValue::from_str(&error))
    }

    #[wasm_bindgen]
    pub fn confirm_delete(options: JsValue) -> Result<(), JsValue> {
        let services = current_services()?;
        let (options, on_confirm) = read_confirm_options(&options)?;
        open_confirm(&services, options, on_confirm).map_err(|error| JsValue::from_str(&error))
    }

    /// Authenticated API call for page scripts. Resolves with the decoded JSON
    /// body and rejects with an error carrying `response.status` and
    /// `response.data.detail`.
    #[wasm_bindgen]
    pub fn api_request(method: String, path: String, body: JsValue) -> js_sys::Promise {
        wasm_bindgen_futures::future_to_promise(async move {
            let services = current_services()?;
            let method = HttpMethod::parse(&method).ok_or_else(|| {
                JsValue::from(js_sys::Error::new(&format!("unsupported method '{method}'")))
            })?;
            let body = if body.is_undefined() || body.is_null() {
                None
            } else {
                Some(js_to_json(&body).ok_or_else(|| {
                    JsValue::from(js_sys::Error::new("request body is not JSON-serializable"))
                })?)
            };
            let value = services
                .api
                .request_json(method, &path, body.as_ref())
                .await
                .map_err(|error| api_error_to_js(&error))?;
            Ok(json_to_js(&value))
        })
    }

    #[wasm_bindgen]
    pub fn toggle_sidebar(force: Option<bool>) -> Result<bool, JsValue> {
        let services = current_services()?;
        Ok(apply_sidebar_toggle(&services, &SidebarView::bind(), force))
    }

    #[wasm_bindgen]
    pub fn stop_notifications() {
        if let Ok(services) = current_services() {
            services.poller.stop();
        }
    }

    #[wasm_bindgen]
    pub fn ui_state_json() -> String {
        let Ok(services) = current_services() else {
            return "{\"phase\":\"booting\"}".to_string();
        };
        serde_json::to_string(&UiStateSnapshot::capture(&services))
            .unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::ui_state_json;

#[cfg(not(target_arch = "wasm32"))]
pub fn ui_state_json() -> String {
    "{\"phase\":\"native\",\"detail\":\"page runtime state only available on wasm\"}".to_string()
}
