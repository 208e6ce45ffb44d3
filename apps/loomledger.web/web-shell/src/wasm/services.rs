use super::*;

/// Everything the page components share, built once at start-up.
pub(super) struct UiServices {
    pub(super) config: ClientConfig,
    pub(super) api: DashboardClient,
    pub(super) preferences: UiPreferences<LocalStorageStore>,
    pub(super) sidebar: RefCell<SidebarState>,
    pub(super) search_policy: SearchPolicy,
    pub(super) toasts: ToastHost,
    pub(super) confirm: RefCell<ConfirmDialog>,
    pub(super) poller: PollGate,
}

impl UiServices {
    pub(super) fn new(config: ClientConfig) -> Rc<Self> {
        let preferences = UiPreferences::new(LocalStorageStore);
        let sidebar = SidebarState::restored(preferences.sidebar_collapsed());
        let api = ApiClient::new(
            config.api_url.clone(),
            GlooTransport,
            SessionStore::new(LocalStorageStore),
            LocationNavigator,
        );
        Rc::new(Self {
            config,
            api,
            preferences,
            sidebar: RefCell::new(sidebar),
            search_policy: SearchPolicy::default(),
            toasts: ToastHost,
            confirm: RefCell::new(ConfirmDialog::default()),
            poller: PollGate::default(),
        })
    }

    pub(super) fn session(&self) -> &SessionStore<LocalStorageStore> {
        self.api.session()
    }

    pub(super) fn logout(&self) {
        self.api.logout();
    }
}

pub(super) fn install_services(services: Rc<UiServices>) {
    SERVICES.with(|slot| *slot.borrow_mut() = Some(services));
}

pub(super) fn current_services() -> Result<Rc<UiServices>, JsValue> {
    SERVICES
        .with(|slot| slot.borrow().clone())
        .ok_or_else(|| JsValue::from_str("page runtime has not started"))
}

#[derive(Serialize)]
pub(super) struct UiStateSnapshot {
    api_url: String,
    authenticated: bool,
    sidebar: SidebarState,
    theme: Theme,
    notifications_polling: bool,
    confirm_phase: ConfirmPhase,
    confirm_error: Option<String>,
}

impl UiStateSnapshot {
    pub(super) fn capture(services: &UiServices) -> Self {
        let confirm = services.confirm.borrow();
        Self {
            api_url: services.config.api_url.clone(),
            authenticated: services.session().is_authenticated(),
            sidebar: *services.sidebar.borrow(),
            theme: services.preferences.theme(),
            notifications_polling: services.poller.is_running(),
            confirm_phase: confirm.phase(),
            confirm_error: confirm.last_error().map(ToString::to_string),
        }
    }
}
