use super::*;

/// Sidebar elements looked up once; any of them may be missing on a page.
#[derive(Clone)]
pub(super) struct SidebarView {
    sidebar: Option<Element>,
    overlay: Option<Element>,
    body: Option<HtmlElement>,
}

impl SidebarView {
    pub(super) fn bind() -> Self {
        Self {
            sidebar: element_by_id(SIDEBAR_ID),
            overlay: element_by_id(SIDEBAR_OVERLAY_ID),
            body: body().ok(),
        }
    }

    fn apply_collapsed(&self, collapsed: bool) {
        if let Some(sidebar) = &self.sidebar {
            set_class(sidebar, SIDEBAR_COLLAPSED_CLASS, collapsed);
        }
    }

    fn rendered_collapsed(&self) -> Option<bool> {
        self.sidebar
            .as_ref()
            .map(|sidebar| sidebar.class_list().contains(SIDEBAR_COLLAPSED_CLASS))
    }

    fn apply_mobile(&self, view: MobileSidebarView) {
        if let Some(sidebar) = &self.sidebar {
            set_class(sidebar, SIDEBAR_MOBILE_OPEN_CLASS, view.open);
        }
        if let Some(overlay) = &self.overlay {
            set_class(overlay, OVERLAY_ACTIVE_CLASS, view.open);
        }
        if let Some(body) = &self.body {
            if let Err(error) = set_style(body, "overflow", view.body_overflow) {
                tracing::debug!(%error, "failed to lock body scroll");
            }
        }
    }
}

pub(super) fn install_sidebar(services: &Rc<UiServices>) -> Result<(), String> {
    let view = SidebarView::bind();
    // The stored flag only ever adds the class.
    if services.sidebar.borrow().collapsed {
        view.apply_collapsed(true);
    }
    if let Some(rendered) = view.rendered_collapsed() {
        services.sidebar.borrow_mut().adopt_rendered(rendered);
    }

    if let Some(toggle) = element_by_id(SIDEBAR_TOGGLE_ID) {
        let services = Rc::clone(services);
        let view = view.clone();
        listen(&toggle, "click", move |_| {
            apply_sidebar_toggle(&services, &view, None);
        })?;
    }

    if let Some(open) = element_by_id(SIDEBAR_TOGGLE_MOBILE_ID) {
        let services = Rc::clone(services);
        let view = view.clone();
        listen(&open, "click", move |_| {
            let mobile = services.sidebar.borrow_mut().open_mobile();
            view.apply_mobile(mobile);
        })?;
    }

    for close_id in [SIDEBAR_CLOSE_MOBILE_ID, SIDEBAR_OVERLAY_ID] {
        let Some(close) = element_by_id(close_id) else {
            continue;
        };
        let services = Rc::clone(services);
        let view = view.clone();
        listen(&close, "click", move |_| {
            let mobile = services.sidebar.borrow_mut().close_mobile();
            view.apply_mobile(mobile);
        })?;
    }
    Ok(())
}

/// Flips or forces the desktop collapse flag and persists it.
pub(super) fn apply_sidebar_toggle(
    services: &UiServices,
    view: &SidebarView,
    force: Option<bool>,
) -> bool {
    let collapsed = {
        let mut sidebar = services.sidebar.borrow_mut();
        if let Some(rendered) = view.rendered_collapsed() {
            sidebar.adopt_rendered(rendered);
        }
        sidebar.toggle(force)
    };
    view.apply_collapsed(collapsed);
    if let Err(error) = services.preferences.persist_sidebar_collapsed(collapsed) {
        tracing::warn!(%error, "failed to persist sidebar state");
    }
    collapsed
}

struct ThemeView {
    root: Element,
    icon: Option<Element>,
}

impl ThemeView {
    fn bind() -> Result<Self, String> {
        let root = document()?
            .document_element()
            .ok_or_else(|| "document element is unavailable".to_string())?;
        Ok(Self {
            root,
            icon: element_by_id(THEME_ICON_ID),
        })
    }

    fn current(&self) -> Theme {
        Theme::parse(self.root.get_attribute(THEME_ATTRIBUTE).as_deref())
    }

    fn apply(&self, services: &UiServices, theme: Theme) {
        if self
            .root
            .set_attribute(THEME_ATTRIBUTE, theme.as_str())
            .is_err()
        {
            tracing::warn!(theme = theme.as_str(), "failed to set theme attribute");
        }
        if let Some(icon) = &self.icon {
            icon.set_class_name(theme.icon_class());
        }
        if let Err(error) = services.preferences.persist_theme(theme) {
            tracing::warn!(%error, "failed to persist theme");
        }
    }
}

pub(super) fn install_theme(services: &Rc<UiServices>) -> Result<(), String> {
    let Some(toggle) = element_by_id(THEME_TOGGLE_ID) else {
        return Ok(());
    };
    let view = ThemeView::bind()?;
    view.apply(services, services.preferences.theme());

    let services = Rc::clone(services);
    listen(&toggle, "click", move |_| {
        view.apply(&services, view.current().toggled());
    })
}

pub(super) fn highlight_active_nav() -> Result<(), String> {
    let path = current_pathname();
    let nodes = document()?
        .query_selector_all(NAV_LINK_SELECTOR)
        .map_err(|_| "failed to query navigation links".to_string())?;
    let links: Vec<Element> = (0..nodes.length())
        .filter_map(|index| nodes.item(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect();
    let hrefs: Vec<Option<String>> = links.iter().map(|link| link.get_attribute("href")).collect();
    let states = active_link_states(hrefs.iter().map(Option::as_deref), &path);
    for (link, active) in links.iter().zip(states) {
        set_class(link, ACTIVE_CLASS, active);
    }
    Ok(())
}

/// Attaches Bootstrap tooltips to every `data-bs-toggle="tooltip"` element.
/// Pages that load without Bootstrap's bundle are left untouched.
pub(super) fn init_tooltips() -> Result<(), String> {
    let window = window()?;
    let Some(constructor) = js_sys::Reflect::get(&window, &JsValue::from_str("bootstrap"))
        .ok()
        .filter(|bootstrap| bootstrap.is_object())
        .and_then(|bootstrap| js_sys::Reflect::get(&bootstrap, &JsValue::from_str("Tooltip")).ok())
        .and_then(|tooltip| tooltip.dyn_into::<js_sys::Function>().ok())
    else {
        tracing::debug!("bootstrap tooltips unavailable");
        return Ok(());
    };

    let options = TooltipOptions::default()
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|error| format!("failed to encode tooltip options: {error}"))?;
    let nodes = document()?
        .query_selector_all(TOOLTIP_SELECTOR)
        .map_err(|_| "failed to query tooltip triggers".to_string())?;
    let mut attached = 0_u32;
    for node in (0..nodes.length()).filter_map(|index| nodes.item(index)) {
        let args = js_sys::Array::of2(&node, &options);
        match js_sys::Reflect::construct(&constructor, &args) {
            Ok(_) => attached += 1,
            Err(error) => tracing::warn!(error = ?error, "failed to attach tooltip"),
        }
    }
    tracing::debug!(attached, "tooltips initialised");
    Ok(())
}
