use super::*;

const SPINNER_CLASS: &str = "spinner-border spinner-border-sm me-2";

struct ConfirmView {
    modal: HtmlElement,
    title: Element,
    message: Element,
}

impl ConfirmView {
    fn ensure(services: &Rc<UiServices>) -> Result<Self, String> {
        let document = document()?;
        if let Some(modal) = document.get_element_by_id(CONFIRM_MODAL_ID) {
            let modal = modal
                .dyn_into::<HtmlElement>()
                .map_err(|_| "confirm modal is not HtmlElement".to_string())?;
            let title = query(&modal, ".modal-title")?;
            let message = query(&modal, ".modal-body p")?;
            return Ok(Self {
                modal,
                title,
                message,
            });
        }

        let modal = create_element(&document, "div", "modal fade")?;
        modal.set_id(CONFIRM_MODAL_ID);
        modal.set_tab_index(-1);
        let _ = modal.set_attribute("aria-hidden", "true");
        let _ = modal.set_attribute("role", "dialog");

        let dialog = create_element(&document, "div", "modal-dialog modal-dialog-centered")?;
        let content = create_element(&document, "div", "modal-content border-0 shadow-lg")?;

        let header = create_element(&document, "div", "modal-header border-0 pt-4 px-4")?;
        let title = create_element(&document, "h5", "modal-title fw-bold")?;
        let close = create_element(&document, "button", "btn-close")?;
        let _ = close.set_attribute("type", "button");
        let _ = close.set_attribute("aria-label", "Close");
        append(&header, &title)?;
        append(&header, &close)?;

        let body_section = create_element(&document, "div", "modal-body px-4 py-0")?;
        let message = create_element(&document, "p", "text-muted mb-0")?;
        append(&body_section, &message)?;

        let footer = create_element(&document, "div", "modal-footer border-0 pb-4 px-4 pt-3")?;
        let cancel = create_text_element(&document, "button", "btn btn-light px-4", "Cancel")?;
        let _ = cancel.set_attribute("type", "button");
        let confirm = create_element(&document, "button", "btn btn-danger px-4 confirm-btn")?;
        let _ = confirm.set_attribute("type", "button");
        append(&footer, &cancel)?;
        append(&footer, &confirm)?;

        append(&content, &header)?;
        append(&content, &body_section)?;
        append(&content, &footer)?;
        append(&dialog, &content)?;
        append(&modal, &dialog)?;
        append(&body()?, &modal)?;

        for dismiss in [&close, &cancel] {
            let services = Rc::clone(services);
            listen(dismiss, "click", move |_| request_dismiss(&services))?;
        }
        {
            // Clicks outside the dialog land on the modal wrapper itself.
            let services = Rc::clone(services);
            let wrapper: web_sys::EventTarget = modal.clone().into();
            listen(&modal, "click", move |event| {
                if event.target().as_ref() == Some(&wrapper) {
                    request_dismiss(&services);
                }
            })?;
        }
        {
            let services = Rc::clone(services);
            listen(&document, "keydown", move |event| {
                let escape = event
                    .dyn_ref::<web_sys::KeyboardEvent>()
                    .is_some_and(|key| is_dismiss_key(&key.key()));
                if escape {
                    request_dismiss(&services);
                }
            })?;
        }

        tracing::debug!("created confirm modal");
        Ok(Self {
            modal,
            title: title.into(),
            message: message.into(),
        })
    }

    fn render_content(&self, content: &ConfirmContent) {
        self.title.set_text_content(Some(&content.title));
        self.message.set_text_content(Some(&content.message));
    }

    /// Swaps the confirm button for a fresh copy so no earlier click handler
    /// stays attached.
    fn replace_confirm_button(&self) -> Result<HtmlButtonElement, String> {
        let current = query(&self.modal, CONFIRM_BUTTON_SELECTOR)?;
        let fresh = current
            .clone_node()
            .map_err(|_| "failed to clone confirm button".to_string())?
            .dyn_into::<HtmlButtonElement>()
            .map_err(|_| "confirm button is not a button".to_string())?;
        let parent = current
            .parent_node()
            .ok_or_else(|| "confirm button is detached".to_string())?;
        parent
            .replace_child(&fresh, &current)
            .map_err(|_| "failed to replace confirm button".to_string())?;
        Ok(fresh)
    }

    fn show(&self) -> Result<(), String> {
        let document = document()?;
        set_style(&self.modal, "display", "block")?;
        set_class(&self.modal, "show", true);
        let _ = self.modal.set_attribute("aria-hidden", "false");
        let _ = self.modal.set_attribute("aria-modal", "true");

        let body = body()?;
        set_class(&body, MODAL_OPEN_BODY_CLASS, true);
        if document.get_element_by_id(CONFIRM_BACKDROP_ID).is_none() {
            let backdrop = create_element(&document, "div", "modal-backdrop fade show")?;
            backdrop.set_id(CONFIRM_BACKDROP_ID);
            append(&body, &backdrop)?;
        }
        Ok(())
    }
}

fn query(root: &Element, selector: &str) -> Result<Element, String> {
    root.query_selector(selector)
        .map_err(|_| format!("invalid selector {selector}"))?
        .ok_or_else(|| format!("confirm modal is missing {selector}"))
}

fn request_dismiss(services: &UiServices) {
    let dismissed = {
        let mut dialog = services.confirm.borrow_mut();
        if dialog.phase() == ConfirmPhase::Closed {
            return;
        }
        dialog.dismiss()
    };
    if dismissed {
        hide_modal();
    } else {
        tracing::debug!("dismiss ignored while confirm action runs");
    }
}

fn hide_modal() {
    if let Some(modal) = html_element_by_id(CONFIRM_MODAL_ID) {
        set_class(&modal, "show", false);
        let _ = set_style(&modal, "display", "none");
        let _ = modal.set_attribute("aria-hidden", "true");
        let _ = modal.remove_attribute("aria-modal");
    }
    if let Ok(body) = body() {
        set_class(&body, MODAL_OPEN_BODY_CLASS, false);
    }
    if let Some(backdrop) = element_by_id(CONFIRM_BACKDROP_ID) {
        backdrop.remove();
    }
}

fn render_button(button: &HtmlButtonElement, view: &ConfirmButtonView) -> Result<(), String> {
    button.set_class_name(&view.class_name);
    button.set_disabled(view.disabled);
    clear_children(button);
    if view.busy {
        let document = document()?;
        let spinner = create_element(&document, "span", SPINNER_CLASS)?;
        let _ = spinner.set_attribute("role", "status");
        let _ = spinner.set_attribute("aria-hidden", "true");
        append(button, &spinner)?;
        button
            .append_child(&document.create_text_node(&view.label))
            .map_err(|_| "failed to set confirm label".to_string())?;
    } else {
        button.set_text_content(Some(&view.label));
    }
    Ok(())
}

/// Reads `{title, message, onConfirm, confirmText, confirmButtonClass}`.
/// Snake-case keys are accepted too.
pub(super) fn read_confirm_options(
    options: &JsValue,
) -> Result<(ConfirmOptions, js_sys::Function), JsValue> {
    let field = |camel: &str, snake: &str| {
        [camel, snake].into_iter().find_map(|key| {
            js_sys::Reflect::get(options, &JsValue::from_str(key))
                .ok()
                .filter(|value| !value.is_undefined() && !value.is_null())
        })
    };
    let text = |camel: &str, snake: &str| field(camel, snake).and_then(|value| value.as_string());

    let on_confirm = field("onConfirm", "on_confirm")
        .and_then(|value| value.dyn_into::<js_sys::Function>().ok())
        .ok_or_else(|| {
            JsValue::from(js_sys::Error::new(
                "confirm_delete requires an onConfirm function",
            ))
        })?;

    let options = ConfirmOptions {
        title: text("title", "title"),
        message: text("message", "message"),
        confirm_text: text("confirmText", "confirm_text"),
        confirm_button_class: text("confirmButtonClass", "confirm_button_class"),
    };
    Ok((options, on_confirm))
}

pub(super) fn open_confirm(
    services: &Rc<UiServices>,
    options: ConfirmOptions,
    on_confirm: js_sys::Function,
) -> Result<(), String> {
    let opened = services.confirm.borrow_mut().open(options);
    let binding = match opened {
        Ok(binding) => binding,
        Err(error) => {
            tracing::warn!(%error, "confirm request rejected");
            let notice = ToastSpec::text(error.to_string(), ToastKind::Warning);
            if let Err(toast_error) = services.toasts.show(&notice) {
                tracing::debug!(error = %toast_error, "failed to show busy notice");
            }
            return Err(error.to_string());
        }
    };

    let view = ConfirmView::ensure(services)?;
    let (content, button_view) = {
        let dialog = services.confirm.borrow();
        (dialog.content().cloned(), dialog.button_view())
    };
    if let Some(content) = &content {
        view.render_content(content);
    }

    let button = view.replace_confirm_button()?;
    render_button(&button, &button_view)?;

    let handler = {
        let services = Rc::clone(services);
        let button = button.clone();
        Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_| {
            on_confirm_click(&services, binding, &button, &on_confirm);
        }))
    };
    button
        .add_event_listener_with_callback("click", handler.as_ref().unchecked_ref())
        .map_err(|_| "failed to bind confirm handler".to_string())?;
    CONFIRM_CLICK_HANDLER.with(|slot| *slot.borrow_mut() = Some(handler));

    view.show()
}

fn on_confirm_click(
    services: &Rc<UiServices>,
    binding: u64,
    button: &HtmlButtonElement,
    action: &js_sys::Function,
) {
    let pressed = services.confirm.borrow_mut().press_confirm(binding);
    let busy = match pressed {
        Ok(view) => view,
        Err(error) => {
            tracing::debug!(%error, "confirm click ignored");
            return;
        }
    };
    if let Err(error) = render_button(button, &busy) {
        tracing::warn!(%error, "failed to render busy confirm button");
    }

    let services = Rc::clone(services);
    let button = button.clone();
    let action = action.clone();
    spawn_local(async move {
        let result = run_confirm_action(&action).await;
        let settled = services.confirm.borrow_mut().settle(binding, result);
        match settled {
            Ok(ConfirmOutcome::Closed) => hide_modal(),
            Ok(ConfirmOutcome::Retry { toast, button: view }) => {
                if let Err(error) = services.toasts.show(&toast) {
                    tracing::warn!(%error, "failed to show confirm failure");
                }
                if let Err(error) = render_button(&button, &view) {
                    tracing::warn!(%error, "failed to restore confirm button");
                }
            }
            Err(error) => tracing::debug!(%error, "confirm result dropped"),
        }
    });
}

/// Calls the page's action and awaits it when it returns a promise or any
/// other thenable.
async fn run_confirm_action(action: &js_sys::Function) -> Result<(), ConfirmFailure> {
    let returned = action
        .call0(&JsValue::NULL)
        .map_err(|error| confirm_failure(&error))?;
    JsFuture::from(js_sys::Promise::resolve(&returned))
        .await
        .map(|_| ())
        .map_err(|error| confirm_failure(&error))
}

fn confirm_failure(error: &JsValue) -> ConfirmFailure {
    tracing::warn!(error = ?error, "confirm action failed");
    ConfirmFailure {
        detail: response_detail(error),
    }
}
