use gloo_timers::callback::Timeout;

use super::*;

/// Renders toasts into a lazily created fixed container. Message lines are
/// inserted as text nodes.
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct ToastHost;

impl ToastHost {
    pub(super) fn show(&self, spec: &ToastSpec) -> Result<(), String> {
        let document = document()?;
        let container = ensure_container(&document)?;

        let toast = create_element(&document, "div", &spec.class_name())?;
        let _ = toast.set_attribute("role", "alert");
        let _ = toast.set_attribute("aria-live", "assertive");
        let _ = toast.set_attribute("aria-atomic", "true");

        let row = create_element(&document, "div", "d-flex")?;
        let body = create_element(&document, "div", "toast-body")?;
        for (index, line) in spec.lines.iter().enumerate() {
            if index > 0 {
                let line_break = document
                    .create_element("br")
                    .map_err(|_| "failed to create toast line break".to_string())?;
                append(&body, &line_break)?;
            }
            body.append_child(&document.create_text_node(line))
                .map_err(|_| "failed to append toast text".to_string())?;
        }

        let close = create_element(&document, "button", "btn-close btn-close-white me-2 m-auto")?;
        let _ = close.set_attribute("type", "button");
        let _ = close.set_attribute("aria-label", "Close");

        append(&row, &body)?;
        append(&row, &close)?;
        append(&toast, &row)?;
        append(&container, &toast)?;

        let on_close = {
            let toast: Element = toast.clone().into();
            Closure::once_into_js(move || hide_toast(toast))
        };
        let options = web_sys::AddEventListenerOptions::new();
        options.set_once(true);
        close
            .add_event_listener_with_callback_and_add_event_listener_options(
                "click",
                on_close.unchecked_ref(),
                &options,
            )
            .map_err(|_| "failed to bind toast close".to_string())?;

        let auto_hide = {
            let toast: Element = toast.into();
            Timeout::new(millis(TOAST_AUTO_HIDE), move || hide_toast(toast))
        };
        auto_hide.forget();
        tracing::debug!(kind = spec.kind.as_str(), "toast shown");
        Ok(())
    }
}

fn ensure_container(document: &web_sys::Document) -> Result<Element, String> {
    if let Some(existing) = document.get_element_by_id(TOAST_CONTAINER_ID) {
        return Ok(existing);
    }
    let container = create_element(document, "div", TOAST_CONTAINER_CLASS)?;
    container.set_id(TOAST_CONTAINER_ID);
    set_style(&container, "z-index", TOAST_CONTAINER_Z_INDEX)?;
    append(&body()?, &container)?;
    Ok(container.into())
}

/// Fades the toast out and detaches it. Safe to call twice.
fn hide_toast(toast: Element) {
    if toast.parent_node().is_none() {
        return;
    }
    set_class(&toast, "show", false);
    Timeout::new(millis(TOAST_FADE), move || toast.remove()).forget();
}

pub(super) fn millis(duration: std::time::Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}
