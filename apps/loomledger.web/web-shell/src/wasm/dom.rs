use super::*;

pub(super) fn window() -> Result<web_sys::Window, String> {
    web_sys::window().ok_or_else(|| "window is unavailable".to_string())
}

pub(super) fn document() -> Result<web_sys::Document, String> {
    window()?
        .document()
        .ok_or_else(|| "document is unavailable".to_string())
}

pub(super) fn body() -> Result<HtmlElement, String> {
    document()?
        .body()
        .ok_or_else(|| "document body is unavailable".to_string())
}

pub(super) fn element_by_id(id: &str) -> Option<Element> {
    document().ok()?.get_element_by_id(id)
}

pub(super) fn html_element_by_id(id: &str) -> Option<HtmlElement> {
    element_by_id(id)?.dyn_into::<HtmlElement>().ok()
}

pub(super) fn create_element(
    document: &web_sys::Document,
    tag: &str,
    class_name: &str,
) -> Result<HtmlElement, String> {
    let element = document
        .create_element(tag)
        .map_err(|_| format!("failed to create <{tag}>"))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| format!("<{tag}> is not HtmlElement"))?;
    if !class_name.is_empty() {
        element.set_class_name(class_name);
    }
    Ok(element)
}

/// Element carrying `text` as its only child text node.
pub(super) fn create_text_element(
    document: &web_sys::Document,
    tag: &str,
    class_name: &str,
    text: &str,
) -> Result<HtmlElement, String> {
    let element = create_element(document, tag, class_name)?;
    element.set_text_content(Some(text));
    Ok(element)
}

pub(super) fn append(parent: &Element, child: &Element) -> Result<(), String> {
    parent
        .append_child(child)
        .map(|_| ())
        .map_err(|_| "failed to append element".to_string())
}

pub(super) fn clear_children(element: &Element) {
    element.set_text_content(None);
}

pub(super) fn set_class(element: &Element, class: &str, enabled: bool) {
    if element
        .class_list()
        .toggle_with_force(class, enabled)
        .is_err()
    {
        tracing::debug!(class, "failed to toggle class");
    }
}

pub(super) fn set_style(element: &HtmlElement, property: &str, value: &str) -> Result<(), String> {
    element
        .style()
        .set_property(property, value)
        .map_err(|_| format!("failed to set style {property}"))
}

/// Registers a handler that lives as long as the page.
pub(super) fn listen(
    target: &web_sys::EventTarget,
    event: &str,
    handler: impl FnMut(web_sys::Event) + 'static,
) -> Result<(), String> {
    let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(handler));
    target
        .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
        .map_err(|_| format!("failed to bind {event} listener"))?;
    PAGE_HANDLERS.with(|handlers| handlers.borrow_mut().push(callback));
    Ok(())
}

/// Runs `callback` once the document is parsed.
pub(super) fn when_dom_ready(callback: impl FnOnce() + 'static) -> Result<(), String> {
    let document = document()?;
    if document.ready_state() != "loading" {
        callback();
        return Ok(());
    }
    let once = Closure::once_into_js(callback);
    document
        .add_event_listener_with_callback("DOMContentLoaded", once.unchecked_ref())
        .map_err(|_| "failed to bind DOMContentLoaded listener".to_string())
}

pub(super) fn current_pathname() -> String {
    window()
        .ok()
        .and_then(|window| window.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// Host-provided global (`window[key]`), read as a string. Numbers are
/// accepted for numeric settings.
pub(super) fn host_global(key: &str) -> Option<String> {
    let window = web_sys::window()?;
    let value = js_sys::Reflect::get(&window, &JsValue::from_str(key)).ok()?;
    value
        .as_string()
        .or_else(|| value.as_f64().map(|number| format!("{number}")))
}
