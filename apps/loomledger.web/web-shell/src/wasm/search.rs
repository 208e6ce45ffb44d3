use std::time::Duration;

use gloo_timers::callback::Timeout;
use gloo_timers::future::sleep;

use super::toast::millis;
use super::*;

struct SearchBinding {
    services: Rc<UiServices>,
    input: HtmlInputElement,
    panel: Element,
    // A newer keystroke bumps the sequence, which cancels any pending dispatch.
    session: RefCell<SearchSession>,
}

pub(super) fn install_search(services: &Rc<UiServices>) -> Result<(), String> {
    let (Some(input), Some(panel)) = (
        element_by_id(GLOBAL_SEARCH_ID),
        element_by_id(SEARCH_RESULTS_ID),
    ) else {
        tracing::debug!("page has no global search box");
        return Ok(());
    };
    let input = input
        .dyn_into::<HtmlInputElement>()
        .map_err(|_| "global search box is not an input element".to_string())?;

    let binding = Rc::new(SearchBinding {
        services: Rc::clone(services),
        input: input.clone(),
        panel,
        session: RefCell::new(SearchSession::new(services.search_policy)),
    });

    {
        let binding = Rc::clone(&binding);
        listen(&input, "input", move |_| on_input(&binding))?;
    }
    listen(&input, "blur", move |_| on_blur(&binding))
}

fn on_input(binding: &Rc<SearchBinding>) {
    let action = binding
        .session
        .borrow_mut()
        .on_input(&binding.input.value());
    match action {
        SearchInput::Clear => set_class(&binding.panel, PANEL_HIDDEN_CLASS, true),
        SearchInput::Schedule { ticket, delay } => {
            spawn_local(dispatch(Rc::clone(binding), ticket, delay));
        }
    }
}

async fn dispatch(binding: Rc<SearchBinding>, ticket: SearchTicket, delay: Duration) {
    let query = ticket.query.clone();
    let panel =
        match search_after_quiet(&binding.session, &binding.services.api, ticket, delay, sleep)
            .await
        {
            Ok(panel) => panel,
            Err(error) => {
                tracing::warn!(%error, %query, "search request failed");
                return;
            }
        };
    if let Some(panel) = panel {
        if let Err(error) = render(&binding.panel, &panel) {
            tracing::warn!(%error, "failed to render search results");
        }
    }
}

fn on_blur(binding: &Rc<SearchBinding>) {
    let panel = binding.panel.clone();
    let grace = binding.session.borrow().blur_delay();
    Timeout::new(millis(grace), move || {
        set_class(&panel, PANEL_HIDDEN_CLASS, true);
    })
    .forget();
}

fn render(container: &Element, panel: &SearchPanel) -> Result<(), String> {
    let document = document()?;
    clear_children(container);

    match panel {
        SearchPanel::Empty => {
            let empty =
                create_text_element(&document, "div", SEARCH_EMPTY_CLASS, NO_RESULTS_TEXT)?;
            append(container, &empty)?;
        }
        SearchPanel::Results(results) => {
            for result in results {
                let item = create_element(&document, "li", "")?;
                let link = create_element(&document, "a", SEARCH_ROW_CLASS)?;
                let _ = link.set_attribute("href", &result.url);
                let name = create_text_element(&document, "span", "", &result.name)?;
                let badge =
                    create_text_element(&document, "span", SEARCH_BADGE_CLASS, &result.kind)?;
                set_style(&badge, "font-size", "0.65rem")?;
                append(&link, &name)?;
                append(&link, &badge)?;
                append(&item, &link)?;
                append(container, &item)?;
            }
        }
    }

    set_class(container, PANEL_HIDDEN_CLASS, false);
    Ok(())
}
