use gloo_timers::future::sleep;

use super::*;

#[derive(Clone)]
pub(super) struct NotificationView {
    list: Element,
    count: HtmlElement,
}

impl NotificationView {
    fn bind() -> Result<Option<Self>, String> {
        let list = document()?
            .query_selector(NOTIFICATIONS_LIST_SELECTOR)
            .map_err(|_| "failed to query notifications list".to_string())?;
        let (Some(list), Some(count)) = (list, html_element_by_id(NOTIFICATION_COUNT_ID)) else {
            return Ok(None);
        };
        Ok(Some(Self { list, count }))
    }

    fn render(&self, notifications: &[Notification]) -> Result<(), String> {
        let badge = NotificationBadge::for_feed(notifications);
        self.count.set_text_content(Some(&badge.text));
        set_style(&self.count, "display", badge.display())?;

        let document = document()?;
        clear_children(&self.list);
        if notifications.is_empty() {
            let empty = create_text_element(
                &document,
                "div",
                NOTIFICATION_EMPTY_CLASS,
                NO_NOTIFICATIONS_TEXT,
            )?;
            return append(&self.list, &empty);
        }

        for notification in notifications {
            let entry = create_element(&document, "div", NOTIFICATION_ENTRY_CLASS)?;
            let header = create_element(&document, "div", NOTIFICATION_HEADER_CLASS)?;
            let title = create_text_element(
                &document,
                "span",
                &notification.title_class(),
                &notification.title,
            )?;
            let time = create_text_element(&document, "span", "text-muted", &notification.time)?;
            set_style(&time, "font-size", "0.7rem")?;
            let message = create_text_element(
                &document,
                "p",
                "mb-0 text-muted small",
                &notification.message,
            )?;
            append(&header, &title)?;
            append(&header, &time)?;
            append(&entry, &header)?;
            append(&entry, &message)?;
            append(&self.list, &entry)?;
        }
        Ok(())
    }
}

pub(super) fn install_notifications(services: &Rc<UiServices>) -> Result<(), String> {
    let Some(view) = NotificationView::bind()? else {
        tracing::debug!("page has no notifications dropdown");
        return Ok(());
    };
    start_polling(services, view.clone());

    let window = window()?;
    {
        let services = Rc::clone(services);
        listen(&window, "pagehide", move |_| services.poller.stop())?;
    }
    let services = Rc::clone(services);
    listen(&window, "pageshow", move |_| {
        if !services.poller.is_running() {
            start_polling(&services, view.clone());
        }
    })
}

pub(super) fn start_polling(services: &Rc<UiServices>, view: NotificationView) {
    let lease = services.poller.start();
    let interval = services.config.notification_poll_interval;
    let services = Rc::clone(services);
    tracing::debug!(?interval, "notification polling started");
    spawn_local(async move {
        run_poll_loop(lease, interval, sleep, || {
            refresh(Rc::clone(&services), view.clone())
        })
        .await;
    });
}

async fn refresh(services: Rc<UiServices>, view: NotificationView) {
    match fetch_notifications(&services.api).await {
        Ok(notifications) => {
            if let Err(error) = view.render(&notifications) {
                tracing::warn!(%error, "failed to render notifications");
            }
        }
        Err(error) => {
            tracing::warn!(%error, kind = error.kind.as_str(), "notification fetch failed");
        }
    }
}
