use uuid::Uuid;
use yew::prelude::*;
use yewdux::prelude::*;

use crate::data::request::Notify;

#[derive(Debug, Clone, PartialEq)]
pub enum ToastKind {
    Error,
    Success,
    Info,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: Uuid,
    pub message: String,
    pub kind: ToastKind,
    pub duration: Option<u32>, // milliseconds, None for no auto-dismiss
}

impl Toast {
    pub fn new(message: String, kind: ToastKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            message,
            kind,
            duration: Some(5000), // 5 seconds default
        }
    }

    pub fn error(message: String) -> Self {
        Self::new(message, ToastKind::Error)
    }

    pub fn success(message: String) -> Self {
        Self::new(message, ToastKind::Success)
    }

    pub fn info(message: String) -> Self {
        Self::new(message, ToastKind::Info)
    }

    pub fn no_auto_dismiss(mut self) -> Self {
        self.duration = None;
        self
    }
}

/// Queue of live notifications, newest last. Global so that toasts
/// survive screen changes and so the data layer can raise them without a
/// component handle.
#[derive(Debug, Clone, PartialEq, Default, Store)]
pub struct ToastStore {
    pub toasts: Vec<Toast>,
}

impl ToastStore {
    fn add(&mut self, toast: Toast) {
        self.toasts.push(toast);
    }

    fn remove(&mut self, id: Uuid) {
        self.toasts.retain(|toast| toast.id != id);
    }

    fn clear(&mut self) {
        self.toasts.clear();
    }
}

/// Handle for pushing and dismissing toasts.
#[derive(Clone)]
pub struct ToastHandle {
    dispatch: Dispatch<ToastStore>,
}

impl ToastHandle {
    pub fn add(&self, toast: Toast) {
        let toast_id = toast.id;
        let duration = toast.duration;

        self.dispatch.reduce_mut(|store| store.add(toast));

        // Set up auto-dismiss if duration is specified
        if let Some(duration_ms) = duration {
            let dispatch = self.dispatch.clone();
            yew::platform::spawn_local(async move {
                gloo_timers::future::TimeoutFuture::new(duration_ms).await;
                dispatch.reduce_mut(|store| store.remove(toast_id));
            });
        }
    }

    pub fn error(&self, message: impl Into<String>) {
        self.add(Toast::error(message.into()));
    }

    pub fn success(&self, message: impl Into<String>) {
        self.add(Toast::success(message.into()));
    }

    pub fn info(&self, message: impl Into<String>) {
        self.add(Toast::info(message.into()));
    }

    pub fn remove(&self, id: Uuid) {
        self.dispatch.reduce_mut(|store| store.remove(id));
    }

    pub fn clear(&self) {
        self.dispatch.reduce_mut(|store| store.clear());
    }
}

/// Data-layer notifier surfacing failures as error toasts.
#[derive(Clone)]
pub struct ToastNotifier {
    handle: ToastHandle,
}

impl ToastNotifier {
    pub fn new(handle: ToastHandle) -> Self {
        Self { handle }
    }
}

impl Notify for ToastNotifier {
    fn notify(&self, message: &str) {
        self.handle.error(message.to_string());
    }
}

#[hook]
pub fn use_toast() -> ToastHandle {
    let (_, dispatch) = use_store::<ToastStore>();
    ToastHandle { dispatch }
}
