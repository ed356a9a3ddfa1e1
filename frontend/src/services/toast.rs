//! Notifier that shows upload messages as toasts.

use gloo_timers::callback::Timeout;
use leptos::*;
use pixdrop::{Notification, Notifier};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::types::Toast;
use crate::{MAX_TOASTS, TOAST_TIMEOUT_MS};

static NEXT_TOAST_ID: AtomicU64 = AtomicU64::new(1);

/// Pushes toasts into a signal and removes each one after a delay.
#[derive(Clone, Copy)]
pub struct ToastNotifier {
    set_toasts: WriteSignal<Vec<Toast>>,
}

impl ToastNotifier {
    pub fn new(set_toasts: WriteSignal<Vec<Toast>>) -> Self {
        Self { set_toasts }
    }

    /// Remove a toast by id.
    pub fn dismiss(&self, id: u64) {
        self.set_toasts.update(|toasts| toasts.retain(|t| t.id != id));
    }
}

impl Notifier for ToastNotifier {
    fn notify(&self, notification: Notification) {
        log::info!("{}", notification.message);

        let id = NEXT_TOAST_ID.fetch_add(1, Ordering::Relaxed);
        self.set_toasts.update(|toasts| {
            toasts.push(Toast::new(id, notification));
            if toasts.len() > MAX_TOASTS {
                toasts.remove(0);
            }
        });

        let this = *self;
        Timeout::new(TOAST_TIMEOUT_MS, move || this.dismiss(id)).forget();
    }
}
