//! Toast stack shown in the corner of the page.

use leptos::*;

use crate::services::ToastNotifier;
use crate::types::Toast;

/// Renders the current toasts; clicking one dismisses it.
#[component]
pub fn ToastStack(
    /// Signal for toast data
    toasts: ReadSignal<Vec<Toast>>,
    notifier: ToastNotifier,
) -> impl IntoView {
    view! {
        <div class="toast-stack">
            <For
                each=move || toasts.get()
                key=|toast| toast.id
                children=move |toast: Toast| {
                    let id = toast.id;
                    view! {
                        <div class=toast.css_class() on:click=move |_| notifier.dismiss(id)>
                            <span class="toast-emoji">{toast.emoji()}</span>
                            " "
                            {toast.message.clone()}
                        </div>
                    }
                }
            />
        </div>
    }
}
