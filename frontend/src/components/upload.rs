//! Image picker and upload trigger.
//!
//! Owns the [`UploadSession`] for the page, mirrors its tracker into a
//! signal and renders the headline, the file list and the upload button.

use leptos::*;
use pixdrop::session::IDLE_HEADLINE;
use pixdrop::{BatchError, BatchSnapshot, CandidateFile, UploadConfig, UploadSession};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{Event, File, HtmlInputElement};

use crate::services::{ToastNotifier, XhrTransport};
use crate::{FileList, ACCEPT};

type Session = Rc<UploadSession<XhrTransport>>;

fn selected_files(input: &HtmlInputElement) -> Vec<CandidateFile<File>> {
    let Some(files) = input.files() else {
        return Vec::new();
    };
    (0..files.length())
        .filter_map(|i| files.get(i))
        .map(|f| CandidateFile::new(f.name(), f.size() as u64, f.type_(), f))
        .collect()
}

#[component]
pub fn UploadSection(config: UploadConfig, notifier: ToastNotifier) -> impl IntoView {
    let session: Session = Rc::new(UploadSession::new(config.clone(), XhrTransport::new(&config)));

    let (snapshot, set_snapshot) = create_signal(BatchSnapshot::default());
    let (has_selection, set_has_selection) = create_signal(false);
    let (is_uploading, set_is_uploading) = create_signal(false);

    session
        .tracker()
        .subscribe(move |next: &BatchSnapshot| set_snapshot.set(next.clone()));

    let headline = move || {
        if has_selection.get() {
            snapshot.with(BatchSnapshot::headline)
        } else {
            IDLE_HEADLINE.to_string()
        }
    };

    let on_file_change = {
        let session = Rc::clone(&session);
        move |ev: Event| {
            let input: HtmlInputElement = event_target(&ev);
            let files = selected_files(&input);
            // Allow picking the same files again.
            input.set_value("");
            if files.is_empty() {
                return;
            }

            // Refused while a batch runs; the session has already notified.
            if session.select(files, &notifier).is_ok() {
                set_has_selection.set(true);
            }
        }
    };

    let on_upload = {
        let session = Rc::clone(&session);
        move |_| {
            if is_uploading.get_untracked() {
                return;
            }
            let session = Rc::clone(&session);
            set_is_uploading.set(true);
            spawn_local(async move {
                match session.upload_all(&notifier).await {
                    Ok(report) => log::info!(
                        "batch finished: {} of {} uploaded",
                        report.succeeded,
                        report.total
                    ),
                    Err(BatchError::AlreadyRunning) => log::warn!("upload already running"),
                    Err(e) => log::info!("{}", e),
                }
                set_is_uploading.set(false);
            });
        }
    };

    let trigger_file_input = move |_| {
        if is_uploading.get_untracked() {
            return;
        }
        let input = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("fileInput"));
        if let Some(html_input) = input.as_ref().and_then(|i| i.dyn_ref::<HtmlInputElement>()) {
            html_input.click();
        }
    };

    view! {
        <div class="upload-section">
            <h2 class="upload-headline">{headline}</h2>

            <div
                class="upload-zone"
                class:disabled=move || is_uploading.get()
                id="uploadZone"
                on:click=trigger_file_input
            >
                <div class="upload-icon">"🖼️"</div>
                <div class="upload-text">"Click to choose images"</div>
                <div class="upload-hint">"PNG, JPEG, GIF, WebP, SVG · up to 11 MiB each"</div>
            </div>

            <input
                type="file"
                id="fileInput"
                accept=ACCEPT
                multiple=true
                disabled=move || is_uploading.get()
                style="display:none"
                on:change=on_file_change
            />

            <FileList snapshot=snapshot is_uploading=is_uploading/>

            <button
                class="upload-button"
                disabled=move || is_uploading.get() || !has_selection.get()
                on:click=on_upload
            >
                {move || if is_uploading.get() { "Uploading..." } else { "Upload Files" }}
            </button>
        </div>
    }
}
