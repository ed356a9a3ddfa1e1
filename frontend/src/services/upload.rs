//! Browser upload transport.
//!
//! Uses `XMLHttpRequest` rather than `fetch` because only XHR exposes
//! upload-side progress events.

use futures::channel::oneshot;
use pixdrop::config::API_KEY_HEADER;
use pixdrop::transport::{FIELD_CONTENT_TYPE, FIELD_FILE, FIELD_OPTIMISE, OPTIMISE_VALUE};
use pixdrop::{
    parse_response, CandidateFile, ProgressHandle, Transport, UploadConfig, UploadError,
    UploadReceipt, UploadResult,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{File, FormData, ProgressEvent, XmlHttpRequest};

/// What the request ended with, before interpretation.
enum Completion {
    /// Response received (any status)
    Loaded { status: u16, body: String },
    /// Network error, abort or timeout
    Failed(&'static str),
}

type Resolver = Rc<RefCell<Option<oneshot::Sender<Completion>>>>;

/// Uploads browser `File`s to the configured endpoint.
#[derive(Clone, Debug)]
pub struct XhrTransport {
    endpoint: String,
    api_key: String,
}

impl XhrTransport {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
        }
    }
}

fn js_error(context: &str, err: JsValue) -> String {
    format!("{}: {:?}", context, err)
}

/// Multipart body: file, declared type, and the no-optimise flag.
fn build_form(file: &CandidateFile<File>) -> UploadResult<FormData> {
    let form = FormData::new().map_err(|e| UploadError::Form(js_error("Failed to create FormData", e)))?;
    form.append_with_blob_and_filename(FIELD_FILE, &file.content, &file.name)
        .map_err(|e| UploadError::Form(js_error("Failed to append file", e)))?;
    form.append_with_str(FIELD_CONTENT_TYPE, &file.mime_type)
        .map_err(|e| UploadError::Form(js_error("Failed to append content type", e)))?;
    form.append_with_str(FIELD_OPTIMISE, OPTIMISE_VALUE)
        .map_err(|e| UploadError::Form(js_error("Failed to append optimise flag", e)))?;
    Ok(form)
}

fn resolve(resolver: &Resolver, completion: Completion) {
    if let Some(tx) = resolver.borrow_mut().take() {
        let _ = tx.send(completion);
    }
}

impl Transport for XhrTransport {
    type Content = File;

    async fn upload(
        &self,
        file: &CandidateFile<File>,
        progress: ProgressHandle,
    ) -> UploadResult<UploadReceipt> {
        let form = build_form(file)?;

        let transport_err = |context: &str, e: JsValue| UploadError::Transport(js_error(context, e));

        let xhr = XmlHttpRequest::new().map_err(|e| transport_err("Failed to create request", e))?;
        xhr.open_with_async("POST", &self.endpoint, true)
            .map_err(|e| transport_err("Failed to open request", e))?;
        xhr.set_request_header(API_KEY_HEADER, &self.api_key)
            .map_err(|e| transport_err("Failed to set API key header", e))?;
        let upload = xhr
            .upload()
            .map_err(|e| transport_err("Upload events unavailable", e))?;

        let (tx, rx) = oneshot::channel();
        let resolver: Resolver = Rc::new(RefCell::new(Some(tx)));

        let on_progress = Closure::<dyn FnMut(ProgressEvent)>::new(move |event: ProgressEvent| {
            if event.length_computable() {
                progress.report(event.loaded() as u64, event.total() as u64);
            }
        });

        let on_load = {
            let resolver = Rc::clone(&resolver);
            let xhr = xhr.clone();
            Closure::<dyn FnMut()>::new(move || {
                let status = xhr.status().unwrap_or(0);
                let body = xhr.response_text().ok().flatten().unwrap_or_default();
                resolve(&resolver, Completion::Loaded { status, body });
            })
        };

        let on_error = {
            let resolver = Rc::clone(&resolver);
            Closure::<dyn FnMut()>::new(move || resolve(&resolver, Completion::Failed("network error")))
        };

        let on_abort = {
            let resolver = Rc::clone(&resolver);
            Closure::<dyn FnMut()>::new(move || resolve(&resolver, Completion::Failed("request aborted")))
        };

        upload.set_onprogress(Some(on_progress.as_ref().unchecked_ref()));
        xhr.set_onload(Some(on_load.as_ref().unchecked_ref()));
        xhr.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        xhr.set_onabort(Some(on_abort.as_ref().unchecked_ref()));
        xhr.set_ontimeout(Some(on_abort.as_ref().unchecked_ref()));

        xhr.send_with_opt_form_data(Some(&form))
            .map_err(|e| transport_err("Failed to send request", e))?;

        let completion = rx.await;

        // Detach before the closures are dropped.
        upload.set_onprogress(None);
        xhr.set_onload(None);
        xhr.set_onerror(None);
        xhr.set_onabort(None);
        xhr.set_ontimeout(None);

        match completion {
            Ok(Completion::Loaded { status, body }) => parse_response(status, &body),
            Ok(Completion::Failed(reason)) => Err(UploadError::Transport(reason.to_string())),
            Err(_) => Err(UploadError::Transport("request dropped".to_string())),
        }
    }
}
