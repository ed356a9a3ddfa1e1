use leptos::*;
use pixdrop::{BatchSnapshot, JobProgress, JobStatus};

#[component]
pub fn FileList(snapshot: ReadSignal<BatchSnapshot>, is_uploading: ReadSignal<bool>) -> impl IntoView {
    view! {
        <ul class="file-list">
            <For
                each=move || snapshot.get().jobs.into_iter().enumerate()
                key=|(idx, job)| (*idx, job.name.clone())
                children=move |(idx, _)| view! { <FileRow snapshot=snapshot index=idx is_uploading=is_uploading/> }
            />
        </ul>
    }
}

/// One selected file: name, progress bar, status and preview.
#[component]
fn FileRow(snapshot: ReadSignal<BatchSnapshot>, index: usize, is_uploading: ReadSignal<bool>) -> impl IntoView {
    let job = create_memo(move |_| snapshot.with(|s| s.job(index).cloned()));

    let name = move || job.get().map(|j| j.name).unwrap_or_default();
    let status = move || job.get().map(|j| j.status).unwrap_or(JobStatus::Pending);
    let percent = move || job.get().as_ref().map(JobProgress::percent).unwrap_or(0);
    let show_bar = move || status() != JobStatus::Pending || is_uploading.get();

    view! {
        <li class=move || format!("file-row file-{}", status())>
            <span class="file-name">{name}</span>

            <Show when=show_bar fallback=|| view! {}>
                <div class="progress-bar">
                    <div class="progress-fill" style=move || format!("width: {}%;", percent())></div>
                </div>
                <span class="progress-percent">{move || format!("{}%", percent())}</span>
            </Show>

            <Show when=move || status() == JobStatus::Succeeded fallback=|| view! {}>
                <span class="file-done">"✔️ Uploaded"</span>
            </Show>

            {move || {
                job.get().and_then(|j| j.preview_url).map(|url| {
                    view! { <img class="file-preview" src=url alt=name()/> }
                })
            }}
        </li>
    }
}
