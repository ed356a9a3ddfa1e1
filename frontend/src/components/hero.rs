//! Hero section component

use leptos::*;

#[component]
pub fn Hero() -> impl IntoView {
    view! {
        <div class="hero">
            <h1>"pixdrop"</h1>
            <p class="subtitle">
                "Upload a batch of images and get a shareable preview link for each one. "
                "Non-image files and images over the size limit are skipped."
            </p>
        </div>
    }
}
