//! pixdrop - Frontend Rust/Leptos Application
//!
//! A WebAssembly widget for picking images, uploading them in a batch and
//! showing a preview of each one once it lands.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        App                                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  MainContent                                                 │
//! │  ├── Hero (title, description)                              │
//! │  ├── UploadSection (headline, picker, FileList, button)     │
//! │  │     or a configuration error                             │
//! │  └── ToastStack                                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Footer                                                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`types`] - Common types (Toast)
//! - [`components`] - UI components (Hero, Upload, FileList, etc.)
//! - [`services`] - Browser transport and toast notifier

use leptos::*;

// =============================================================================
// Module declarations
// =============================================================================

pub mod config;
pub mod types;
pub mod components;
pub mod services;

// =============================================================================
// Re-exports
// =============================================================================

// Configuration
pub use config::*;

// Types
pub use types::Toast;

// Components
pub use components::*;

// Services
pub use services::*;

// =============================================================================
// Application Entry Point
// =============================================================================

/// Install the panic hook and console logger, then mount the app.
pub fn mount() {
    console_error_panic_hook::set_once();
    _ = console_log::init_with_level(log::Level::Debug);

    log::info!("🦀 pixdrop - Starting Leptos App");

    mount_to_body(|| view! { <App/> });
}

#[component]
pub fn App() -> impl IntoView {
    view! {
        <main>
            <MainContent/>
        </main>
    }
}

#[component]
fn MainContent() -> impl IntoView {
    let (toasts, set_toasts) = create_signal(Vec::<Toast>::new());
    let notifier = ToastNotifier::new(set_toasts);

    let upload = match upload_config() {
        Ok(config) => view! { <UploadSection config=config notifier=notifier/> }.into_view(),
        Err(e) => {
            log::error!("invalid upload configuration: {}", e);
            view! {
                <div class="error-message">
                    "Uploads are unavailable: " {e.to_string()}
                </div>
            }
            .into_view()
        }
    };

    view! {
        <div class="container">
            <Hero/>
            {upload}
        </div>

        <ToastStack toasts=toasts notifier=notifier/>

        <Footer/>
    }
}
