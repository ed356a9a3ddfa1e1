//! Entry point for the WASM application

pub fn main() {
    pixdrop_frontend::mount();
}
