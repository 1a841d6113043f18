pub mod api;
pub mod config;
pub mod deserializers;
pub mod error;
pub mod indicator;
pub mod panel;
pub mod render;
pub mod schemas;
pub mod state;
pub mod viewer;

// Load env from a simple, standardized location resolution.
// This uses dotenvy::dotenv().ok() which loads .env if present and silently ignores if missing.
pub fn load_env() {
    let _ = dotenvy::dotenv();
}
