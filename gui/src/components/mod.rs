// GUI components module
pub mod error_banner;
pub mod value_input;

// Re-export components for easier access from app.rs
pub use error_banner::ErrorBanner;
pub use value_input::ValueInput;
