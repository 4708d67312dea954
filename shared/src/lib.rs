// Data models and locale helpers shared by the engine and the GUI.
pub mod models;
pub mod utils;

pub use models::Currency;
pub use utils::NumberLocale;
