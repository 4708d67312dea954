// Currency data: the bundled table and the registry built from it
pub mod currency_registry;
pub mod currency_table;

pub use currency_registry::{CurrencyRegistry, CurrencySource};
pub use currency_table::CurrencyTableParser;
