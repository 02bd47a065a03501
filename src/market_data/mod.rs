pub mod export;
pub mod loader;
pub mod price_table;

// Re-exports for convenient access (e.g. `use crate::market_data::PriceTable`).
pub use export::{write_table, write_table_to};
pub use loader::{load_prices, load_prices_from_reader, REQUIRED_COLUMNS};
pub use price_table::{Column, PriceBar, PriceTable};
