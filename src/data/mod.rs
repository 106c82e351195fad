//! Data module - dataset loading and aggregation

pub mod aggregate;
mod loader;

pub use loader::{
    default_data_dir, load_unified_table, DataLoader, LoaderError, COUNTRY_COL, SOURCES,
};
