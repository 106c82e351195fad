//! Dataset Loader Module
//! Loads the three per-country measurement CSVs and merges them into one
//! column-normalized table using Polars.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Fixed source sequence: file name and the country tag applied to its rows.
pub const SOURCES: [(&str, &str); 3] = [
    ("benin_clean.csv", "Benin"),
    ("sierraleone_clean.csv", "Sierra Leone"),
    ("togo_clean.csv", "Togo"),
];

/// Column carrying the per-row origin tag.
pub const COUNTRY_COL: &str = "country";

/// Known spellings that fold into the canonical `region` column.
const REGION_ALIASES: [&str; 4] = ["region name", "region", "adm1", "admin1"];

/// Known spellings that fold into the canonical `ghi` column.
const GHI_ALIASES: [&str; 3] = [
    "ghi",
    "ghi (kwh/m²/day)",
    "global horizontal irradiation",
];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Cannot read dataset '{path}': {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse dataset '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
    #[error("Failed to assemble unified table: {0}")]
    Merge(#[from] PolarsError),
}

/// Map a raw header to its canonical name: trim, lowercase, then fold known
/// aliases into `region` / `ghi`. Unknown headers keep the normalized form.
pub fn canonical_column_name(raw: &str) -> String {
    let name = raw.trim().to_lowercase();
    if REGION_ALIASES.contains(&name.as_str()) {
        "region".to_string()
    } else if GHI_ALIASES.contains(&name.as_str()) {
        "ghi".to_string()
    } else {
        name
    }
}

/// Rename every column of `df` to its canonical name.
fn normalize_columns(mut df: DataFrame) -> PolarsResult<DataFrame> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|n| canonical_column_name(n.as_str()))
        .collect();
    df.set_column_names(names.iter().map(|s| s.as_str()))?;
    Ok(df)
}

/// Read a single CSV source. A missing or unreadable file is a typed
/// `FileAccess` failure so the caller can abort the whole load.
fn read_source(path: &Path) -> Result<DataFrame, LoaderError> {
    std::fs::metadata(path).map_err(|source| LoaderError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;

    LazyCsvReader::new(path)
        .with_infer_schema_length(Some(10000))
        .with_ignore_errors(true)
        .finish()
        .and_then(|lazy| lazy.collect())
        .map_err(|source| LoaderError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Load all three sources from `data_dir`, tag each row with its country,
/// and concatenate them in the fixed source order.
///
/// Either every source loads or the whole operation fails - the caller never
/// sees a partial table. Column names are normalized per source before the
/// merge so that alias variants from different files land in one column.
pub fn load_unified_table(data_dir: &Path) -> Result<DataFrame, LoaderError> {
    let mut parts: Vec<LazyFrame> = Vec::with_capacity(SOURCES.len());

    for (file_name, country) in SOURCES {
        let path = data_dir.join(file_name);
        let df = normalize_columns(read_source(&path)?)?;
        info!(rows = df.height(), country, file = file_name, "loaded source dataset");
        parts.push(df.lazy().with_column(lit(country).alias(COUNTRY_COL)));
    }

    // Diagonal concat unions the schemas; a column absent from one source is
    // null for that source's rows.
    let args = UnionArgs {
        diagonal: true,
        ..Default::default()
    };
    let unified = concat(&parts, args)?.collect()?;
    info!(rows = unified.height(), cols = unified.width(), "assembled unified table");
    Ok(unified)
}

/// Resolve the `data` directory relative to the application root: next to the
/// executable when installed, the crate root during development. Never the
/// working directory.
pub fn default_data_dir() -> PathBuf {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let candidate = dir.join("data");
            if candidate.is_dir() {
                return candidate;
            }
        }
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

/// Owns the unified table for the lifetime of a session.
pub struct DataLoader {
    df: Option<DataFrame>,
    data_dir: PathBuf,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            df: None,
            data_dir: default_data_dir(),
        }
    }

    /// Get list of column names from the unified table.
    pub fn get_columns(&self) -> Vec<String> {
        self.df
            .as_ref()
            .map(|df| {
                df.get_column_names()
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Country tags present in the table, in fixed source order.
    pub fn countries(&self) -> Vec<String> {
        let Some(df) = &self.df else {
            return Vec::new();
        };

        let tags: Vec<String> = df
            .column(COUNTRY_COL)
            .ok()
            .and_then(|col| col.unique().ok())
            .map(|unique| {
                let series = unique.as_materialized_series();
                (0..series.len())
                    .filter_map(|i| {
                        let val = series.get(i).ok()?;
                        if val.is_null() {
                            None
                        } else {
                            Some(val.to_string().trim_matches('"').to_string())
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        SOURCES
            .iter()
            .map(|(_, country)| country.to_string())
            .filter(|c| tags.contains(c))
            .collect()
    }

    /// Get the number of rows in the unified table.
    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Get a reference to the unified table.
    pub fn get_dataframe(&self) -> Option<&DataFrame> {
        self.df.as_ref()
    }

    /// Set the table directly (used for async loading).
    pub fn set_dataframe(&mut self, df: DataFrame) {
        self.df = Some(df);
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn set_data_dir(&mut self, dir: PathBuf) {
        self.data_dir = dir;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_fixture_sources(dir: &Path) {
        fs::write(
            dir.join("benin_clean.csv"),
            "Timestamp,GHI,WS,Tamb\n2021-01-01,5.1,1.0,25.0\n2021-01-02,4.8,2.0,26.5\n",
        )
        .unwrap();
        fs::write(
            dir.join("sierraleone_clean.csv"),
            "Timestamp,GHI (kWh/m²/day),ws,tamb\n2021-01-01,3.9,1.5,24.0\n2021-01-02,4.2,0.5,23.0\n",
        )
        .unwrap();
        fs::write(
            dir.join("togo_clean.csv"),
            "Timestamp, Global Horizontal Irradiation ,WS,RH\n2021-01-01,5.5,3.0,40.0\n",
        )
        .unwrap();
    }

    fn string_at(df: &DataFrame, column: &str, idx: usize) -> String {
        df.column(column)
            .unwrap()
            .get(idx)
            .unwrap()
            .to_string()
            .trim_matches('"')
            .to_string()
    }

    #[test]
    fn unified_table_concatenates_all_sources_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        write_fixture_sources(tmp.path());

        let df = load_unified_table(tmp.path()).unwrap();
        assert_eq!(df.height(), 5);

        let tags: Vec<String> = (0..5).map(|i| string_at(&df, COUNTRY_COL, i)).collect();
        assert_eq!(
            tags,
            vec!["Benin", "Benin", "Sierra Leone", "Sierra Leone", "Togo"]
        );
    }

    #[test]
    fn alias_variants_merge_into_one_ghi_column() {
        let tmp = tempfile::tempdir().unwrap();
        write_fixture_sources(tmp.path());

        let df = load_unified_table(tmp.path()).unwrap();
        let ghi = df.column("ghi").unwrap();
        assert_eq!(ghi.null_count(), 0);

        // Optional columns exist with nulls for the sources that lack them.
        let rh = df.column("rh").unwrap();
        assert_eq!(rh.null_count(), 4);
        let tamb = df.column("tamb").unwrap();
        assert_eq!(tamb.null_count(), 1);
    }

    #[test]
    fn column_normalization_is_idempotent() {
        for raw in ["  GHI  ", "Region Name", "ADM1", "WS", "Tamb", "GHI (kWh/m²/day)"] {
            let once = canonical_column_name(raw);
            assert_eq!(canonical_column_name(&once), once);
        }
    }

    #[test]
    fn missing_source_fails_the_whole_load() {
        let tmp = tempfile::tempdir().unwrap();
        write_fixture_sources(tmp.path());
        fs::remove_file(tmp.path().join("togo_clean.csv")).unwrap();

        let err = load_unified_table(tmp.path()).unwrap_err();
        assert!(matches!(err, LoaderError::FileAccess { .. }));
    }
}
