//! Keeps the widget's saved state between runs.

use crate::widgets::saved_state::Parcel;
use anyhow::{anyhow, bail, Result};
use log::debug;
use std::path::{Path, PathBuf};

pub fn state_path() -> Result<PathBuf> {
    let data_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow!("Could not find data directory"))?;
    Ok(data_dir.join("goalbar").join("state.toml"))
}

/// Reads a saved parcel. A missing file is not an error.
pub fn load(path: &Path) -> Result<Option<Parcel>> {
    if !path.exists() {
        debug!("No saved state at {}", path.display());
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path)?;
    let table: toml::Table = toml::from_str(&contents)?;
    Ok(Some(Parcel::Table(table)))
}

pub fn save(path: &Path, parcel: &Parcel) -> Result<()> {
    let Parcel::Table(table) = parcel else {
        bail!("Saved state must be a table, got {}", parcel.type_str());
    };
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(path, toml::to_string_pretty(table)?)?;
    debug!("Saved state to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use toml::Value;

    #[test]
    fn missing_file_loads_as_none() {
        let dir = TempDir::new().unwrap();
        assert!(load(&dir.path().join("state.toml")).unwrap().is_none());
    }

    #[test]
    fn saved_parcel_loads_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("goalbar").join("state.toml");
        let mut table = toml::Table::new();
        table.insert("progress".into(), Value::Integer(12));
        let mut inner = toml::Table::new();
        inner.insert("visible".into(), Value::Boolean(true));
        table.insert("super_state".into(), Value::Table(inner));
        let parcel = Value::Table(table);

        save(&path, &parcel).unwrap();
        assert_eq!(load(&path).unwrap(), Some(parcel));
    }

    #[test]
    fn non_table_parcels_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.toml");
        assert!(save(&path, &Value::Integer(3)).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.toml");
        std::fs::write(&path, "progress = ").unwrap();
        assert!(load(&path).is_err());
    }
}
