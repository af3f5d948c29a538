use crate::contract::{CONTENT_AUTHORITY, TeaColumn};
use crate::uri::TeaUris;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct InventoryConfig {
    pub database: Option<String>,
    pub authority: Option<String>,
    /// Column used by `list` when no `--sort` is given
    pub default_sort: Option<String>,
}

impl InventoryConfig {
    pub fn uris(&self) -> TeaUris {
        TeaUris::new(self.authority.as_deref().unwrap_or(CONTENT_AUTHORITY))
    }

    pub fn sort_column(&self) -> crate::Result<Option<TeaColumn>> {
        self.default_sort.as_deref().map(str::parse).transpose()
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("tea-inventory.toml")
}

pub fn default_database_path_in(base: &Path) -> PathBuf {
    base.join(".tea-inventory").join("teas.db")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<InventoryConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: InventoryConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &InventoryConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tea-inventory.toml");
        let config = InventoryConfig {
            database: Some("shop.db".to_string()),
            authority: Some("shop.teas".to_string()),
            default_sort: Some("name".to_string()),
        };

        write_config(&path, &config, false).unwrap();
        assert!(write_config(&path, &config, false).is_err());
        write_config(&path, &config, true).unwrap();

        let loaded = load_config(Some(&path)).unwrap().unwrap();
        assert_eq!(loaded.database.as_deref(), Some("shop.db"));
        assert_eq!(loaded.uris().authority(), "shop.teas");
        assert_eq!(loaded.sort_column().unwrap(), Some(TeaColumn::Name));
    }

    #[test]
    fn test_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("absent.toml"))).unwrap().is_none());
        assert_eq!(InventoryConfig::default().uris(), TeaUris::default());
    }

    #[test]
    fn test_ensure_db_dir() {
        let dir = tempfile::tempdir().unwrap();
        let db = default_database_path_in(dir.path());
        ensure_db_dir(&db).unwrap();
        assert!(db.parent().unwrap().is_dir());
    }
}
