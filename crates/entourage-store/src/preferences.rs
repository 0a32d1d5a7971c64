use crate::error::{Result, StoreError};
use entourage_core::PreferenceStorage;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// String preferences kept as a flat JSON object on disk.
///
/// Writes replace the whole file via a temporary sibling and a rename.
#[derive(Debug, Clone)]
pub struct FilePreferences {
    path: PathBuf,
}

impl FilePreferences {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&contents)? {
            Value::Object(map) => Ok(map),
            _ => Err(StoreError::InvalidDataPath(self.path.clone())),
        }
    }

    fn write_all(&self, items: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(items)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl PreferenceStorage for FilePreferences {
    type Error = StoreError;

    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let items = self.read_all()?;
        Ok(items
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        let mut items = self.read_all()?;
        items.insert(key.to_string(), Value::String(value.to_string()));
        self.write_all(&items)
    }
}

#[cfg(test)]
mod tests {
    use super::FilePreferences;
    use entourage_core::PreferenceStorage;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn missing_file_reads_as_empty() {
        let temp = TempDir::new().expect("tempdir");
        let prefs = FilePreferences::new(temp.path().join("preferences.json"));
        assert_eq!(prefs.get_item("theme").expect("get"), None);
    }

    #[test]
    fn set_item_keeps_other_keys() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("preferences.json");
        fs::write(&path, r#"{"locale":"en"}"#).expect("seed");

        let mut prefs = FilePreferences::new(&path);
        prefs.set_item("theme", "dark").expect("set");

        let reopened = FilePreferences::new(&path);
        assert_eq!(reopened.get_item("theme").expect("get").as_deref(), Some("dark"));
        assert_eq!(reopened.get_item("locale").expect("get").as_deref(), Some("en"));
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("preferences.json");
        fs::write(&path, "{not json").expect("seed");
        assert!(FilePreferences::new(&path).get_item("theme").is_err());
    }
}
