//! Persistence of calibrated layouts and background templates.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use tracing::{debug, warn};

use crate::error::{AppError, Result};
use crate::form_type::FormType;
use crate::images::decode_base64;
use crate::layout::{resolve_layout, Layout, StoredLayout};

// ============================================================================
// Key-Value Backends
// ============================================================================

/// String-keyed, string-valued persistent storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn put(&mut self, key: &str, value: &str) -> Result<()>;
    fn delete(&mut self, key: &str) -> Result<()>;
}

/// One file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)
            .map_err(|e| AppError::StoreError(format!("{}: {}", root.display(), e)))?;
        Ok(FileStore { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.root.join(name)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::StoreError(format!("{}: {}", path.display(), e))),
        }
    }

    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let staging = path.with_extension("partial");
        fs::write(&staging, value)
            .and_then(|_| fs::rename(&staging, &path))
            .map_err(|e| AppError::StoreError(format!("{}: {}", path.display(), e)))
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::StoreError(format!("{}: {}", path.display(), e))),
        }
    }
}

/// In-process store. `unavailable()` builds one that fails every call.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    unavailable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unavailable() -> Self {
        MemoryStore {
            entries: HashMap::new(),
            unavailable: true,
        }
    }

    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    fn check(&self) -> Result<()> {
        if self.unavailable {
            Err(AppError::StoreError("store is offline".to_string()))
        } else {
            Ok(())
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.check()?;
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        self.check()?;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.check()?;
        self.entries.remove(key);
        Ok(())
    }
}

// ============================================================================
// Layout Store
// ============================================================================

/// Per-form-type layouts and templates on top of a key-value backend.
#[derive(Debug, Clone)]
pub struct LayoutStore<S> {
    kv: S,
}

impl<S: KeyValueStore> LayoutStore<S> {
    pub fn new(kv: S) -> Self {
        LayoutStore { kv }
    }

    pub fn backend(&self) -> &S {
        &self.kv
    }

    pub fn backend_mut(&mut self) -> &mut S {
        &mut self.kv
    }

    pub fn get_layout(&self, form_type: FormType) -> Result<Option<StoredLayout>> {
        let key = form_type.layout_key();
        match self.kv.get(&key)? {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| AppError::StoreError(format!("{}: corrupt layout: {}", key, e))),
            None => Ok(None),
        }
    }

    pub fn put_layout(&mut self, form_type: FormType, layout: &StoredLayout) -> Result<()> {
        let json = serde_json::to_string(layout)
            .map_err(|e| AppError::StoreError(e.to_string()))?;
        self.kv.put(&form_type.layout_key(), &json)?;
        debug!(%form_type, fields = layout.len(), "layout saved");
        Ok(())
    }

    pub fn delete_override(&mut self, form_type: FormType) -> Result<()> {
        self.kv.delete(&form_type.layout_key())
    }

    /// Stored bytes that are not base64 are a `TemplateError`, not a `StoreError`.
    pub fn get_template(&self, form_type: FormType) -> Result<Option<Vec<u8>>> {
        let key = form_type.template_key();
        match self.kv.get(&key)? {
            Some(encoded) => decode_base64(&encoded)
                .map(Some)
                .map_err(|e| AppError::TemplateError(format!("{}: {}", key, e))),
            None => Ok(None),
        }
    }

    pub fn put_template(&mut self, form_type: FormType, image: &[u8]) -> Result<()> {
        self.kv.put(&form_type.template_key(), &B64.encode(image))
    }

    /// Layout to draw with. A store that cannot be read counts as having no override.
    pub fn resolve(&self, form_type: FormType) -> Layout {
        let stored = self.get_layout(form_type).unwrap_or_else(|e| {
            warn!(%form_type, error = %e, "custom layout unavailable, using defaults");
            None
        });
        resolve_layout(form_type, stored.as_ref())
    }

    /// Whether each form type has an imported template.
    pub fn template_status(&self) -> Vec<(FormType, bool)> {
        FormType::ALL
            .into_iter()
            .map(|t| {
                let present = match self.kv.get(&t.template_key()) {
                    Ok(v) => v.is_some(),
                    Err(e) => {
                        warn!(form_type = %t, error = %e, "template status unknown");
                        false
                    }
                };
                (t, present)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Point;
    use pretty_assertions::assert_eq;

    fn sample() -> StoredLayout {
        let mut stored = StoredLayout::new();
        stored.insert("farmer_id".to_string(), Point { x: 1.5, y: 2.25 });
        stored
    }

    #[test]
    fn layouts_are_keyed_per_form_type() {
        let mut store = LayoutStore::new(MemoryStore::new());
        store.put_layout(FormType::Adss, &sample()).unwrap();

        assert_eq!(store.get_layout(FormType::Adss).unwrap(), Some(sample()));
        assert_eq!(store.get_layout(FormType::Crop).unwrap(), None);
        assert!(store.backend().get("pdf_layout_adss").unwrap().is_some());

        store.delete_override(FormType::Adss).unwrap();
        assert_eq!(store.get_layout(FormType::Adss).unwrap(), None);
    }

    #[test]
    fn resolve_falls_back_when_store_is_down() {
        let mut store = LayoutStore::new(MemoryStore::new());
        store.put_layout(FormType::Crop, &sample()).unwrap();
        store.backend_mut().set_unavailable(true);

        let layout = store.resolve(FormType::Crop);
        assert_eq!(layout, Layout::default_for(FormType::Crop));
        assert!(store.put_layout(FormType::Crop, &sample()).is_err());
    }

    #[test]
    fn corrupt_layout_is_a_store_error() {
        let mut kv = MemoryStore::new();
        kv.put("pdf_layout_banca", "{not json").unwrap();
        let store = LayoutStore::new(kv);
        assert!(matches!(store.get_layout(FormType::Banca), Err(AppError::StoreError(_))));
        assert_eq!(store.resolve(FormType::Banca), Layout::default_for(FormType::Banca));
    }

    #[test]
    fn templates_round_trip_as_base64() {
        let mut store = LayoutStore::new(MemoryStore::new());
        store.put_template(FormType::Livestock, &[0xFF, 0xD8, 0x00, 0x42]).unwrap();
        assert_eq!(
            store.get_template(FormType::Livestock).unwrap(),
            Some(vec![0xFF, 0xD8, 0x00, 0x42])
        );
        let status = store.template_status();
        assert_eq!(
            status,
            vec![
                (FormType::Crop, false),
                (FormType::Livestock, true),
                (FormType::Adss, false),
                (FormType::Banca, false),
            ]
        );
    }

    #[test]
    fn corrupt_template_is_a_template_error() {
        let mut kv = MemoryStore::new();
        kv.put("pdf_template_adss", "%%% not base64 %%%").unwrap();
        let store = LayoutStore::new(kv);
        assert!(matches!(store.get_template(FormType::Adss), Err(AppError::TemplateError(_))));

        let store = LayoutStore::new(MemoryStore::unavailable());
        assert!(matches!(store.get_template(FormType::Adss), Err(AppError::StoreError(_))));
    }

    #[test]
    fn default_layout_round_trips_exactly() {
        let stored = Layout::default_for(FormType::Crop).to_stored();
        let mut store = LayoutStore::new(MemoryStore::new());
        store.put_layout(FormType::Crop, &stored).unwrap();
        assert_eq!(store.get_layout(FormType::Crop).unwrap(), Some(stored));
    }

    #[test]
    fn file_store_persists_between_instances() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = LayoutStore::new(FileStore::open(dir.path()).unwrap());
            store.put_layout(FormType::Crop, &sample()).unwrap();
        }
        let store = LayoutStore::new(FileStore::open(dir.path()).unwrap());
        assert_eq!(store.get_layout(FormType::Crop).unwrap(), Some(sample()));
        assert!(dir.path().join("pdf_layout").exists());
    }

    #[test]
    fn file_store_delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut kv = FileStore::open(dir.path()).unwrap();
        kv.delete("pdf_layout").unwrap();
        kv.put("pdf_layout", "{}").unwrap();
        kv.delete("pdf_layout").unwrap();
        assert_eq!(kv.get("pdf_layout").unwrap(), None);
    }
}
