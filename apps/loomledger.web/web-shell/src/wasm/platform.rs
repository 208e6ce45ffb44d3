use super::*;

/// `window.localStorage`. Every call re-resolves the storage object so a
/// page that loses storage access degrades per call instead of at boot.
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct LocalStorageStore;

impl LocalStorageStore {
    fn storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .and_then(|window| window.local_storage().ok().flatten())
            .ok_or(StorageError::Unavailable)
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::storage()?.get_item(key).map_err(|_| StorageError::Read {
            key: key.to_string(),
        })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|_| StorageError::Write {
                key: key.to_string(),
            })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        Self::storage()?
            .remove_item(key)
            .map_err(|_| StorageError::Write {
                key: key.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub(super) struct LocationNavigator;

impl Navigator for LocationNavigator {
    fn current_path(&self) -> String {
        current_pathname()
    }

    fn hard_redirect(&self, path: &str) {
        let Ok(window) = window() else {
            tracing::error!(path, "cannot redirect without a window");
            return;
        };
        if window.location().set_href(path).is_err() {
            tracing::error!(path, "failed to redirect");
        }
    }
}
