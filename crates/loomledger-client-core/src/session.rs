use crate::storage::{ACCESS_TOKEN_KEY, KeyValueStore, StorageError};

pub const ROOT_PATH: &str = "/";

/// Page-level navigation owned by the host document.
pub trait Navigator {
    fn current_path(&self) -> String;
    /// Full document navigation, not a history push.
    fn hard_redirect(&self, path: &str);
}

impl<N: Navigator + ?Sized> Navigator for std::rc::Rc<N> {
    fn current_path(&self) -> String {
        (**self).current_path()
    }

    fn hard_redirect(&self, path: &str) {
        (**self).hard_redirect(path);
    }
}

/// Holds the bearer token under [`ACCESS_TOKEN_KEY`]. The token is opaque: no
/// shape validation happens here.
#[derive(Debug, Clone, Default)]
pub struct SessionStore<S> {
    store: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn set_token(&self, token: &str) -> Result<(), StorageError> {
        self.store.set(ACCESS_TOKEN_KEY, token)
    }

    /// Stored token, with an empty value treated as absent. Read failures are
    /// logged and also read as absent.
    pub fn token(&self) -> Option<String> {
        match self.store.get(ACCESS_TOKEN_KEY) {
            Ok(token) => token.filter(|token| !token.is_empty()),
            Err(error) => {
                tracing::warn!(%error, "failed to read access token");
                None
            }
        }
    }

    pub fn remove_token(&self) -> Result<(), StorageError> {
        self.store.remove(ACCESS_TOKEN_KEY)
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn logout(&self, navigator: &impl Navigator) {
        if let Err(error) = self.remove_token() {
            tracing::warn!(%error, "failed to clear access token during logout");
        }
        navigator.hard_redirect(ROOT_PATH);
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingNavigator;
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn token_round_trips_and_clears() {
        let session = SessionStore::new(MemoryStore::default());
        assert!(!session.is_authenticated());

        session.set_token("tok-1").expect("set token");
        assert_eq!(session.token().as_deref(), Some("tok-1"));
        assert!(session.is_authenticated());

        session.remove_token().expect("remove token");
        assert_eq!(session.token(), None);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn empty_token_reads_as_unauthenticated() {
        let session = SessionStore::new(MemoryStore::with_entries([(ACCESS_TOKEN_KEY, "")]));
        assert_eq!(session.token(), None);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn logout_clears_token_and_redirects_to_root() {
        let session = SessionStore::new(MemoryStore::default());
        session.set_token("tok-1").expect("set token");
        let navigator = RecordingNavigator::at("/invoices");

        session.logout(&navigator);

        assert!(!session.is_authenticated());
        assert_eq!(*navigator.redirects.borrow(), vec!["/".to_string()]);
    }
}
