//! The privacy predicate.

use std::sync::Arc;

use public_tables_store::PublicTableStore;

use crate::error::Result;

/// Answers "is this table public" from the store.
///
/// Re-reads the store on every call; there is no cache to invalidate when a
/// table is toggled.
pub struct PrivacyPredicate<S: PublicTableStore + ?Sized> {
    store: Arc<S>,
}

impl<S: PublicTableStore + ?Sized> PrivacyPredicate<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Whether the named table is public.
    pub async fn is_table_public(&self, table_name: &str) -> Result<bool> {
        Ok(self.store.is_public(table_name).await?)
    }
}

impl<S: PublicTableStore + ?Sized> Clone for PrivacyPredicate<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use public_tables_store::MemoryStore;

    #[tokio::test]
    async fn test_follows_store() {
        let store = Arc::new(MemoryStore::new());
        let predicate = PrivacyPredicate::new(Arc::clone(&store));

        assert!(!predicate.is_table_public("t1").await.unwrap());

        store.set_public("t1").await.unwrap();
        assert!(predicate.is_table_public("t1").await.unwrap());

        store.set_private("t1").await.unwrap();
        assert!(!predicate.is_table_public("t1").await.unwrap());
    }
}
