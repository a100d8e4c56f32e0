//! A thread-safe handle to a hot-reloadable schema.
//!
//! The query layer's own functions are pure and take `&Schema` (§4.1: "pure, no
//! I/O"). `SchemaCacheRef` exists for the host process, which typically loads the
//! schema once at startup and may refresh it periodically; it hands out read guards
//! so request handlers never block each other, matching how `postrust-core`'s
//! `SchemaCacheRef` fronts its own schema cache.

use crate::schema::Schema;
use std::sync::{Arc, RwLock, RwLockReadGuard};

/// A shared, swappable handle to the current schema.
#[derive(Clone, Default)]
pub struct SchemaCacheRef {
    inner: Arc<RwLock<Option<Schema>>>,
}

impl SchemaCacheRef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schema(schema: Schema) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(schema))),
        }
    }

    /// Replace the current schema, e.g. after a scheduled reload.
    pub fn set(&self, schema: Schema) {
        let mut guard = self.inner.write().expect("schema cache lock poisoned");
        *guard = Some(schema);
        tracing::debug!("schema cache updated");
    }

    /// Borrow the current schema, if one has been loaded.
    pub fn get(&self) -> Option<SchemaGuard<'_>> {
        let guard = self.inner.read().expect("schema cache lock poisoned");
        if guard.is_some() {
            Some(SchemaGuard(guard))
        } else {
            None
        }
    }
}

/// A read guard over the currently loaded schema.
pub struct SchemaGuard<'a>(RwLockReadGuard<'a, Option<Schema>>);

impl std::ops::Deref for SchemaGuard<'_> {
    type Target = Schema;

    fn deref(&self) -> &Schema {
        self.0.as_ref().expect("SchemaGuard constructed from an empty cache")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::Class;

    #[test]
    fn empty_cache_returns_none() {
        let cache = SchemaCacheRef::new();
        assert!(cache.get().is_none());
    }

    #[test]
    fn set_then_get_returns_loaded_schema() {
        let cache = SchemaCacheRef::new();
        cache.set(Schema::new().with_class(Class::new("Disease")));
        let guard = cache.get().expect("schema should be loaded");
        assert!(guard.has("Disease"));
    }
}
