use std::{
    any::{TypeId, type_name},
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

use once_cell::sync::Lazy;

use super::{TagError, TagTable};
use crate::decoder::Aggregate;

static TABLES: Lazy<RwLock<HashMap<TypeId, Arc<TagTable>>>> = Lazy::new(Default::default);

/// Returns the tag table of `A`, building and caching it on first use.
///
/// A table is published only once it is complete. When two threads build the
/// same table concurrently the first one to publish wins and both get that
/// table. A failed build is not cached.
///
/// # Errors
///
/// Returns the [`TagError`] of an invalid field annotation.
pub fn resolve<A: Aggregate>() -> Result<Arc<TagTable>, TagError> {
    let id = TypeId::of::<A>();
    if let Some(table) = TABLES
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&id)
    {
        return Ok(Arc::clone(table));
    }

    let table = Arc::new(TagTable::build(A::FIELDS, A::CUSTOM_DECODE, A::VALIDATES)?);
    log::trace!(
        "built tag table for {} with {} fields",
        type_name::<A>(),
        table.len()
    );
    let mut tables = TABLES.write().unwrap_or_else(PoisonError::into_inner);
    Ok(Arc::clone(tables.entry(id).or_insert(table)))
}

#[cfg(test)]
pub(crate) fn is_cached<A: Aggregate>() -> bool {
    TABLES
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .contains_key(&TypeId::of::<A>())
}
