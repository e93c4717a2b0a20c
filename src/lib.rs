//! Bookstore application library
//!
//! Wires the books module and the database core module into a registry that
//! the HTTP layer serves.

pub mod modules;

use std::sync::Arc;

use bookstore_db::{Database, DbModule};
use bookstore_kernel::ModuleRegistry;

/// Registry holding the database core module and every custom module
pub fn build_registry(db: &Database) -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    registry.register_core(Arc::new(DbModule::new(db.clone())));
    modules::register_all(&mut registry, db)?;
    Ok(registry)
}
