pub mod books;

use sea_orm::DatabaseConnection;
use stacks_kernel::ModuleRegistry;

/// Register all project-specific modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, db: &DatabaseConnection) {
    registry.register_custom(books::create_module(books::store::BookStore::new(db.clone())));
}
