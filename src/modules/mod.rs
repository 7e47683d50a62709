pub mod books;

use bookshelf_kernel::ModuleRegistry;

use books::store::SharedStore;

/// Register all project-specific modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, store: SharedStore) {
    registry.register_custom(books::create_module(store));
}
