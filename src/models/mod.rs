mod category;
mod resource;

pub use category::{Category, CategoryFilter, StoredCategory};
pub use resource::{NewResource, Resource, ResourceFilter};
