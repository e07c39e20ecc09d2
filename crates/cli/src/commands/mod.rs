pub mod cache;
pub mod collect;
pub mod dependencies;
pub mod dist;
pub mod schema;
