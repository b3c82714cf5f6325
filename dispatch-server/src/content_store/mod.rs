mod models;
mod schema;
mod store;
mod trait_def;

pub use models::*;
pub use schema::CONTENT_VERSIONED_SCHEMAS;
pub use store::SqliteContentStore;
pub use trait_def::ContentStore;
