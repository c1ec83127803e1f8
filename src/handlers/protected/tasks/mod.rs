mod collection;
mod record;

pub use collection::{collection_get, collection_post};
pub use record::{completed_patch, record_delete, record_get, record_put, status_patch};
