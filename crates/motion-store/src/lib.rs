pub mod error;
pub mod schema;
pub mod store;
pub mod time;

pub use error::{Result, StoreError};
pub use store::{BaselineStore, StoredBaseline, default_base_dir};
