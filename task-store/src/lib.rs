pub mod document;
pub mod error;
pub mod store;

pub use document::Document;
pub use error::StoreError;
pub use store::{DocumentStore, SaveReport};
