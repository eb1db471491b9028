pub mod inspection_store;
pub mod list_codec;
pub mod manager;
pub mod models;
pub mod query_builder;
pub mod record;
pub mod repository;
pub mod service;

pub use inspection_store::InspectionStore;
pub use list_codec::{codec_for, ListCodec};
pub use manager::{DatabaseError, DatabaseManager};
pub use query_builder::{InspectionListParams, InspectionListQuery};
pub use repository::Repository;
