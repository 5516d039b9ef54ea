pub mod compression;
pub mod models;

// 重新导出常用类型和函数
pub use compression::{from_compressed, to_compressed, validate_compressed_data, STORE_VERSION};
pub use models::{PostRecord, StoreMetadata, StorePayload};
