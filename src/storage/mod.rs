pub mod orders;
pub mod s3;

pub use orders::OrderStore;
pub use s3::S3Client;
