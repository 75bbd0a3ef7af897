pub mod storage;
pub mod types;

pub use storage::load_assessment;
pub use types::{Assessment, Component};
