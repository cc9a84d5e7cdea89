pub mod paths;
pub mod ports;

pub use ports::{PageCache, PageCacheError, PageKey};
