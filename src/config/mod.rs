pub mod key_pool;

pub use key_pool::KeyPoolConfig;
