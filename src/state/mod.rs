pub mod code_pool;
pub mod signup_store;

pub use code_pool::CodePool;
pub use signup_store::{create_shared_signup_store, NewSignup, Registration, SharedSignupStore};
