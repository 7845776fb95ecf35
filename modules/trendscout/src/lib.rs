pub mod aggregate;
pub mod queries;
pub mod scorer;
pub mod scout;
pub mod search;
pub mod store;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;
