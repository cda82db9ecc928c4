//! Common test utilities for evict-efile integration tests

#[allow(dead_code)]
pub mod fixtures;
#[allow(dead_code)]
pub mod live;

#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use live::*;
