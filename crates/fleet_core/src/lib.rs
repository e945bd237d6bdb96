pub mod dispatch;
pub mod entities;
pub mod environment;
pub mod error;
pub mod grid;
pub mod render;
pub mod routing;
pub mod scenario;
#[cfg(feature = "test-helpers")]
pub mod test_helpers;
