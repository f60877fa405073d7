// Application layer - the year-in-review engine and the service that feeds it

pub mod engine;
pub mod error;
pub mod service;
pub mod summary;

pub use engine::*;
pub use error::*;
pub use service::*;
pub use summary::*;
