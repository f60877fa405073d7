pub mod application;
pub mod cli;
pub mod domain;
pub mod io;
pub mod storage;

pub use application::{WrappedEngine, WrappedService, WrappedSummary};
pub use domain::*;
pub use storage::{MemoryStore, RecordStore, Repository};
