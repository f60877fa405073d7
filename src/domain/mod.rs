mod money;
mod record;
mod tables;

pub use money::*;
pub use record::*;
pub use tables::*;
