mod common;
mod document;
mod usage;

pub use common::*;
pub use document::*;
pub use usage::*;
