pub mod documents;
pub mod error;
pub mod io;
pub mod model;
pub mod normalize;
pub mod quiz;
pub mod sync;

pub use error::{Result, ToolError};
