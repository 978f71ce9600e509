pub mod error;
pub mod health;
pub mod mr_comment;

pub use error::*;
pub use health::*;
pub use mr_comment::*;
