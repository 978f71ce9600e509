pub mod health;
pub mod mr_comment_delete;

pub use health::*;
pub use mr_comment_delete::*;
