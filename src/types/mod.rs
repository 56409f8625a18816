pub mod id;

pub use id::{Id, PostId, UserId};
