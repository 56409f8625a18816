//! Business rules of murmur.
//!
//! Services are cheap to clone and hold no state of their own,
//! everything lives behind the storage traits in [`crate::store`].
mod follows;
mod posts;
mod timeline;
mod users;

pub use self::follows::FollowGraphService;
pub use self::posts::PostService;
pub use self::timeline::TimelineAggregator;
pub use self::users::UserService;
