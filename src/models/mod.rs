mod baby;
mod feed;
mod feed_type;

pub use baby::Baby;
pub use feed::Feed;
pub use feed_type::FeedType;
