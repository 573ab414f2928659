mod image_feed;
mod record;

pub use image_feed::{FeedAction, FetchOutcome, ImageFeed};
pub use record::ImageRecord;
