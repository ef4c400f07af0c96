pub mod cancel;
pub mod client;
pub mod error;
pub mod normalize;
pub mod parse;
pub mod pipeline;
pub mod price;
pub mod sink;

pub use cancel::CancelSignal;
pub use client::{FeedBody, FeedClient, FeedSource, DEFAULT_MAX_BODY_BYTES};
pub use error::ScraperError;
pub use normalize::map_record;
pub use parse::{parse_feed, ParseOptions, ParsedUnit, StructuralSkip};
pub use pipeline::{run, FeedRequest};
pub use sink::{CallbackSink, ProgressSink, TracingSink};
