pub mod error_sink;
pub mod logging;

pub use error_sink::{BroadcastSink, CollectingSink, ErrorSink, TracingSink};
