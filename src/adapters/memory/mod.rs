//! In-process adapters: the connection registry, delivery sinks, and a
//! connector that needs no network.

mod channel_sink;
mod in_process;
mod recording_sink;
mod registry;

pub use channel_sink::{ChannelSink, DEFAULT_QUEUE_CAPACITY};
pub use in_process::InProcessConnector;
pub use recording_sink::RecordingSink;
pub use registry::InMemoryConnectionRegistry;
