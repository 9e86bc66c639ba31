// Messaging - Forwarding conductor events to other threads

pub mod channels;
pub mod event;

pub use channels::{EventConsumer, EventProducer, create_event_channel};
pub use event::{ConductorEvent, ForwardingListener};
