// Communication channels lock-free
// Conductor thread → UI/animation thread

use crate::messaging::event::ConductorEvent;
use ringbuf::{HeapRb, traits::Split};

pub type EventProducer = ringbuf::HeapProd<ConductorEvent>;
pub type EventConsumer = ringbuf::HeapCons<ConductorEvent>;

pub fn create_event_channel(capacity: usize) -> (EventProducer, EventConsumer) {
    let rb = HeapRb::<ConductorEvent>::new(capacity);
    rb.split()
}
