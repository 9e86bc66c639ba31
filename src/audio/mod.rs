// Audio module - Playback clocks feeding the conductor

pub mod timing;
