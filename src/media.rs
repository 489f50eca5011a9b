// author: kodeholic (powered by Claude)

pub mod net;

pub use net::{handle_datagram, run_udp_listener};
