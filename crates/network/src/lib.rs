//! The gossip layer: a bounded-memory inbound handler plus an outbound
//! coordinator that deduplicates, rate-gates, and batches before handing
//! bytes to a transport.

mod clock;
mod config;
mod handler;
mod network;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{GossipConfig, DEFAULT_ETH_MSG_SOFT_CAP_SIZE};
pub use handler::GossipHandler;
pub use network::{NetworkHandle, NoopNetwork, PushGossipNetwork};
