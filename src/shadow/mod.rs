pub mod client;
pub mod poller;
pub mod state;

pub use client::{NetpieShadowClient, ShadowError, ShadowFields, ShadowSource};
pub use poller::{Poller, PollerHandle, POLL_INTERVAL_MS};
pub use state::DashboardState;
