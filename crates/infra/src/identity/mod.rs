//! Identity-provider clients.

pub mod identity_toolkit;
pub mod in_memory;

pub use identity_toolkit::{IdentityToolkitProvider, IdentityToolkitSettings};
pub use in_memory::{FixtureError, InMemoryIdentityProvider};
