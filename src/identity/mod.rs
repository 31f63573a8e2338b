//! Identity provider seam — who is signed in.

pub mod model;
pub mod provider;

pub use model::{AuthState, Subject};
pub use provider::{IdentityProvider, LocalIdentityProvider};
