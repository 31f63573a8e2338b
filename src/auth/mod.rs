//! Entry-page authentication helpers: form validation and post-login routing.

pub mod form;
pub mod landing;

pub use form::{AuthForm, AuthMode};
pub use landing::{Destination, landing_for, onboarding_completed};
