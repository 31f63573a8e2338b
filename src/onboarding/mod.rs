//! Onboarding system — the seven-step profile questionnaire.
//!
//! A newly registered artist answers six questions about how they want to
//! take part in the community, reviews a summary, and saves. The saved
//! profile document marks `onboardingCompleted`, which decides where the
//! subject lands on later visits.

pub mod model;
pub mod routes;
pub mod session;
pub mod state;
pub mod wizard;

pub use model::{AnswerSet, Choice, FieldUpdate, ProfileDocument, WizardSummary};
pub use routes::{OnboardingRouteState, OnboardingStatus, onboarding_routes};
pub use session::{OnboardingSession, redirect_target};
pub use state::WizardStep;
pub use wizard::{OnboardingWizard, SaveTask};
