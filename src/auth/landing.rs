//! Where a subject lands after authentication.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StoreError;
use crate::identity::Subject;
use crate::store::ProfileStore;

/// Profile document field marking a finished questionnaire.
pub const ONBOARDING_COMPLETED_FIELD: &str = "onboardingCompleted";

/// Named navigation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    /// Marketing / login page.
    Entry,
    Onboarding,
    /// Welcome screen of the dashboard.
    Dashboard,
}

impl Destination {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Entry => "/",
            Self::Onboarding => "/onboarding",
            Self::Dashboard => "/bienvenidos",
        }
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Whether a stored profile document says onboarding is finished.
pub fn onboarding_completed(data: Option<&serde_json::Value>) -> bool {
    data.and_then(|d| d.get(ONBOARDING_COMPLETED_FIELD))
        .and_then(|v| v.as_bool())
        .unwrap_or(false)
}

/// Route a freshly authenticated subject to the questionnaire or the dashboard.
pub async fn landing_for(
    store: &dyn ProfileStore,
    collection: &str,
    subject: &Subject,
) -> Result<Destination, StoreError> {
    let snapshot = store.read(collection, &subject.id).await?;
    let destination = if snapshot.exists && onboarding_completed(snapshot.data.as_ref()) {
        Destination::Dashboard
    } else {
        Destination::Onboarding
    };
    debug!(subject = %subject.id, %destination, "Resolved landing page");
    Ok(destination)
}
