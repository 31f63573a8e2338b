//! OnboardingSession — mounts a wizard for the signed-in subject and owns
//! its in-flight profile write.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::auth::Destination;
use crate::config::OnboardingConfig;
use crate::error::OnboardingError;
use crate::identity::{AuthState, IdentityProvider, Subject};
use crate::store::ProfileStore;

use super::wizard::{OnboardingWizard, SaveTask};

/// Where the caller should navigate after a session-level failure, if anywhere.
pub fn redirect_target(err: &OnboardingError) -> Option<Destination> {
    match err {
        OnboardingError::NotAuthenticated => Some(Destination::Entry),
        _ => None,
    }
}

/// A mounted onboarding flow.
///
/// Dropping the session while a save is in flight detaches the write: it
/// keeps running in the background and its result is discarded.
pub struct OnboardingSession {
    identity: Arc<dyn IdentityProvider>,
    wizard: OnboardingWizard,
    pending: Option<SaveTask>,
}

impl OnboardingSession {
    /// Wait for the identity provider to resolve and mount the wizard.
    ///
    /// Fails with `NotAuthenticated` when nobody is signed in; see
    /// [`redirect_target`].
    pub async fn mount(
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn ProfileStore>,
        config: OnboardingConfig,
    ) -> Result<Self, OnboardingError> {
        let subject = identity.resolved().await.map_err(|e| {
            warn!(error = %e, "Identity provider unavailable");
            OnboardingError::NotAuthenticated
        })?;

        let Some(subject) = subject else {
            info!("No subject signed in, leaving onboarding");
            return Err(OnboardingError::NotAuthenticated);
        };

        info!(subject = %subject.id, "Onboarding mounted");
        Ok(Self {
            identity,
            wizard: OnboardingWizard::new(store, config),
            pending: None,
        })
    }

    /// The subject signed in right now.
    pub fn subject(&self) -> Option<Subject> {
        self.identity.current_subject()
    }

    /// Auth-state changes after mount.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.identity.subscribe()
    }

    /// Resolves once the subject is no longer signed in, with where to go.
    pub async fn signed_out(&self) -> Destination {
        let mut rx = self.identity.subscribe();
        loop {
            if rx.borrow_and_update().subject().is_none() {
                break;
            }
            if rx.changed().await.is_err() {
                break;
            }
        }
        info!("Subject signed out during onboarding");
        Destination::Entry
    }

    pub fn wizard(&self) -> &OnboardingWizard {
        &self.wizard
    }

    pub fn wizard_mut(&mut self) -> &mut OnboardingWizard {
        &mut self.wizard
    }

    pub fn has_pending_save(&self) -> bool {
        self.pending.is_some()
    }

    /// Save the answers for the current subject and wait for the result.
    pub async fn save(&mut self) -> Result<(), OnboardingError> {
        self.begin_save()?;
        self.await_save().await
    }

    /// Start saving for whoever is signed in now.
    pub fn begin_save(&mut self) -> Result<(), OnboardingError> {
        if self.pending.is_some() {
            return Err(OnboardingError::SaveInProgress);
        }
        let subject = self.identity.current_subject();
        let task = self.wizard.begin_commit(subject.as_ref())?;
        self.pending = Some(task);
        Ok(())
    }

    /// Wait for the save started by [`begin_save`](Self::begin_save). A no-op
    /// when nothing is in flight.
    pub async fn await_save(&mut self) -> Result<(), OnboardingError> {
        match self.pending.take() {
            Some(task) => self.wizard.finish_commit(task).await,
            None => Ok(()),
        }
    }

    /// Cancel the in-flight save and reconcile the wizard state.
    pub async fn abort_save(&mut self) -> Result<(), OnboardingError> {
        if let Some(task) = self.pending.as_ref() {
            task.abort();
        }
        self.await_save().await
    }

    /// End the session.
    pub fn teardown(self) {
        drop(self);
    }
}

impl Drop for OnboardingSession {
    fn drop(&mut self) {
        if let Some(task) = self.pending.take() {
            task.detach();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::identity::LocalIdentityProvider;
    use crate::onboarding::model::{
        Activity, Agreement, ArtisticFocus, ArtistRole, Benefit, Contribution, FieldUpdate,
    };
    use crate::onboarding::state::WizardStep;
    use crate::onboarding::wizard::{MSG_NO_SUBJECT, MSG_SAVED};
    use crate::store::MemoryProfileStore;
    use crate::store::memory::GatedProfileStore;

    fn fill(session: &mut OnboardingSession) {
        let wizard = session.wizard_mut();
        let updates = [
            FieldUpdate::Role(ArtistRole::Collaborator),
            FieldUpdate::Contribution(Contribution::SpecificProjects),
            FieldUpdate::Agreement(Agreement::OneOffCollaboration),
            FieldUpdate::ToggleActivity(Activity::ContentCollaborations),
            FieldUpdate::ToggleBenefit(Benefit::OccasionalCollaborations),
            FieldUpdate::ArtisticFocus(ArtisticFocus::TemporaryCollaborations),
        ];
        for update in updates {
            wizard.set_field(update);
            wizard.advance().unwrap();
        }
        assert_eq!(wizard.step(), WizardStep::Summary);
    }

    #[tokio::test]
    async fn mount_without_subject_redirects_to_entry() {
        let identity = Arc::new(LocalIdentityProvider::signed_out());
        let result = OnboardingSession::mount(
            identity,
            Arc::new(MemoryProfileStore::new()),
            OnboardingConfig::default(),
        )
        .await;
        let err = result.err().unwrap();
        assert!(matches!(err, OnboardingError::NotAuthenticated));
        assert_eq!(redirect_target(&err), Some(Destination::Entry));
    }

    #[tokio::test]
    async fn mount_waits_for_pending_provider() {
        let identity = Arc::new(LocalIdentityProvider::new());
        let mounting = {
            let identity: Arc<dyn IdentityProvider> = identity.clone();
            tokio::spawn(async move {
                OnboardingSession::mount(
                    identity,
                    Arc::new(MemoryProfileStore::new()),
                    OnboardingConfig::default(),
                )
                .await
                .map(|s| s.subject())
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        identity.sign_in(Subject::new("u7"));

        let subject = mounting.await.unwrap().unwrap();
        assert_eq!(subject.map(|s| s.id), Some("u7".to_string()));
    }

    #[tokio::test]
    async fn save_uses_current_subject() {
        let identity = Arc::new(LocalIdentityProvider::signed_in(Subject::new("u1")));
        let store = Arc::new(MemoryProfileStore::new());
        let mut session =
            OnboardingSession::mount(identity, store.clone(), OnboardingConfig::default())
                .await
                .unwrap();
        fill(&mut session);

        session.save().await.unwrap();
        assert_eq!(session.wizard().result_message(), MSG_SAVED);
        assert!(store.read("userProfiles", "u1").await.unwrap().exists);
    }

    #[tokio::test]
    async fn sign_out_after_mount_redirects_to_entry() {
        let identity = Arc::new(LocalIdentityProvider::signed_in(Subject::new("u1")));
        let session = OnboardingSession::mount(
            identity.clone(),
            Arc::new(MemoryProfileStore::new()),
            OnboardingConfig::default(),
        )
        .await
        .unwrap();
        assert!(session.subscribe().borrow().subject().is_some());

        let signer = {
            let identity = Arc::clone(&identity);
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(10)).await;
                identity.sign_out();
            })
        };
        let destination = tokio::time::timeout(Duration::from_secs(1), session.signed_out())
            .await
            .unwrap();
        assert_eq!(destination, Destination::Entry);
        assert!(session.subject().is_none());
        signer.await.unwrap();
    }

    #[tokio::test]
    async fn save_after_sign_out_fails_without_writing() {
        let identity = Arc::new(LocalIdentityProvider::signed_in(Subject::new("u1")));
        let store = Arc::new(MemoryProfileStore::new());
        let mut session =
            OnboardingSession::mount(identity.clone(), store.clone(), OnboardingConfig::default())
                .await
                .unwrap();
        fill(&mut session);

        identity.sign_out();
        let err = session.save().await.unwrap_err();
        assert!(matches!(err, OnboardingError::NotAuthenticated));
        assert_eq!(session.wizard().error_message(), MSG_NO_SUBJECT);
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn begin_save_twice_is_refused() {
        let identity = Arc::new(LocalIdentityProvider::signed_in(Subject::new("u1")));
        let store = Arc::new(GatedProfileStore::new());
        let mut session =
            OnboardingSession::mount(identity, store.clone(), OnboardingConfig::default())
                .await
                .unwrap();
        fill(&mut session);

        session.begin_save().unwrap();
        assert!(session.has_pending_save());
        assert!(matches!(
            session.begin_save().unwrap_err(),
            OnboardingError::SaveInProgress
        ));

        store.open(1);
        session.await_save().await.unwrap();
        assert!(!session.has_pending_save());
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn abort_save_leaves_wizard_usable() {
        let identity = Arc::new(LocalIdentityProvider::signed_in(Subject::new("u1")));
        let store = Arc::new(GatedProfileStore::new());
        let mut session =
            OnboardingSession::mount(identity, store.clone(), OnboardingConfig::default())
                .await
                .unwrap();
        fill(&mut session);

        session.begin_save().unwrap();
        assert!(session.abort_save().await.is_err());
        assert!(!session.wizard().is_saving());

        store.open(1);
        session.save().await.unwrap();
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn teardown_detaches_in_flight_save() {
        let identity = Arc::new(LocalIdentityProvider::signed_in(Subject::new("u1")));
        let store = Arc::new(GatedProfileStore::new());
        let mut session =
            OnboardingSession::mount(identity, store.clone(), OnboardingConfig::default())
                .await
                .unwrap();
        fill(&mut session);
        session.begin_save().unwrap();
        session.teardown();

        store.open(1);
        let mut landed = false;
        for _ in 0..50 {
            if store.write_count() == 1 {
                landed = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(landed);
    }
}
