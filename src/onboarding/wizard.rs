//! OnboardingWizard — owns the step, the answer set, and the final profile write.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::OnboardingConfig;
use crate::error::{OnboardingError, StoreError, ValidationError};
use crate::identity::Subject;
use crate::store::ProfileStore;

use super::model::{AnswerSet, FieldUpdate, WizardSummary};
use super::state::WizardStep;

pub const MSG_NO_SUBJECT: &str = "No se encontró usuario autenticado.";
pub const MSG_SAVED: &str = "Gracias, tu perfil ha sido guardado correctamente.";
pub const MSG_SAVE_FAILED: &str = "No pudimos guardar tus respuestas. Inténtalo de nuevo.";

/// An in-flight profile write started by [`OnboardingWizard::begin_commit`].
///
/// Await it with [`OnboardingWizard::finish_commit`], cancel it with
/// [`SaveTask::abort`], or let it run unobserved with [`SaveTask::detach`].
/// The wizard stops reporting `is_saving` once the write resolves, whether or
/// not anyone observes it.
#[derive(Debug)]
#[must_use = "an unobserved save leaves its outcome unreported; call finish_commit or detach"]
pub struct SaveTask {
    subject_id: String,
    handle: JoinHandle<Result<(), StoreError>>,
}

impl SaveTask {
    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Request cancellation. The write may already have reached the store.
    pub fn abort(&self) {
        self.handle.abort();
    }

    /// Stop observing the write. It keeps running; its result is dropped and
    /// the wizard's saving flag clears when it resolves.
    pub fn detach(self) {
        info!(
            subject = %self.subject_id,
            finished = self.handle.is_finished(),
            "Detaching profile write"
        );
    }
}

/// Clears the shared in-flight flag when the write future completes or is
/// dropped (aborted, or never polled).
struct InFlight(Arc<AtomicBool>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Coordinates one onboarding session: field edits, gated step transitions,
/// and the single merge-write of the answers at the summary step.
pub struct OnboardingWizard {
    store: Arc<dyn ProfileStore>,
    config: OnboardingConfig,
    step: WizardStep,
    answers: AnswerSet,
    error_message: String,
    /// Set while a write is in flight; cleared by the write task itself.
    in_flight: Option<Arc<AtomicBool>>,
    result_message: String,
}

impl OnboardingWizard {
    pub fn new(store: Arc<dyn ProfileStore>, config: OnboardingConfig) -> Self {
        Self {
            store,
            config,
            step: WizardStep::default(),
            answers: AnswerSet::default(),
            error_message: String::new(),
            in_flight: None,
            result_message: String::new(),
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    /// Current validation or save error; empty when there is none.
    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    /// Confirmation after a successful save; empty otherwise.
    pub fn result_message(&self) -> &str {
        &self.result_message
    }

    pub fn is_saving(&self) -> bool {
        self.in_flight
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Acquire))
    }

    /// `(current step number, total steps)`, 1-based, for the progress bar.
    pub fn progress(&self) -> (usize, usize) {
        (usize::from(self.step.index()) + 1, WizardStep::COUNT)
    }

    pub fn role_label(&self) -> &'static str {
        self.answers.role_label()
    }

    pub fn artistic_focus_label(&self) -> &'static str {
        self.answers.artistic_focus_label()
    }

    pub fn summary(&self) -> WizardSummary {
        WizardSummary::from_answers(&self.answers)
    }

    /// Record a user edit. Leaves the error message as it is.
    pub fn set_field(&mut self, update: FieldUpdate) {
        self.answers.apply(update);
    }

    /// Hide the inline error message.
    pub fn dismiss_error(&mut self) {
        self.error_message.clear();
    }

    /// Validate the current step and move forward.
    ///
    /// At the summary step this succeeds without moving.
    pub fn advance(&mut self) -> Result<WizardStep, ValidationError> {
        if let Err(err) = self.step.validate(&self.answers) {
            debug!(step = %self.step, reason = err.message, "Advance blocked");
            self.error_message = err.message.to_string();
            return Err(err);
        }

        self.error_message.clear();
        if let Some(next) = self.step.next() {
            self.step = next;
        }
        Ok(self.step)
    }

    /// Move back one step without validating.
    ///
    /// Refused while a save is in flight unless the config allows it.
    pub fn retreat(&mut self) -> WizardStep {
        if self.is_saving() && !self.config.allow_retreat_while_saving {
            debug!(step = %self.step, "Retreat ignored while saving");
            return self.step;
        }

        self.error_message.clear();
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        self.step
    }

    /// Write the answers for `subject` and wait for the outcome.
    pub async fn commit(&mut self, subject: Option<&Subject>) -> Result<(), OnboardingError> {
        let task = self.begin_commit(subject)?;
        self.finish_commit(task).await
    }

    /// Start the profile write in the background.
    pub fn begin_commit(&mut self, subject: Option<&Subject>) -> Result<SaveTask, OnboardingError> {
        if !self.step.is_terminal() {
            return Err(OnboardingError::NotAtSummary {
                step: self.step.index(),
            });
        }
        if self.is_saving() {
            return Err(OnboardingError::SaveInProgress);
        }
        let Some(subject) = subject else {
            self.error_message = MSG_NO_SUBJECT.to_string();
            return Err(OnboardingError::NotAuthenticated);
        };

        self.error_message.clear();
        self.result_message.clear();

        let payload = match serde_json::to_value(self.answers.to_document()) {
            Ok(value) => value,
            Err(e) => {
                let err = StoreError::Serialization(e.to_string());
                warn!(subject = %subject.id, error = %err, "Failed to encode profile document");
                self.error_message = MSG_SAVE_FAILED.to_string();
                return Err(err.into());
            }
        };

        let store = Arc::clone(&self.store);
        let collection = self.config.profile_collection.clone();
        let key = subject.id.clone();
        info!(subject = %key, collection = %collection, "Saving onboarding answers");

        let flag = Arc::new(AtomicBool::new(true));
        self.in_flight = Some(Arc::clone(&flag));
        let in_flight = InFlight(flag);
        let handle = tokio::spawn(async move {
            let _in_flight = in_flight;
            store.merge_write(&collection, &key, &payload).await
        });

        Ok(SaveTask {
            subject_id: subject.id.clone(),
            handle,
        })
    }

    /// Wait for a write started by [`begin_commit`](Self::begin_commit) and
    /// surface its outcome.
    pub async fn finish_commit(&mut self, task: SaveTask) -> Result<(), OnboardingError> {
        let SaveTask { subject_id, handle } = task;
        let outcome = handle.await;
        self.in_flight = None;

        match outcome {
            Ok(Ok(())) => {
                info!(subject = %subject_id, "Onboarding answers saved");
                self.result_message = MSG_SAVED.to_string();
                Ok(())
            }
            Ok(Err(e)) => {
                warn!(subject = %subject_id, error = %e, "Failed to save onboarding answers");
                self.error_message = MSG_SAVE_FAILED.to_string();
                Err(OnboardingError::Persistence(e))
            }
            Err(join_err) => {
                warn!(subject = %subject_id, error = %join_err, "Profile write did not complete");
                self.error_message = MSG_SAVE_FAILED.to_string();
                Err(OnboardingError::Detached(join_err.to_string()))
            }
        }
    }
}
