//! `IdentityProvider` trait and the in-process implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{RwLock, watch};
use tracing::info;
use uuid::Uuid;

use crate::auth::{AuthForm, AuthMode};
use crate::error::IdentityError;
use crate::identity::model::{AuthState, Subject};

pub const MSG_BAD_CREDENTIALS: &str = "Correo o contraseña incorrectos.";
pub const MSG_EMAIL_TAKEN: &str = "Ya existe una cuenta con ese correo.";

/// Source of the current authenticated subject.
///
/// Consumers subscribe to a `watch` channel: the first value may be
/// `AuthState::Pending`, and every sign-in or sign-out publishes a new state.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Subscribe to auth-state changes.
    fn subscribe(&self) -> watch::Receiver<AuthState>;

    /// The subject signed in right now, if any.
    fn current_subject(&self) -> Option<Subject> {
        let rx = self.subscribe();
        let state = rx.borrow();
        state.subject().cloned()
    }

    /// Wait until the provider has resolved the session, then return the subject.
    async fn resolved(&self) -> Result<Option<Subject>, IdentityError> {
        let mut rx = self.subscribe();
        loop {
            {
                let state = rx.borrow_and_update();
                if !state.is_pending() {
                    return Ok(state.subject().cloned());
                }
            }
            rx.changed().await.map_err(|_| IdentityError::Closed)?;
        }
    }
}

struct Account {
    password: String,
    subject: Subject,
}

/// In-process identity provider backed by an account map.
pub struct LocalIdentityProvider {
    state: watch::Sender<AuthState>,
    accounts: RwLock<HashMap<String, Account>>,
}

impl Default for LocalIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalIdentityProvider {
    /// A provider whose session is still unresolved.
    pub fn new() -> Self {
        let (state, _) = watch::channel(AuthState::Pending);
        Self {
            state,
            accounts: RwLock::new(HashMap::new()),
        }
    }

    /// A provider already signed in as `subject`.
    pub fn signed_in(subject: Subject) -> Self {
        let provider = Self::new();
        provider.sign_in(subject);
        provider
    }

    /// A provider that resolved to "nobody signed in".
    pub fn signed_out() -> Self {
        let provider = Self::new();
        provider.sign_out();
        provider
    }

    pub fn sign_in(&self, subject: Subject) {
        info!(subject = %subject.id, "Signed in");
        self.state.send_replace(AuthState::SignedIn(subject));
    }

    pub fn sign_out(&self) {
        if let Some(subject) = self.state.borrow().subject() {
            info!(subject = %subject.id, "Signed out");
        }
        self.state.send_replace(AuthState::SignedOut);
    }

    /// Validate the entry-page form, then register or log in.
    pub async fn authenticate(&self, form: &AuthForm) -> Result<Subject, IdentityError> {
        form.validate()
            .map_err(|msg| IdentityError::InvalidCredentials(msg.to_string()))?;

        let email = form.email.trim().to_lowercase();
        let subject = match form.mode {
            AuthMode::Register => {
                let mut accounts = self.accounts.write().await;
                if accounts.contains_key(&email) {
                    return Err(IdentityError::InvalidCredentials(MSG_EMAIL_TAKEN.to_string()));
                }
                let subject = Subject::new(Uuid::new_v4().to_string())
                    .with_display_name(form.name.trim())
                    .with_email(email.clone());
                accounts.insert(
                    email,
                    Account {
                        password: form.password.clone(),
                        subject: subject.clone(),
                    },
                );
                subject
            }
            AuthMode::Login => {
                let accounts = self.accounts.read().await;
                match accounts.get(&email) {
                    Some(account) if account.password == form.password => account.subject.clone(),
                    _ => {
                        return Err(IdentityError::InvalidCredentials(
                            MSG_BAD_CREDENTIALS.to_string(),
                        ));
                    }
                }
            }
        };

        self.sign_in(subject.clone());
        Ok(subject)
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn resolved_waits_for_first_state() {
        let provider = Arc::new(LocalIdentityProvider::new());
        assert!(provider.current_subject().is_none());

        let waiter = {
            let provider = Arc::clone(&provider);
            tokio::spawn(async move { provider.resolved().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!waiter.is_finished());

        provider.sign_in(Subject::new("u1"));
        let subject = waiter.await.unwrap().unwrap();
        assert_eq!(subject.map(|s| s.id), Some("u1".to_string()));
    }

    #[tokio::test]
    async fn resolved_signed_out_is_none() {
        let provider = LocalIdentityProvider::signed_out();
        assert!(provider.resolved().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn subscription_sees_sign_out() {
        let provider = LocalIdentityProvider::signed_in(Subject::new("u1"));
        let mut rx = provider.subscribe();
        assert!(rx.borrow_and_update().subject().is_some());

        provider.sign_out();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), AuthState::SignedOut);
        assert!(provider.current_subject().is_none());
    }

    #[tokio::test]
    async fn register_then_login() {
        let provider = LocalIdentityProvider::signed_out();
        let registered = provider
            .authenticate(&AuthForm::register(
                "Ana Mendieta",
                "Ana@Quinta.art",
                "secret1",
                "secret1",
            ))
            .await
            .unwrap();
        assert_eq!(registered.email.as_deref(), Some("ana@quinta.art"));
        assert_eq!(provider.current_subject(), Some(registered.clone()));

        provider.sign_out();
        let logged_in = provider
            .authenticate(&AuthForm::login("ana@quinta.art", "secret1"))
            .await
            .unwrap();
        assert_eq!(logged_in.id, registered.id);
    }

    #[tokio::test]
    async fn login_with_wrong_password_fails() {
        let provider = LocalIdentityProvider::signed_out();
        provider
            .authenticate(&AuthForm::register("Ana", "ana@quinta.art", "secret1", "secret1"))
            .await
            .unwrap();
        provider.sign_out();

        let err = provider
            .authenticate(&AuthForm::login("ana@quinta.art", "nope"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), MSG_BAD_CREDENTIALS);
        assert!(provider.current_subject().is_none());
    }

    #[tokio::test]
    async fn duplicate_registration_fails() {
        let provider = LocalIdentityProvider::signed_out();
        let form = AuthForm::register("Ana", "ana@quinta.art", "secret1", "secret1");
        provider.authenticate(&form).await.unwrap();
        let err = provider.authenticate(&form).await.unwrap_err();
        assert_eq!(err.to_string(), MSG_EMAIL_TAKEN);
    }

    #[tokio::test]
    async fn invalid_form_never_signs_in() {
        let provider = LocalIdentityProvider::signed_out();
        let err = provider
            .authenticate(&AuthForm::register("Ana", "ana@quinta.art", "abc", "abc"))
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::InvalidCredentials(_)));
        assert!(provider.current_subject().is_none());
    }
}
