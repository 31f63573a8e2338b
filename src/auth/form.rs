//! Login / register form validation.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Minimum password length accepted on registration.
pub const MIN_PASSWORD_LEN: usize = 6;

pub const MSG_REQUIRED_FIELDS: &str = "Por favor completa todos los campos requeridos.";
pub const MSG_PASSWORD_TOO_SHORT: &str = "La contraseña debe tener al menos 6 caracteres.";
pub const MSG_PASSWORD_MISMATCH: &str = "Las contraseñas no coinciden.";
pub const MSG_INVALID_EMAIL: &str = "Ingresa un correo electrónico válido.";

/// Which tab of the entry page is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

/// Raw contents of the entry-page form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthForm {
    pub mode: AuthMode,
    #[serde(default)]
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl AuthForm {
    pub fn login(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            mode: AuthMode::Login,
            email: email.into(),
            password: password.into(),
            ..Default::default()
        }
    }

    pub fn register(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            mode: AuthMode::Register,
            name: name.into(),
            email: email.into(),
            password: password.into(),
            confirm_password: confirm_password.into(),
        }
    }

    /// Check the form before it is handed to the identity provider.
    ///
    /// Returns the first user-facing problem found.
    pub fn validate(&self) -> Result<(), &'static str> {
        let email = self.email.trim();
        if email.is_empty()
            || self.password.is_empty()
            || (self.mode == AuthMode::Register && self.name.trim().is_empty())
        {
            return Err(MSG_REQUIRED_FIELDS);
        }

        if !EMAIL_PATTERN.is_match(email) {
            return Err(MSG_INVALID_EMAIL);
        }

        if self.mode == AuthMode::Register {
            if self.password.chars().count() < MIN_PASSWORD_LEN {
                return Err(MSG_PASSWORD_TOO_SHORT);
            }
            if self.password != self.confirm_password {
                return Err(MSG_PASSWORD_MISMATCH);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_requires_email_and_password() {
        assert_eq!(
            AuthForm::login("", "secret").validate(),
            Err(MSG_REQUIRED_FIELDS)
        );
        assert_eq!(
            AuthForm::login("ana@quinta.art", "").validate(),
            Err(MSG_REQUIRED_FIELDS)
        );
        assert!(AuthForm::login("ana@quinta.art", "x").validate().is_ok());
    }

    #[test]
    fn login_does_not_check_password_length() {
        assert!(AuthForm::login("ana@quinta.art", "abc").validate().is_ok());
    }

    #[test]
    fn register_requires_name() {
        let form = AuthForm::register("  ", "ana@quinta.art", "secret1", "secret1");
        assert_eq!(form.validate(), Err(MSG_REQUIRED_FIELDS));
    }

    #[test]
    fn register_password_rules() {
        let short = AuthForm::register("Ana", "ana@quinta.art", "abc", "abc");
        assert_eq!(short.validate(), Err(MSG_PASSWORD_TOO_SHORT));

        let mismatch = AuthForm::register("Ana", "ana@quinta.art", "secret1", "secret2");
        assert_eq!(mismatch.validate(), Err(MSG_PASSWORD_MISMATCH));

        let ok = AuthForm::register("Ana", "ana@quinta.art", "secret1", "secret1");
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn rejects_malformed_email() {
        assert_eq!(
            AuthForm::login("not-an-email", "x").validate(),
            Err(MSG_INVALID_EMAIL)
        );
        assert_eq!(
            AuthForm::login("a@b", "x").validate(),
            Err(MSG_INVALID_EMAIL)
        );
    }

    #[test]
    fn mode_serde() {
        let mode: AuthMode = serde_json::from_str("\"register\"").unwrap();
        assert_eq!(mode, AuthMode::Register);
    }
}
