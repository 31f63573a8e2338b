//! Onboarding step machine — which question the user is on and what it takes
//! to move past it.

use serde::{Deserialize, Serialize};

use super::model::AnswerSet;
use crate::error::ValidationError;

pub const MSG_ROLE_REQUIRED: &str = "Elige el rol que mejor te describe.";
pub const MSG_CUSTOM_ROLE_REQUIRED: &str = "Especifica tu otro rol para continuar.";
pub const MSG_CONTRIBUTION_REQUIRED: &str = "Elige cómo te gustaría contribuir.";
pub const MSG_AGREEMENT_REQUIRED: &str = "Elige el tipo de convenio que te interesa.";
pub const MSG_ACTIVITY_REQUIRED: &str =
    "Elige al menos una actividad en la que te ves participando.";
pub const MSG_BENEFIT_REQUIRED: &str = "Elige al menos un beneficio que estés buscando.";
pub const MSG_FOCUS_REQUIRED: &str = "Elige tu enfoque artístico.";

/// The steps of the questionnaire.
///
/// Progresses linearly: Role → Contribution → Agreement → Activities →
/// Benefits → Focus → Summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    Role,
    Contribution,
    Agreement,
    Activities,
    Benefits,
    Focus,
    Summary,
}

impl WizardStep {
    pub const ALL: [WizardStep; 7] = [
        Self::Role,
        Self::Contribution,
        Self::Agreement,
        Self::Activities,
        Self::Benefits,
        Self::Focus,
        Self::Summary,
    ];

    /// Number of steps, summary included.
    pub const COUNT: usize = Self::ALL.len();

    pub fn index(&self) -> u8 {
        match self {
            Self::Role => 0,
            Self::Contribution => 1,
            Self::Agreement => 2,
            Self::Activities => 3,
            Self::Benefits => 4,
            Self::Focus => 5,
            Self::Summary => 6,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(usize::from(index)).copied()
    }

    /// Whether this is the summary step (no forward transition).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Summary)
    }

    /// The next step, if any.
    pub fn next(&self) -> Option<WizardStep> {
        Self::from_index(self.index() + 1)
    }

    /// The previous step, if any.
    pub fn previous(&self) -> Option<WizardStep> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    /// Question shown as the step headline.
    pub fn prompt(&self) -> &'static str {
        match self {
            Self::Role => "¿Cuál rol te describe mejor?",
            Self::Contribution => "¿Cómo quieres contribuir?",
            Self::Agreement => "Elige tu tipo de convenio",
            Self::Activities => "¿En qué actividades te ves participando?",
            Self::Benefits => "¿Qué beneficios buscas?",
            Self::Focus => "¿Cuál es tu enfoque artístico?",
            Self::Summary => "Tu Perfil Digital",
        }
    }

    /// Whether the step accepts several options at once.
    pub fn is_multi_select(&self) -> bool {
        matches!(self, Self::Activities | Self::Benefits)
    }

    /// Check the required-field condition for leaving this step forward.
    pub fn validate(&self, answers: &AnswerSet) -> Result<(), ValidationError> {
        let failure = |message: &'static str| {
            Err(ValidationError {
                step: self.index(),
                message,
            })
        };

        match self {
            Self::Role => match answers.role {
                None => failure(MSG_ROLE_REQUIRED),
                Some(role) if role.is_custom() && answers.custom_role_text.trim().is_empty() => {
                    failure(MSG_CUSTOM_ROLE_REQUIRED)
                }
                Some(_) => Ok(()),
            },
            Self::Contribution if answers.primary_contribution.is_none() => {
                failure(MSG_CONTRIBUTION_REQUIRED)
            }
            Self::Agreement if answers.agreement_preference.is_none() => {
                failure(MSG_AGREEMENT_REQUIRED)
            }
            Self::Activities if answers.activities.is_empty() => failure(MSG_ACTIVITY_REQUIRED),
            Self::Benefits if answers.benefits.is_empty() => failure(MSG_BENEFIT_REQUIRED),
            Self::Focus if answers.artistic_focus.is_none() => failure(MSG_FOCUS_REQUIRED),
            Self::Contribution
            | Self::Agreement
            | Self::Activities
            | Self::Benefits
            | Self::Focus
            | Self::Summary => Ok(()),
        }
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Role => "role",
            Self::Contribution => "contribution",
            Self::Agreement => "agreement",
            Self::Activities => "activities",
            Self::Benefits => "benefits",
            Self::Focus => "focus",
            Self::Summary => "summary",
        };
        write!(f, "{s}")
    }
}
