//! Terminal driver for the onboarding wizard — reads commands line by line
//! and prints each step with numbered options.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::auth::Destination;
use crate::error::OnboardingError;
use crate::onboarding::model::{
    Activity, Agreement, AnswerSet, ArtisticFocus, ArtistRole, Benefit, Choice, Contribution,
    FieldUpdate,
};
use crate::onboarding::{OnboardingSession, OnboardingWizard, WizardStep, redirect_target};

const HELP: &str = "Comandos: <número> elige una opción, `otro <texto>` describe tu rol, \
`s` siguiente, `a` atrás, `guardar` en el resumen, `q` salir.";

pub const MSG_SAVE_NOT_READY: &str = "Llega al resumen para guardar.";
pub const MSG_SAVE_BUSY: &str = "Ya estamos guardando tus respuestas.";

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// 1-based option number.
    Pick(usize),
    /// Free text for the custom role.
    Text(String),
    Next,
    Back,
    Save,
    Quit,
    Help,
    Unknown(String),
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if let Ok(n) = line.parse::<usize>() {
        return Command::Pick(n);
    }
    if let Some(rest) = line.strip_prefix("otro ") {
        return Command::Text(rest.trim().to_string());
    }
    match line.to_lowercase().as_str() {
        "s" | "n" | "siguiente" | "next" => Command::Next,
        "a" | "b" | "atras" | "atrás" | "back" => Command::Back,
        "guardar" | "save" => Command::Save,
        "q" | "salir" | "/quit" | "quit" => Command::Quit,
        "?" | "ayuda" | "help" => Command::Help,
        _ => Command::Unknown(line.to_string()),
    }
}

/// Terminal hint for a save that was refused before reaching the store.
///
/// Failures that set a wizard message are already shown by [`render`].
pub fn save_hint(err: &OnboardingError) -> Option<&'static str> {
    match err {
        OnboardingError::NotAtSummary { .. } => Some(MSG_SAVE_NOT_READY),
        OnboardingError::SaveInProgress => Some(MSG_SAVE_BUSY),
        _ => None,
    }
}

fn pick<T: Choice>(n: usize) -> Option<T> {
    n.checked_sub(1).and_then(|i| T::ALL.get(i)).copied()
}

/// Map option number `n` on `step` to the edit it stands for.
pub fn apply_pick(step: WizardStep, n: usize) -> Option<FieldUpdate> {
    match step {
        WizardStep::Role => pick::<ArtistRole>(n).map(FieldUpdate::Role),
        WizardStep::Contribution => pick::<Contribution>(n).map(FieldUpdate::Contribution),
        WizardStep::Agreement => pick::<Agreement>(n).map(FieldUpdate::Agreement),
        WizardStep::Activities => pick::<Activity>(n).map(FieldUpdate::ToggleActivity),
        WizardStep::Benefits => pick::<Benefit>(n).map(FieldUpdate::ToggleBenefit),
        WizardStep::Focus => pick::<ArtisticFocus>(n).map(FieldUpdate::ArtisticFocus),
        WizardStep::Summary => None,
    }
}

fn render_options<T: Choice>(out: &mut String, selected: impl Fn(&T) -> bool) {
    for (i, option) in T::ALL.iter().enumerate() {
        let mark = if selected(option) { "x" } else { " " };
        out.push_str(&format!("  [{mark}] {}. {}\n", i + 1, option.label()));
        if !option.description().is_empty() {
            out.push_str(&format!("         {}\n", option.description()));
        }
    }
}

/// Text for the step the wizard is on, messages included.
pub fn render(wizard: &OnboardingWizard) -> String {
    let step = wizard.step();
    let (current, total) = wizard.progress();
    let answers: &AnswerSet = wizard.answers();
    let mut out = format!("\nPaso {current}/{total}: {}\n", step.prompt());

    match step {
        WizardStep::Role => {
            render_options::<ArtistRole>(&mut out, |o| answers.role == Some(*o));
            if answers.role.is_some_and(|r| r.is_custom()) {
                out.push_str(&format!("  Otro rol: {}\n", answers.custom_role_text));
            }
        }
        WizardStep::Contribution => {
            render_options::<Contribution>(&mut out, |o| answers.primary_contribution == Some(*o))
        }
        WizardStep::Agreement => {
            render_options::<Agreement>(&mut out, |o| answers.agreement_preference == Some(*o))
        }
        WizardStep::Activities => {
            render_options::<Activity>(&mut out, |o| answers.activities.contains(o))
        }
        WizardStep::Benefits => render_options::<Benefit>(&mut out, |o| answers.benefits.contains(o)),
        WizardStep::Focus => {
            render_options::<ArtisticFocus>(&mut out, |o| answers.artistic_focus == Some(*o))
        }
        WizardStep::Summary => {
            let summary = wizard.summary();
            out.push_str(&format!("  {}\n", summary.role_label));
            out.push_str(&format!("  {}\n", summary.focus_sentence));
            out.push_str(&format!("  Contribución: {}\n", summary.contribution));
            out.push_str(&format!("  Beneficio: {}", summary.first_benefit));
            if summary.more_benefits > 0 {
                out.push_str(&format!(" y {} más", summary.more_benefits));
            }
            out.push('\n');
        }
    }

    if !wizard.error_message().is_empty() {
        out.push_str(&format!("! {}\n", wizard.error_message()));
    }
    if !wizard.result_message().is_empty() {
        out.push_str(&format!("{}\n", wizard.result_message()));
    }
    out
}

/// Drive `session` from `input` until the profile is saved, the user quits,
/// the subject signs out, or the input ends.
///
/// Returns where the subject should go next, if anywhere.
pub async fn run<R>(
    session: &mut OnboardingSession,
    input: R,
) -> Result<Option<Destination>, OnboardingError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    println!("{HELP}");
    println!("{}", render(session.wizard()));
    eprint!("> ");

    loop {
        let read = tokio::select! {
            biased;
            destination = session.signed_out() => return Ok(Some(destination)),
            read = lines.next_line() => read,
        };
        let line = match read {
            Ok(Some(line)) => line,
            Ok(None) => return Ok(None),
            Err(e) => {
                tracing::error!("Error reading stdin: {}", e);
                return Ok(None);
            }
        };
        if line.trim().is_empty() {
            eprint!("> ");
            continue;
        }

        let wizard = session.wizard_mut();
        match parse_command(&line) {
            Command::Pick(n) => match apply_pick(wizard.step(), n) {
                Some(update) => wizard.set_field(update),
                None => println!("Opción no válida: {n}"),
            },
            Command::Text(text) => {
                if wizard.step() == WizardStep::Role {
                    wizard.set_field(FieldUpdate::Role(ArtistRole::Other));
                    wizard.set_field(FieldUpdate::CustomRoleText(text));
                } else {
                    println!("El texto libre solo aplica al rol.");
                }
            }
            Command::Next => {
                let _ = wizard.advance();
            }
            Command::Back => {
                wizard.retreat();
            }
            Command::Save => match session.save().await {
                Ok(()) => {
                    println!("{}", render(session.wizard()));
                    return Ok(Some(Destination::Dashboard));
                }
                Err(e) => {
                    if let Some(destination) = redirect_target(&e) {
                        return Ok(Some(destination));
                    }
                    if let Some(hint) = save_hint(&e) {
                        println!("{hint}");
                    }
                    tracing::warn!(error = %e, "Save did not complete");
                }
            },
            Command::Quit => return Ok(None),
            Command::Help => println!("{HELP}"),
            Command::Unknown(raw) => println!("No entendí «{raw}». Escribe ? para ayuda."),
        }

        println!("{}", render(session.wizard()));
        eprint!("> ");
    }
}
