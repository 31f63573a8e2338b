use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use quintaesencia::auth::{AuthForm, Destination, landing_for};
use quintaesencia::cli;
use quintaesencia::config::AppConfig;
use quintaesencia::directory::directory_routes;
use quintaesencia::error::IdentityError;
use quintaesencia::identity::{LocalIdentityProvider, Subject};
use quintaesencia::onboarding::{OnboardingRouteState, OnboardingSession, onboarding_routes};
use quintaesencia::store::{LibSqlProfileStore, ProfileStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;

    eprintln!("🎨 Quintaesencia v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Database: {}", config.db_path.display());
    eprintln!(
        "   Status API: http://0.0.0.0:{}/api/onboarding/status/{{subject}}",
        config.http_port
    );
    eprintln!("   Artists API: http://0.0.0.0:{}/api/artists", config.http_port);

    // ── Profile store ───────────────────────────────────────────────────
    let store: Arc<dyn ProfileStore> = Arc::new(
        LibSqlProfileStore::new_local(&config.db_path)
            .await
            .with_context(|| format!("failed to open database at {}", config.db_path.display()))?,
    );

    // ── Status server ───────────────────────────────────────────────────
    let app = onboarding_routes(OnboardingRouteState {
        store: Arc::clone(&store),
        collection: config.onboarding.profile_collection.clone(),
    })
    .merge(directory_routes());
    let port = config.http_port;
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("failed to bind port {}", port))?;
    tokio::spawn(async move {
        tracing::info!(port, "Status server started");
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "Status server stopped");
        }
    });

    // ── Identity ────────────────────────────────────────────────────────
    let identity = Arc::new(LocalIdentityProvider::signed_out());
    let mut stdin = BufReader::new(tokio::io::stdin());

    let subject = match &config.subject {
        Some(local) => {
            let mut subject = Subject::new(local.id.clone());
            if let Some(name) = &local.display_name {
                subject = subject.with_display_name(name.clone());
            }
            if let Some(email) = &local.email {
                subject = subject.with_email(email.clone());
            }
            identity.sign_in(subject.clone());
            subject
        }
        None => match register_interactively(&identity, &mut stdin).await? {
            Some(subject) => subject,
            None => return Ok(()),
        },
    };
    eprintln!("   Signed in as: {} ({})\n", subject.greeting_name(), subject.id);

    // ── Landing ─────────────────────────────────────────────────────────
    let destination = landing_for(
        store.as_ref(),
        &config.onboarding.profile_collection,
        &subject,
    )
    .await
    .context("failed to read profile")?;

    if destination == Destination::Onboarding {
        let mut session =
            OnboardingSession::mount(identity.clone(), Arc::clone(&store), config.onboarding)
                .await?;
        let next = cli::run(&mut session, &mut stdin).await?;
        session.teardown();
        match next {
            Some(Destination::Dashboard) => greet(&subject),
            Some(other) => eprintln!("→ {}", other.path()),
            None => eprintln!("Hasta pronto."),
        }
    } else {
        greet(&subject);
    }

    Ok(())
}

fn greet(subject: &Subject) {
    println!("\n¡Hola, {}! Bienvenido a Quintaesencia.", subject.greeting_name());
}

async fn prompt<R>(input: &mut R, label: &str) -> anyhow::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    eprint!("{label}: ");
    let mut line = String::new();
    if input.read_line(&mut line).await? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Ask for the registration form until it is accepted or input ends.
async fn register_interactively<R>(
    identity: &LocalIdentityProvider,
    input: &mut R,
) -> anyhow::Result<Option<Subject>>
where
    R: AsyncBufRead + Unpin,
{
    eprintln!("Crea tu cuenta para comenzar.");
    loop {
        let Some(name) = prompt(input, "Nombre").await? else {
            return Ok(None);
        };
        let Some(email) = prompt(input, "Correo").await? else {
            return Ok(None);
        };
        let Some(password) = prompt(input, "Contraseña").await? else {
            return Ok(None);
        };
        let Some(confirm) = prompt(input, "Confirma la contraseña").await? else {
            return Ok(None);
        };

        let form = AuthForm::register(name, email, password, confirm);
        match identity.authenticate(&form).await {
            Ok(subject) => return Ok(Some(subject)),
            Err(IdentityError::InvalidCredentials(msg)) => eprintln!("! {msg}"),
            Err(e) => return Err(e.into()),
        }
    }
}
