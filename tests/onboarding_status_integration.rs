//! Integration tests for the onboarding status REST surface.
//!
//! Each test spins up an Axum server on a random port backed by a libSQL
//! profile store in a temp directory, and exercises the real HTTP contract.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::net::TcpListener;
use tokio::time::timeout;

use quintaesencia::config::{OnboardingConfig, PROFILE_COLLECTION};
use quintaesencia::directory::{EMPTY_STATE, directory_routes};
use quintaesencia::identity::{LocalIdentityProvider, Subject};
use quintaesencia::onboarding::model::{
    Activity, Agreement, ArtisticFocus, ArtistRole, Benefit, Contribution, FieldUpdate,
};
use quintaesencia::onboarding::{
    OnboardingRouteState, OnboardingSession, WizardStep, onboarding_routes,
};
use quintaesencia::store::{LibSqlProfileStore, ProfileStore};

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Start an Axum server on a random port, return (port, store, tempdir).
async fn start_server() -> (u16, Arc<dyn ProfileStore>, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn ProfileStore> = Arc::new(
        LibSqlProfileStore::new_local(&dir.path().join("profiles.db"))
            .await
            .unwrap(),
    );
    let app = onboarding_routes(OnboardingRouteState {
        store: Arc::clone(&store),
        collection: PROFILE_COLLECTION.to_string(),
    })
    .merge(directory_routes());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Give the server a moment to start accepting connections.
    tokio::time::sleep(Duration::from_millis(50)).await;

    (port, store, dir)
}

async fn get_status(port: u16, subject: &str) -> (u16, Value) {
    let resp = reqwest::get(format!(
        "http://127.0.0.1:{port}/api/onboarding/status/{subject}"
    ))
    .await
    .unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

#[tokio::test]
async fn health_endpoint() {
    timeout(TEST_TIMEOUT, async {
        let (port, _store, _dir) = start_server().await;

        let resp = reqwest::get(format!("http://127.0.0.1:{port}/health"))
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);

        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "quintaesencia-onboarding");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn new_subject_lands_on_onboarding() {
    timeout(TEST_TIMEOUT, async {
        let (port, _store, _dir) = start_server().await;

        let (status, body) = get_status(port, "nobody").await;
        assert_eq!(status, 200);
        assert_eq!(body["onboardingCompleted"], false);
        assert_eq!(body["destination"], "/onboarding");
        assert!(body["profile"].is_null());
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn completed_wizard_lands_on_dashboard() {
    timeout(TEST_TIMEOUT, async {
        let (port, store, _dir) = start_server().await;

        let identity = Arc::new(LocalIdentityProvider::signed_in(
            Subject::new("artist-1").with_display_name("Lucía Torres"),
        ));
        let mut session =
            OnboardingSession::mount(identity, Arc::clone(&store), OnboardingConfig::default())
                .await
                .unwrap();

        let wizard = session.wizard_mut();
        let updates = [
            FieldUpdate::Role(ArtistRole::Trainer),
            FieldUpdate::Contribution(Contribution::WorkshopsAndMentoring),
            FieldUpdate::Agreement(Agreement::WorkshopMentoring),
            FieldUpdate::ToggleActivity(Activity::Mentoring),
            FieldUpdate::ToggleBenefit(Benefit::ShareExpertise),
            FieldUpdate::ArtisticFocus(ArtisticFocus::Education),
        ];
        for update in updates {
            wizard.set_field(update);
            wizard.advance().unwrap();
        }
        assert_eq!(wizard.step(), WizardStep::Summary);
        session.save().await.unwrap();

        let (status, body) = get_status(port, "artist-1").await;
        assert_eq!(status, 200);
        assert_eq!(body["subject"], "artist-1");
        assert_eq!(body["onboardingCompleted"], true);
        assert_eq!(body["destination"], "/bienvenidos");
        assert_eq!(body["profile"]["artistRole"], "artista-formador");
        assert!(body["profile"]["artistRoleOther"].is_null());
        assert_eq!(
            body["profile"]["desiredBenefits"],
            serde_json::json!(["beneficio-compartir-expertise"])
        );
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn resubmission_merges_over_existing_profile() {
    timeout(TEST_TIMEOUT, async {
        let (port, store, _dir) = start_server().await;

        store
            .merge_write(
                PROFILE_COLLECTION,
                "artist-2",
                &serde_json::json!({
                    "displayName": "Ana",
                    "artistRole": "otro-rol",
                    "artistRoleOther": "curadora"
                }),
            )
            .await
            .unwrap();

        let (_, before) = get_status(port, "artist-2").await;
        assert_eq!(before["onboardingCompleted"], false);
        assert_eq!(before["destination"], "/onboarding");

        let identity = Arc::new(LocalIdentityProvider::signed_in(Subject::new("artist-2")));
        let mut session =
            OnboardingSession::mount(identity, Arc::clone(&store), OnboardingConfig::default())
                .await
                .unwrap();
        let wizard = session.wizard_mut();
        let updates = [
            FieldUpdate::Role(ArtistRole::Explorer),
            FieldUpdate::Contribution(Contribution::OneOffContent),
            FieldUpdate::Agreement(Agreement::NoAgreement),
            FieldUpdate::ToggleActivity(Activity::OneOffProjects),
            FieldUpdate::ToggleBenefit(Benefit::Flexibility),
            FieldUpdate::ArtisticFocus(ArtisticFocus::FlexibleEvents),
        ];
        for update in updates {
            wizard.set_field(update);
            wizard.advance().unwrap();
        }
        session.save().await.unwrap();

        let (_, after) = get_status(port, "artist-2").await;
        assert_eq!(after["destination"], "/bienvenidos");
        assert_eq!(after["profile"]["displayName"], "Ana");
        assert_eq!(after["profile"]["artistRole"], "explorador-apreciador");
        assert!(after["profile"]["artistRoleOther"].is_null());
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn artist_directory_filters_by_category() {
    timeout(TEST_TIMEOUT, async {
        let (port, _store, _dir) = start_server().await;

        let resp = reqwest::get(format!(
            "http://127.0.0.1:{port}/api/artists?category=Dibujo"
        ))
        .await
        .unwrap();
        assert_eq!(resp.status(), 200);

        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["category"], "Dibujo");
        let names: Vec<&str> = body["artists"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["name"].as_str().unwrap())
            .collect();
        assert_eq!(
            names,
            ["Elena Martinez", "Sofia Lopez", "Miguel Angel", "Javier Ortiz", "Tomas Eduardo"]
        );
        assert_ne!(body["emptyMessage"], EMPTY_STATE);
    })
    .await
    .expect("test timed out");
}
