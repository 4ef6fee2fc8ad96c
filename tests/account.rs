use matri::error::{Collection, DUPLICATE_EMAIL_MESSAGE};
use matri::prelude::*;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn matri(server: &MockServer) -> Matri {
    let config = MatriConfig::new(&server.uri(), "test_anon_key").unwrap();
    Matri::new(config).unwrap()
}

fn session_body() -> Value {
    json!({
        "access_token": "test_access_token",
        "token_type": "bearer",
        "expires_in": 3600,
        "refresh_token": "test_refresh_token",
        "user": {
            "id": "user-1",
            "email": "ama@example.com",
            "user_metadata": { "name": "Ama" },
            "app_metadata": {}
        }
    })
}

fn profile_row(week: Value, stage: Value) -> Value {
    json!({
        "id": "user-1",
        "name": "Ama",
        "age": 29,
        "pregnancy_week": week,
        "risk_level": "low",
        "maternal_stage": stage,
        "created_at": "2026-01-05T09:00:00+00:00"
    })
}

async fn mount_sign_in(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .and(body_partial_json(json!({ "email": "ama@example.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body()))
        .mount(server)
        .await;
}

async fn mount_profile(server: &MockServer, row: Value) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/users_profile"))
        .and(query_param("id", "eq.user-1"))
        .and(header("authorization", "Bearer test_access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([row])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_sign_up_requires_a_name() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body()))
        .expect(0)
        .mount(&server)
        .await;

    let account = matri(&server).account();
    match account.sign_up("ama@example.com", "password123", "   ").await {
        Err(Error::Validation(e)) => assert_eq!(e.title, "Please enter your name"),
        other => panic!("Expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_sign_up_signs_in_with_display_name() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .and(body_partial_json(json!({
            "email": "ama@example.com",
            "data": { "name": "Ama" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body()))
        .expect(1)
        .mount(&server)
        .await;

    let account = matri(&server).account();
    let outcome = account
        .sign_up(" ama@example.com ", "password123", " Ama ")
        .await
        .unwrap();

    match outcome {
        SignUpOutcome::SignedIn(ctx) => {
            assert_eq!(ctx.user_id, "user-1");
            assert_eq!(ctx.access_token, "test_access_token");
        }
        other => panic!("Expected a session, got {:?}", other),
    }
    assert!(account.current().is_some());
}

#[tokio::test]
async fn test_sign_up_duplicate_email_is_friendly() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "code": 422,
            "error_code": "user_already_exists",
            "msg": "User already registered"
        })))
        .mount(&server)
        .await;

    let account = matri(&server).account();
    match account.sign_up("ama@example.com", "password123", "Ama").await {
        Err(Error::Auth { message, .. }) => assert_eq!(message, DUPLICATE_EMAIL_MESSAGE),
        other => panic!("Expected auth error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_sign_in_and_load_profile() {
    let server = MockServer::start().await;
    mount_sign_in(&server).await;
    mount_profile(&server, profile_row(json!(20), Value::Null)).await;

    let mut account = matri(&server).account();
    let ctx = account.sign_in("ama@example.com", "password123").await.unwrap();
    assert_eq!(ctx.email.as_deref(), Some("ama@example.com"));

    let profile = account.load_profile(&ctx).await.unwrap().cloned().unwrap();
    assert_eq!(profile.display_name, "Ama");
    assert_eq!(profile.stage, Some(MaternalStage::Pregnancy));
    assert_eq!(profile.gestational_week, Some(20));
    assert_eq!(profile.email.as_deref(), Some("ama@example.com"));

    let ids: Vec<&str> = matri::rules::select_content(Some(&profile), &matri::catalog::CATALOG)
        .into_iter()
        .map(|item| item.id)
        .collect();
    assert_eq!(ids, vec!["4", "7", "8"]);
}

#[tokio::test]
async fn test_invalid_credentials_message_passes_through() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        })))
        .mount(&server)
        .await;

    let account = matri(&server).account();
    let err = account
        .sign_in("ama@example.com", "wrong")
        .await
        .unwrap_err();
    match err {
        Error::Auth { message, .. } => assert_eq!(message, "Invalid login credentials"),
        other => panic!("Expected auth error, got {:?}", other),
    }
    assert!(account.current().is_none());
}

#[tokio::test]
async fn test_update_profile_writes_changed_columns() {
    let server = MockServer::start().await;
    mount_sign_in(&server).await;
    mount_profile(&server, profile_row(json!(20), json!("pregnancy"))).await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/users_profile"))
        .and(query_param("id", "eq.user-1"))
        .and(body_json(json!({
            "pregnancy_week": null,
            "maternal_stage": "postpartum"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([profile_row(Value::Null, json!("postpartum"))])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut account = matri(&server).account();
    let ctx = account.sign_in("ama@example.com", "password123").await.unwrap();
    account.load_profile(&ctx).await.unwrap();

    let patch = ProfilePatch {
        stage: Some(MaternalStage::Postpartum),
        ..Default::default()
    };
    let profile = account.update_profile(&ctx, &patch).await.unwrap();
    assert_eq!(profile.stage, Some(MaternalStage::Postpartum));
    assert_eq!(profile.gestational_week, None);
    assert_eq!(profile.stage_label(), "Postpartum journey");
}

#[tokio::test]
async fn test_update_profile_rejects_week_out_of_range() {
    let server = MockServer::start().await;
    mount_sign_in(&server).await;
    mount_profile(&server, profile_row(json!(20), json!("pregnancy"))).await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/users_profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let mut account = matri(&server).account();
    let ctx = account.sign_in("ama@example.com", "password123").await.unwrap();
    account.load_profile(&ctx).await.unwrap();

    let patch = ProfilePatch {
        gestational_week: Some(43),
        ..Default::default()
    };
    let err = account.update_profile(&ctx, &patch).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(account.profile().and_then(|p| p.gestational_week), Some(20));
}

#[tokio::test]
async fn test_update_without_profile_is_not_found() {
    let server = MockServer::start().await;
    let mut account = matri(&server).account();
    let ctx = SessionContext::new("user-1", "test_access_token");

    let patch = ProfilePatch {
        display_name: Some("Ama".to_string()),
        ..Default::default()
    };
    let err = account.update_profile(&ctx, &patch).await.unwrap_err();
    assert!(matches!(
        err,
        Error::NotFound {
            collection: Collection::Profiles,
            ..
        }
    ));
}

#[tokio::test]
async fn test_sign_out_clears_profile() {
    let server = MockServer::start().await;
    mount_sign_in(&server).await;
    mount_profile(&server, profile_row(json!(12), Value::Null)).await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .and(header("authorization", "Bearer test_access_token"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut account = matri(&server).account();
    let ctx = account.sign_in("ama@example.com", "password123").await.unwrap();
    account.load_profile(&ctx).await.unwrap();
    assert!(account.profile().is_some());

    account.sign_out().await.unwrap();
    assert!(account.profile().is_none());
    assert!(account.current().is_none());

    // a second sign out has nothing to do
    account.sign_out().await.unwrap();
}
