use github::{load_event_payload, write_step_output};
use pipeline::{
    resolve_trigger, ConfigurationError, TriggerProfile, TriggerResolution,
};

#[tokio::test]
async fn event_payload_is_loaded_and_resolvable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("event.json");
    std::fs::write(
        &path,
        r#"{
            "action": "synchronize",
            "pull_request": { "number": 31, "head": { "sha": "abc" } },
            "repository": { "name": "docs", "owner": { "login": "acme" } }
        }"#,
    )
    .unwrap();

    let payload = load_event_payload(&path).await.unwrap();
    let resolution = resolve_trigger(&payload, None, TriggerProfile::default()).unwrap();

    match resolution {
        TriggerResolution::Run(ctx) => assert_eq!(ctx.to_string(), "acme/docs#31"),
        other => panic!("expected run, got {other:?}"),
    }
}

#[tokio::test]
async fn unreadable_event_file_is_a_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.json");

    let err = load_event_payload(&path).await.unwrap_err();

    assert!(matches!(err, ConfigurationError::EventPayload { .. }), "{err:?}");
}

#[tokio::test]
async fn malformed_event_file_is_a_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("event.json");
    std::fs::write(&path, "not json").unwrap();

    let err = load_event_payload(&path).await.unwrap_err();

    assert!(err.to_string().starts_with("Failed to load event payload"));
}

#[tokio::test]
async fn step_outputs_are_appended() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("output");
    std::fs::write(&path, "existing=1\n").unwrap();

    write_step_output(&path, "preview-url", "https://x.example/p/1")
        .await
        .unwrap();

    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "existing=1\npreview-url=https://x.example/p/1\n"
    );
}
