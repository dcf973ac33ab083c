//! End-to-end session flows against the recording and fixture gateways.

use downline_core::gateway::{CachedGateway, FixtureGateway};
use downline_core::{
    FetchError, FetchKey, LoadState, NavPhase, SearchOutcome, Severity, TreeFetchGateway,
    TreeSession, create_gateway,
};
use downline_test_utils::config::TestConfigBuilder;
use downline_test_utils::fixtures::{FixtureFile, sample_downline};
use downline_test_utils::gateway::RecordingGateway;
use pretty_assertions::assert_eq;
use std::time::Duration;

fn session() -> TreeSession {
    TreeSession::from_config(&TestConfigBuilder::new().build())
}

fn breadcrumb_ids(session: &TreeSession) -> Vec<&str> {
    session.history().iter().map(|b| b.id.as_str()).collect()
}

#[test_log::test(tokio::test)]
async fn test_initial_load_renders_viewer_tree() {
    let gateway = RecordingGateway::new(Some(sample_downline()));
    let mut session = session();

    let key = session.start();
    assert!(session.is_loading());
    assert!(session.fetch_with(&gateway, key).await);

    let tree = session.tree().expect("tree loaded");
    assert_eq!(tree.member_id(), Some("M001"));
    // Depth 3: M007 sits on the fourth level.
    assert!(tree.find("M006").is_some());
    assert!(tree.find("M007").is_none());
    assert_eq!(gateway.requests(), vec![FetchKey::viewer(3)]);
    assert_eq!(session.navigation().phase(), NavPhase::AtRoot);
}

#[test_log::test(tokio::test)]
async fn test_drill_then_breadcrumb_then_reset() {
    let gateway = RecordingGateway::new(Some(sample_downline()));
    let mut session = session();
    let key = session.start();
    session.fetch_with(&gateway, key).await;

    let key = session.drill_into("M002").expect("drill M002");
    session.fetch_with(&gateway, key).await;
    let key = session.drill_into("M005").expect("drill M005");
    session.fetch_with(&gateway, key).await;

    assert_eq!(breadcrumb_ids(&session), vec!["M002", "M005"]);
    assert_eq!(session.history()[0].name, "Priya");
    assert_eq!(
        session.tree().and_then(|t| t.member_id()),
        Some("M005")
    );
    // M007 is now within reach.
    assert!(session.tree().and_then(|t| t.find("M007")).is_some());

    let key = session.navigate_to_breadcrumb("M002").expect("crumb M002");
    session.fetch_with(&gateway, key).await;
    assert_eq!(breadcrumb_ids(&session), vec!["M002"]);

    let key = session.reset_to_root();
    session.fetch_with(&gateway, key).await;
    assert!(session.history().is_empty());
    assert_eq!(session.navigation().phase(), NavPhase::AtRoot);

    let roots: Vec<Option<String>> = gateway
        .requests()
        .into_iter()
        .map(|k| k.root_id)
        .collect();
    assert_eq!(
        roots,
        vec![
            None,
            Some("M002".to_string()),
            Some("M005".to_string()),
            Some("M002".to_string()),
            None,
        ]
    );
}

#[test_log::test(tokio::test)]
async fn test_drilling_current_root_issues_no_fetch() {
    let gateway = RecordingGateway::new(Some(sample_downline()));
    let mut session = session();
    let key = session.start();
    session.fetch_with(&gateway, key).await;
    let key = session.drill_into("M003").expect("drill M003");
    session.fetch_with(&gateway, key).await;

    assert_eq!(session.drill_into("M003"), None);
    assert_eq!(gateway.request_count(), 2);
}

#[test_log::test(tokio::test)]
async fn test_stale_result_is_discarded() {
    let gateway = RecordingGateway::new(Some(sample_downline()));
    let mut session = session();
    let key = session.start();
    session.fetch_with(&gateway, key).await;

    let slow_key = session.drill_into("M002").expect("drill M002");
    let fast_key = session.drill_into("M003").expect("drill M003");

    let fast = gateway.fetch(&fast_key).await;
    assert!(session.resolve(&fast_key, fast));
    let slow = gateway.fetch(&slow_key).await;
    assert!(!session.resolve(&slow_key, slow));

    assert_eq!(session.tree().and_then(|t| t.member_id()), Some("M003"));
    assert_eq!(session.load_state(), &LoadState::Loaded(fast_key));
}

#[test_log::test(tokio::test)]
async fn test_search_miss_suggests_more_depth_then_hits() {
    let gateway = RecordingGateway::new(Some(sample_downline()));
    let mut session = session();
    let key = session.start();
    session.fetch_with(&gateway, key).await;

    assert_eq!(session.search("tables"), SearchOutcome::NotFound);
    let latest = session.notifications().latest().expect("notification");
    assert_eq!(latest.severity, Severity::Info);
    assert!(latest.message.contains("try increasing depth"));

    let key = session.apply_depth("5");
    session.fetch_with(&gateway, key).await;
    assert_eq!(
        session.search("  TABLES "),
        SearchOutcome::Found("M007".to_string())
    );
    assert_eq!(session.highlighted_id(), Some("M007"));

    // Left leg is visited before Bob Singh on the right.
    assert_eq!(session.search("bob"), SearchOutcome::Found("M007".to_string()));
}

#[test_log::test(tokio::test)]
async fn test_fetch_failure_then_retry() {
    let gateway = RecordingGateway::new(Some(sample_downline()));
    gateway.fail_next(FetchError::Network("connection refused".to_string()));
    let mut session = session();

    let key = session.start();
    session.fetch_with(&gateway, key.clone()).await;
    assert!(session.tree().is_none());
    assert!(matches!(session.load_state(), LoadState::Failed { .. }));
    let latest = session.notifications().latest().expect("notification");
    assert_eq!(latest.severity, Severity::Error);

    let retry = session.retry();
    assert_eq!(retry, key);
    session.fetch_with(&gateway, retry).await;
    assert_eq!(session.tree().and_then(|t| t.member_id()), Some("M001"));
}

#[test_log::test(tokio::test)]
async fn test_viewer_without_team_renders_placeholder() {
    let gateway = RecordingGateway::new(None);
    let mut session = session();
    let key = session.start();
    session.fetch_with(&gateway, key).await;

    let tree = session.tree().expect("placeholder tree");
    assert!(tree.is_placeholder());
    assert_eq!(session.search("anyone"), SearchOutcome::NotFound);
}

#[test_log::test(tokio::test)]
async fn test_large_depth_pushes_advisory() {
    let config = TestConfigBuilder::new().advisory_depth_threshold(10).build();
    let mut session = TreeSession::from_config(&config);

    let key = session.apply_depth("25");
    assert_eq!(key.depth, 25);
    let latest = session.notifications().latest().expect("advisory");
    assert_eq!(latest.severity, Severity::Warning);

    let key = session.apply_depth("-4");
    assert_eq!(key.depth, 1);
}

#[test_log::test(tokio::test)]
async fn test_fixture_gateway_from_config_file() {
    let fixture = FixtureFile::write(&sample_downline());
    let config = TestConfigBuilder::new()
        .fixture_path(&fixture.path_str())
        .cache_ttl_secs(0)
        .build();

    let gateway = create_gateway(&config.gateway).await.expect("gateway");
    assert_eq!(gateway.name(), "fixture");

    let mut session = TreeSession::from_config(&config);
    let key = session.drill_into("M003");
    // Nothing loaded yet, so the name falls back to the id.
    let key = key.expect("drill M003");
    session.fetch_with(gateway.as_ref(), key).await;
    assert_eq!(session.history()[0].name, "M003");
    assert_eq!(session.tree().and_then(|t| t.member_id()), Some("M003"));
}

#[test_log::test(tokio::test)]
async fn test_cache_serves_repeat_navigation() {
    let cached = CachedGateway::new(
        FixtureGateway::new(Some(sample_downline())),
        Duration::from_secs(60),
    );
    let mut session = session();

    let key = session.start();
    session.fetch_with(&cached, key).await;
    let key = session.drill_into("M002").expect("drill");
    session.fetch_with(&cached, key).await;
    let key = session.reset_to_root();
    session.fetch_with(&cached, key).await;

    assert_eq!(cached.len(), 2);
    assert_eq!(session.tree().and_then(|t| t.member_id()), Some("M001"));
}
