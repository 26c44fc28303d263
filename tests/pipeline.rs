mod common;

use common::{video, Canned, FakeApi, FakeTranscripts};
use serde_json::Value;
use yt_harvest::config::{HarvestConfig, StoreFormat};
use yt_harvest::youtube::{CategoryCatalog, TranscriptSource};
use yt_harvest::{run_harvest, HarvestSummary};

fn config(dir: &std::path::Path) -> HarvestConfig {
    HarvestConfig {
        categories: vec!["1".into(), "10".into()],
        per_category_target: 3,
        overall_target: 100,
        chunk_size: 2,
        output_path: dir.join("videos_metadata.json"),
        ..HarvestConfig::default()
    }
}

fn api() -> FakeApi {
    FakeApi::new()
        .with_pages(
            "1",
            vec![
                vec![video("f1", Some(4.0)), video("f-long", Some(40.0))],
                vec![video("f2", Some(5.0)), video("f3", Some(6.0)), video("f4", Some(7.0))],
            ],
        )
        .with_pages("10", vec![vec![video("m1", Some(3.5)), video("m2", Some(12.0))]])
}

#[tokio::test]
async fn collects_labels_and_saves_in_chunks() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path());
    let catalog = CategoryCatalog::default();
    let api = api();

    let summary = run_harvest(&cfg, &catalog, &api, None).await.unwrap();

    assert_eq!(
        summary,
        HarvestSummary {
            collected: 5,
            with_transcripts: 0,
            chunks_written: 3,
        }
    );
    let stored: Vec<Value> =
        serde_json::from_str(&std::fs::read_to_string(&cfg.output_path).unwrap()).unwrap();
    let ids: Vec<&str> = stored.iter().filter_map(|v| v["video_id"].as_str()).collect();
    assert_eq!(ids, vec!["f1", "f2", "f3", "m1", "m2"]);
    assert_eq!(stored[0]["category"], "Film & Animation");
    assert_eq!(stored[4]["category"], "Music");
    assert_eq!(stored[0]["video_url"], "https://www.youtube.com/watch?v=f1");
    assert!(stored[0].get("transcript").is_none());
}

#[tokio::test]
async fn transcripts_are_attached_when_a_source_is_given() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config(dir.path());
    cfg.store_format = StoreFormat::JsonLines;
    cfg.output_path = dir.path().join("videos.jsonl");
    let catalog = CategoryCatalog::default();
    let api = api();
    let source = FakeTranscripts::new()
        .answer("f1", Canned::Text("hello there"))
        .answer("m2", Canned::Disabled);

    let summary = run_harvest(
        &cfg,
        &catalog,
        &api,
        Some(&source as &dyn TranscriptSource),
    )
    .await
    .unwrap();

    assert_eq!(summary.collected, 5);
    assert_eq!(summary.with_transcripts, 1);
    let raw = std::fs::read_to_string(&cfg.output_path).unwrap();
    let first: Value = serde_json::from_str(raw.lines().next().unwrap()).unwrap();
    assert_eq!(first["transcript"], "hello there");
}

#[tokio::test]
async fn previous_runs_are_preserved() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path());
    let catalog = CategoryCatalog::default();

    run_harvest(&cfg, &catalog, &api(), None).await.unwrap();
    run_harvest(&cfg, &catalog, &api(), None).await.unwrap();

    let stored: Vec<Value> =
        serde_json::from_str(&std::fs::read_to_string(&cfg.output_path).unwrap()).unwrap();
    assert_eq!(stored.len(), 10);
}

#[tokio::test]
async fn invalid_config_is_rejected_before_any_call() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config(dir.path());
    cfg.chunk_size = 0;
    let api = api();

    assert!(run_harvest(&cfg, &CategoryCatalog::default(), &api, None)
        .await
        .is_err());
    assert_eq!(api.search_count(), 0);
}

#[tokio::test]
async fn transcript_failure_aborts_before_saving() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path());
    let api = api();
    let source = FakeTranscripts::new()
        .answer("f1", Canned::Text("hello"))
        .answer("m1", Canned::Broken);

    let result = run_harvest(
        &cfg,
        &CategoryCatalog::default(),
        &api,
        Some(&source as &dyn TranscriptSource),
    )
    .await;

    assert!(result.is_err());
    assert!(!cfg.output_path.exists());
}
