//! Collection Store and Asset Integration Tests
//!
//! Save/load round trips, layout replacement and the per-scope file
//! operations exposed by the workspace.

use penguin::domain::{AssetScope, Record};
use penguin::media::MediaError;
use penguin::{CollectionStore, ResolvedConfig, Workspace};
use serde_json::{json, Value};
use tempfile::TempDir;

#[tokio::test]
async fn test_record_round_trip_preserves_field_and_array_order() {
    let temp = TempDir::new().unwrap();
    let store: CollectionStore<Record> = CollectionStore::new("Idea", temp.path().join("ideas.json"));

    let items: Vec<Record> = vec![
        Record::from_value(json!({"id": 3, "title": "三", "zz": 1, "aa": [3, 2, 1]})).unwrap(),
        Record::from_value(json!({"id": 1, "prompt": "p", "imageUrl": "/files/creative/x.png"})).unwrap(),
    ];

    store.save(&items).await.unwrap();
    let loaded = store.load().await;
    assert_eq!(loaded, items);

    let raw: Value = serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
    let keys: Vec<&String> = raw[0].as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["id", "title", "zz", "aa"]);
}

#[tokio::test]
async fn test_layout_wholesale_replacement() {
    let temp = TempDir::new().unwrap();
    let workspace = Workspace::new(ResolvedConfig::rooted_at(temp.path()));

    assert!(workspace.layout().load().await.is_empty());

    let items = vec![json!({"id": "a", "x": 10}), json!({"id": "b", "x": 20})];
    workspace.layout().save(&items).await.unwrap();
    assert_eq!(workspace.layout().load().await, items);

    workspace.layout().save(&[]).await.unwrap();
    assert!(workspace.layout().load().await.is_empty());
    assert!(temp.path().join("data").join("desktop_items.json").exists());
}

#[tokio::test]
async fn test_webp_header_produces_webp_file() {
    let temp = TempDir::new().unwrap();
    let workspace = Workspace::new(ResolvedConfig::rooted_at(temp.path()));

    let saved = workspace
        .assets(AssetScope::Output)
        .save_image(Some("data:image/webp;base64,UklGRg=="), None)
        .await
        .unwrap();

    assert!(saved.filename.ends_with(".webp"));
    assert_eq!(saved.url.as_str(), format!("/files/output/{}", saved.filename));
    assert_eq!(saved.path, temp.path().join("output").join(&saved.filename));
}

#[tokio::test]
async fn test_scopes_map_to_their_directories() {
    let temp = TempDir::new().unwrap();
    let workspace = Workspace::new(ResolvedConfig::rooted_at(temp.path()));

    for (scope, dir) in [
        (AssetScope::Creative, "creative_images"),
        (AssetScope::Input, "input"),
        (AssetScope::Output, "output"),
    ] {
        let saved = workspace
            .assets(scope)
            .save_image(Some("aGVsbG8="), Some("same.png"))
            .await
            .unwrap();
        assert_eq!(saved.path, temp.path().join(dir).join("same.png"));
        assert_eq!(saved.url.as_str(), format!("/files/{}/same.png", scope));
    }

    let listed = workspace.assets(AssetScope::Input).list_images().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "same.png");
}

#[tokio::test]
async fn test_missing_image_data_is_invalid_input_without_side_effects() {
    let temp = TempDir::new().unwrap();
    let workspace = Workspace::new(ResolvedConfig::rooted_at(temp.path()));

    let err = workspace
        .assets(AssetScope::Input)
        .save_image(None, Some("x.png"))
        .await
        .unwrap_err();

    assert!(matches!(err, MediaError::MissingData));
    assert!(err.is_client_error());
    assert!(!temp.path().join("input").exists());
}
