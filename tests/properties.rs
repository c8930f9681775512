use dirlist::config::{AppState, Config, ListingFormat};
use dirlist::handler::handle_request;
use dirlist::listing::checksum;
use http_body_util::{BodyExt, Empty};
use hyper::body::Bytes;
use hyper::{Request, StatusCode};
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

fn state(root: &Path, format: ListingFormat) -> Arc<AppState> {
    let mut config = Config::default();
    config.listing.root = root.to_string_lossy().into_owned();
    config.listing.format = format;
    config.logging.access_log = false;
    Arc::new(AppState::new(&config).unwrap())
}

async fn get(state: &Arc<AppState>, uri: &str) -> (StatusCode, Bytes) {
    let req = Request::get(uri).body(Empty::<Bytes>::new()).unwrap();
    let peer: SocketAddr = "127.0.0.1:50000".parse().unwrap();
    let response = handle_request(req, Arc::clone(state), peer).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body)
}

/// a.txt = "hi", b/c.txt, b/deeper/d.bin, empty/
fn tree() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "hi").unwrap();
    fs::create_dir_all(dir.path().join("b/deeper")).unwrap();
    fs::write(dir.path().join("b/c.txt"), "see").unwrap();
    fs::write(dir.path().join("b/deeper/d.bin"), [0_u8, 159, 146, 150]).unwrap();
    fs::create_dir(dir.path().join("empty")).unwrap();
    dir
}

#[tokio::test]
async fn scenario_root_listing() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "hi").unwrap();
    fs::create_dir(dir.path().join("b")).unwrap();
    fs::write(dir.path().join("b/c.txt"), "other").unwrap();
    let state = state(dir.path(), ListingFormat::Detailed);

    let (status, body) = get(&state, "/").await;
    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        value,
        json!([
            {"name": "a.txt", "type": "file", "sha1": "c22b5f9178342609428d6f51b2c5af4c0bde6a42"},
            {"name": "b", "type": "folder"},
            {"name": "b/c.txt", "type": "file", "sha1": checksum(dir.path().join("b/c.txt")).unwrap()},
        ])
    );
}

#[tokio::test]
async fn files_are_served_byte_identical() {
    let dir = tree();
    let state = state(dir.path(), ListingFormat::Detailed);

    for name in ["a.txt", "b/c.txt", "b/deeper/d.bin"] {
        let (status, body) = get(&state, &format!("/{name}")).await;
        assert_eq!(status, StatusCode::OK, "{name}");
        assert_eq!(body.as_ref(), fs::read(dir.path().join(name)).unwrap().as_slice());
    }
}

#[tokio::test]
async fn listing_names_match_descendants() {
    let dir = tree();
    let state = state(dir.path(), ListingFormat::Names);

    let (_, body) = get(&state, "/").await;
    let value: Value = serde_json::from_slice(&body).unwrap();
    let names: BTreeSet<String> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap().to_string())
        .collect();
    let expected: BTreeSet<String> = ["a.txt", "b", "b/c.txt", "b/deeper", "b/deeper/d.bin", "empty"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(names, expected);

    let (_, body) = get(&state, "/b/deeper/").await;
    assert_eq!(body, r#"[{"name":"d.bin"}]"#);
}

#[tokio::test]
async fn digests_match_independent_recomputation() {
    let dir = tree();
    let state = state(dir.path(), ListingFormat::Detailed);

    let (_, body) = get(&state, "/").await;
    let value: Value = serde_json::from_slice(&body).unwrap();
    for entry in value.as_array().unwrap() {
        let name = entry["name"].as_str().unwrap();
        match entry["type"].as_str().unwrap() {
            "file" => {
                let expected = checksum(dir.path().join(name)).unwrap();
                assert_eq!(entry["sha1"], expected.as_str(), "{name}");
            }
            "folder" => assert!(entry.get("sha1").is_none(), "{name}"),
            other => panic!("unexpected type {other}"),
        }
    }
}

#[tokio::test]
async fn repeated_listing_is_identical() {
    let dir = tree();
    for format in [ListingFormat::Detailed, ListingFormat::Names, ListingFormat::Split] {
        let state = state(dir.path(), format);
        let (_, first) = get(&state, "/").await;
        let (_, second) = get(&state, "/").await;
        assert_eq!(first, second, "{format}");
    }
}

#[tokio::test]
async fn empty_root_lists_empty() {
    let dir = tempfile::tempdir().unwrap();

    let (status, body) = get(&state(dir.path(), ListingFormat::Detailed), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");

    let (_, body) = get(&state(dir.path(), ListingFormat::Split), "/").await;
    assert_eq!(body, r#"{"folders":[],"files":[]}"#);
}

#[tokio::test]
async fn dotdot_never_leaves_the_root() {
    let parent = tempfile::tempdir().unwrap();
    let root = parent.path().join("served");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("inside.txt"), "inside").unwrap();
    fs::write(parent.path().join("secret.txt"), "secret").unwrap();
    let state = state(&root, ListingFormat::Detailed);

    let (status, body) = get(&state, "/../secret.txt").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_empty());

    let (status, _) = get(&state, "/%2e%2e/secret.txt").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Clamped at the root, so this is inside.txt
    let (status, body) = get(&state, "/../../inside.txt").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "inside");

    // Listing the clamped root never mentions the parent's files
    let (_, body) = get(&state, "/..").await;
    assert_eq!(
        serde_json::from_slice::<Value>(&body).unwrap(),
        json!([{"name": "inside.txt", "type": "file", "sha1": checksum(root.join("inside.txt")).unwrap()}])
    );
}

#[tokio::test]
async fn missing_path_is_404() {
    let dir = tree();
    let state = state(dir.path(), ListingFormat::Detailed);

    let (status, body) = get(&state, "/b/nothing.txt").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_empty());
}

#[tokio::test]
async fn percent_encoded_names_resolve() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("with space.txt"), "spaced").unwrap();
    let state = state(dir.path(), ListingFormat::Names);

    let (status, body) = get(&state, "/with%20space.txt").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "spaced");

    let (_, body) = get(&state, "/").await;
    assert_eq!(body, r#"[{"name":"with space.txt"}]"#);
}

#[cfg(unix)]
#[tokio::test]
async fn symlink_out_of_root_is_neither_hashed_nor_served() {
    let parent = tempfile::tempdir().unwrap();
    let root = parent.path().join("served");
    fs::create_dir(&root).unwrap();
    fs::write(parent.path().join("secret.txt"), "hi").unwrap();
    std::os::unix::fs::symlink("../secret.txt", root.join("link")).unwrap();
    let state = state(&root, ListingFormat::Detailed);

    let (status, body) = get(&state, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        serde_json::from_slice::<Value>(&body).unwrap(),
        json!([{"name": "link", "type": "file"}])
    );

    let (status, body) = get(&state, "/link").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_empty());
}
