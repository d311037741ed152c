//! Content browsing against real repositories.
//!
//! These tests seed commits with the system git binary and are skipped when
//! it is not installed.

use std::path::Path;
use std::process::Command as ProcessCommand;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use gitloom::app::App;
use gitloom::config::Config;
use gitloom::error::Error;
use gitloom::git::EntryKind;
use gitloom::types::Visibility;
use tempfile::TempDir;

fn git_available() -> bool {
    ProcessCommand::new("git").arg("--version").output().is_ok()
}

fn open_app(dir: &TempDir) -> App {
    let config = Config {
        data_dir: dir.path().to_path_buf(),
        repos_dir: dir.path().join("repos"),
        session_ttl: None,
    };
    App::open(config).expect("open app")
}

fn run_git(dir: &Path, args: &[&str]) {
    let output = ProcessCommand::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

const BINARY_BYTES: &[u8] = &[0x89, 0x50, 0x4e, 0x47, 0x00, 0x0d, 0x0a, 0x1a];

/// Creates the `demo` repository and pushes one commit to `branch` in it.
async fn seed_repo(app: &App, scratch: &Path, branch: &str) {
    let (user, _) = app
        .signup("seed@example.com", "Seed", "pw")
        .await
        .expect("signup");
    app.repos
        .create("demo", Visibility::Private, &user.id)
        .await
        .expect("create repo");

    let work = scratch.join("work");
    std::fs::create_dir_all(&work).expect("create work dir");
    run_git(&work, &["init"]);
    run_git(&work, &["config", "user.email", "seed@example.com"]);
    run_git(&work, &["config", "user.name", "Seed"]);

    std::fs::write(work.join("README.md"), "# demo\n\nhello\n").expect("write readme");
    std::fs::create_dir_all(work.join("docs")).expect("create docs");
    std::fs::write(work.join("docs").join("guide.md"), "guide\n").expect("write guide");
    std::fs::write(work.join("logo.bin"), BINARY_BYTES).expect("write binary");

    run_git(&work, &["add", "."]);
    run_git(&work, &["commit", "-m", "seed"]);

    let bare = app.repos.get("demo").expect("repo exists").path;
    let refspec = format!("HEAD:refs/heads/{branch}");
    run_git(
        &work,
        &["push", "--quiet", bare.to_str().expect("utf8 path"), &refspec],
    );
}

#[tokio::test]
async fn tree_lists_directories_before_files() {
    if !git_available() {
        eprintln!("Skipping tree test: git not available");
        return;
    }

    let dir = TempDir::new().expect("temp dir");
    let app = open_app(&dir);
    seed_repo(&app, dir.path(), "main").await;

    let entries = app.repos.tree("demo", None, "").await.expect("list tree");
    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["docs", "README.md", "logo.bin"]);

    assert_eq!(entries[0].entry_type, EntryKind::Tree);
    assert_eq!(entries[0].size, None);
    assert_eq!(entries[1].entry_type, EntryKind::Blob);
    assert_eq!(entries[1].size, Some("# demo\n\nhello\n".len() as u64));
}

#[tokio::test]
async fn tree_of_subdirectory_builds_full_paths() {
    if !git_available() {
        eprintln!("Skipping subtree test: git not available");
        return;
    }

    let dir = TempDir::new().expect("temp dir");
    let app = open_app(&dir);
    seed_repo(&app, dir.path(), "main").await;

    let entries = app
        .repos
        .tree("demo", None, "docs")
        .await
        .expect("list subtree");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "guide.md");
    assert_eq!(entries[0].path, "docs/guide.md");
}

#[tokio::test]
async fn blob_returns_text_content_as_utf8() {
    if !git_available() {
        eprintln!("Skipping blob test: git not available");
        return;
    }

    let dir = TempDir::new().expect("temp dir");
    let app = open_app(&dir);
    seed_repo(&app, dir.path(), "main").await;

    let blob = app
        .repos
        .blob("demo", None, "README.md")
        .await
        .expect("read blob");
    assert_eq!(blob.encoding, gitloom::git::BlobEncoding::Utf8);
    assert_eq!(blob.content, "# demo\n\nhello\n");
}

#[tokio::test]
async fn blob_encodes_binary_content_as_base64() {
    if !git_available() {
        eprintln!("Skipping binary blob test: git not available");
        return;
    }

    let dir = TempDir::new().expect("temp dir");
    let app = open_app(&dir);
    seed_repo(&app, dir.path(), "main").await;

    let blob = app
        .repos
        .blob("demo", None, "logo.bin")
        .await
        .expect("read blob");
    assert_eq!(blob.encoding, gitloom::git::BlobEncoding::Base64);
    let decoded = STANDARD.decode(&blob.content).expect("valid base64");
    assert_eq!(decoded, BINARY_BYTES);
}

#[tokio::test]
async fn missing_paths_map_to_not_found() {
    if !git_available() {
        eprintln!("Skipping missing path test: git not available");
        return;
    }

    let dir = TempDir::new().expect("temp dir");
    let app = open_app(&dir);
    seed_repo(&app, dir.path(), "main").await;

    let err = app
        .repos
        .blob("demo", None, "nope.txt")
        .await
        .expect_err("missing blob");
    assert!(matches!(err, Error::NotFound(_)));

    let err = app
        .repos
        .tree("demo", None, "no-such-dir")
        .await
        .expect_err("missing subtree");
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn unknown_refs_fall_back_to_the_default_chain() {
    if !git_available() {
        eprintln!("Skipping ref fallback test: git not available");
        return;
    }

    let dir = TempDir::new().expect("temp dir");
    let app = open_app(&dir);
    seed_repo(&app, dir.path(), "main").await;

    let resolved = app
        .repos
        .resolve_ref("demo", Some("feature-x"))
        .await
        .expect("resolve");
    assert_eq!(resolved, "main");

    let resolved = app.repos.resolve_ref("demo", None).await.expect("resolve");
    assert_eq!(resolved, "main");
}

#[tokio::test]
async fn master_only_repository_resolves_master() {
    if !git_available() {
        eprintln!("Skipping master fallback test: git not available");
        return;
    }

    let dir = TempDir::new().expect("temp dir");
    let app = open_app(&dir);
    seed_repo(&app, dir.path(), "master").await;

    let resolved = app.repos.resolve_ref("demo", None).await.expect("resolve");
    assert_eq!(resolved, "master");

    let entries = app.repos.tree("demo", None, "").await.expect("list tree");
    assert!(!entries.is_empty());
}

#[tokio::test]
async fn empty_repository_resolves_unborn_branch() {
    if !git_available() {
        eprintln!("Skipping empty repo test: git not available");
        return;
    }

    let dir = TempDir::new().expect("temp dir");
    let app = open_app(&dir);
    let (user, _) = app
        .signup("seed@example.com", "Seed", "pw")
        .await
        .expect("signup");
    app.repos
        .create("empty", Visibility::Private, &user.id)
        .await
        .expect("create repo");

    // HEAD names the unborn main branch even before any commit exists.
    let resolved = app.repos.resolve_ref("empty", None).await.expect("resolve");
    assert_eq!(resolved, "main");
    assert_eq!(
        app.repos.default_branch("empty").await.expect("default"),
        "main"
    );

    let err = app
        .repos
        .tree("empty", None, "")
        .await
        .expect_err("no commits to list");
    assert!(matches!(err, Error::NotFound(_) | Error::BackendFailure(_)));
}
