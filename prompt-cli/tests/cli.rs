use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("prompt-cli").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_screen_commands() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("feed"))
        .stdout(predicate::str::contains("profile"))
        .stdout(predicate::str::contains("like"));
}

#[test]
fn status_without_token_reports_no_session() {
    let dir = tempdir().unwrap();
    let session_file = dir.path().join("session.json");

    cli()
        .arg("--session-file")
        .arg(&session_file)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("No session found"));
}

#[test]
fn status_with_short_token_shows_preview() {
    let dir = tempdir().unwrap();
    let session_file = dir.path().join("session.json");
    std::fs::write(
        &session_file,
        r#"{"access_token":"abc","refresh_token":"r1","expires_at":1714564800,
            "user":{"id":"u1","email":"me@example.com"}}"#,
    )
    .unwrap();

    cli()
        .arg("--session-file")
        .arg(&session_file)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Token: abc..."))
        .stdout(predicate::str::contains("Length: 3 characters"))
        .stdout(predicate::str::contains("Email: me@example.com"))
        .stdout(predicate::str::contains("Expires: 2024-05-01 12:00 UTC"))
        .stdout(predicate::str::contains("Refresh token: stored"));
}

#[test]
fn bare_token_file_is_treated_as_no_session() {
    let dir = tempdir().unwrap();
    let session_file = dir.path().join("session.json");
    std::fs::write(&session_file, "abc\n").unwrap();

    cli()
        .arg("--session-file")
        .arg(&session_file)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("No session found"));
}

#[test]
fn profile_without_session_points_to_login() {
    let dir = tempdir().unwrap();
    let session_file = dir.path().join("session.json");

    cli()
        .arg("--session-file")
        .arg(&session_file)
        .arg("profile")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Not logged in"));
}

#[test]
fn unknown_category_is_rejected_with_vocabulary() {
    cli()
        .args(["feed", "--category", "음악"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown category"))
        .stderr(predicate::str::contains("분석 및 요약"));
}
