#![allow(clippy::unwrap_used, clippy::expect_used)]

use aula_kiosk::{
    cli::{
        actions::{login, scan},
        globals::GlobalArgs,
    },
    directory::{DirectoryConfig, Movement, RecordId, Tables},
    session::{FileStore, SessionStore},
};
use secrecy::SecretString;
use serde_json::json;
use std::{
    net::TcpListener,
    path::{Path, PathBuf},
    time::Duration,
};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TABLES: &str = "/teams/team1/databases/db1/tables";

fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

fn session_path(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("aula_kiosk_one_shot_{name}_{}", std::process::id()));
    path.push("session.json");
    std::fs::remove_file(&path).ok();
    path
}

fn globals(session_file: &Path) -> GlobalArgs {
    GlobalArgs::new(Some(session_file.to_path_buf()), Duration::from_secs(5))
}

fn directory(api_url: &str) -> DirectoryConfig {
    DirectoryConfig {
        api_url: api_url.to_string(),
        team_id: "team1".to_string(),
        database_id: "db1".to_string(),
        tables: Tables::default(),
        api_key: SecretString::from("test-key".to_string()),
        request_timeout: None,
    }
}

async fn mount_collections(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(format!("{TABLES}/C/records")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 4, "fields": {"Aula": "Aula 1", "Contraseña": "pw"}},
            {"id": 9, "fields": {"Aula": "Aula 2", "Contraseña": "otra"}}
        ])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{TABLES}/A/records")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 16, "fields": {"Alumno": "Bruno", "ID": "S123"}}
        ])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn scan_without_a_stored_classroom_fails() {
    let session_file = session_path("scan_logged_out");

    let err = scan::execute(scan::Args {
        globals: globals(&session_file),
        directory: directory("http://127.0.0.1:9"),
        movement: Movement::Entry,
        code: "S123".to_string(),
    })
    .await
    .unwrap_err();

    assert!(err.to_string().contains("No classroom is logged in"));
}

#[tokio::test]
async fn scan_records_for_the_stored_classroom() {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return;
    }
    let server = MockServer::start().await;
    mount_collections(&server).await;

    Mock::given(method("POST"))
        .and(path(format!("{TABLES}/E/records")))
        .and(body_json(json!([
            {"fields": {"Alumno": 16, "Aula": 4, "Movimiento": 2}}
        ])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 700}])))
        .expect(1)
        .mount(&server)
        .await;

    let session_file = session_path("scan_recorded");
    SessionStore::new(FileStore::new(&session_file))
        .save("Aula 1", &RecordId::new("4"))
        .unwrap();

    scan::execute(scan::Args {
        globals: globals(&session_file),
        directory: directory(&server.uri()),
        movement: Movement::Exit,
        code: "S123".to_string(),
    })
    .await
    .expect("scan recorded");

    std::fs::remove_file(&session_file).ok();
}

#[tokio::test]
async fn scan_of_an_unknown_code_fails_with_the_notice_text() {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return;
    }
    let server = MockServer::start().await;
    mount_collections(&server).await;

    Mock::given(method("POST"))
        .and(path(format!("{TABLES}/E/records")))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let session_file = session_path("scan_unknown");
    SessionStore::new(FileStore::new(&session_file))
        .save("Aula 1", &RecordId::new("4"))
        .unwrap();

    let err = scan::execute(scan::Args {
        globals: globals(&session_file),
        directory: directory(&server.uri()),
        movement: Movement::Entry,
        code: "ZZZ".to_string(),
    })
    .await
    .unwrap_err();

    assert_eq!(err.to_string(), "Student not found.");

    std::fs::remove_file(&session_file).ok();
}

#[tokio::test]
async fn login_replaces_the_stored_classroom() {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return;
    }
    let server = MockServer::start().await;
    mount_collections(&server).await;

    let session_file = session_path("login_replace");
    let sessions = SessionStore::new(FileStore::new(&session_file));
    let mut previous = SessionStore::new(FileStore::new(&session_file));
    previous.save("Aula 2", &RecordId::new("9")).unwrap();

    login::execute(login::Args {
        globals: globals(&session_file),
        directory: directory(&server.uri()),
        classroom: " aula 1 ".to_string(),
        password: Some(SecretString::from("pw".to_string())),
    })
    .await
    .expect("login");

    let stored = sessions.load().unwrap();
    assert_eq!(stored.classroom_name, "Aula 1");
    assert_eq!(stored.classroom_id, RecordId::new("4"));

    std::fs::remove_file(&session_file).ok();
}

#[tokio::test]
async fn rejected_login_keeps_the_previous_classroom() {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return;
    }
    let server = MockServer::start().await;
    mount_collections(&server).await;

    let session_file = session_path("login_rejected");
    let mut sessions = SessionStore::new(FileStore::new(&session_file));
    sessions.save("Aula 2", &RecordId::new("9")).unwrap();

    let err = login::execute(login::Args {
        globals: globals(&session_file),
        directory: directory(&server.uri()),
        classroom: "Aula 1".to_string(),
        password: Some(SecretString::from("wrong".to_string())),
    })
    .await
    .unwrap_err();

    assert_eq!(err.to_string(), "Incorrect classroom or password");
    assert_eq!(
        sessions.load().map(|s| s.classroom_id),
        Some(RecordId::new("9"))
    );

    std::fs::remove_file(&session_file).ok();
}
