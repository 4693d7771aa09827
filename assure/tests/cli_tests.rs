use anyhow::Result;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::{Value, json};
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Isolated working directory with a config pointing at a mock platform.
struct AssureTestEnv {
    _tmp: TempDir,
    root: PathBuf,
}

impl AssureTestEnv {
    fn new(server: &MockServer) -> Result<Self> {
        let tmp = tempfile::tempdir()?;
        let root = tmp.path().to_path_buf();
        std::fs::write(
            root.join("assure.yaml"),
            format!(
                "api:\n  base_url: {}\n  timeout_secs: 5\npolling:\n  max_duration_secs: 60\n",
                server.uri()
            ),
        )?;
        Ok(Self { _tmp: tmp, root })
    }

    fn logged_in(server: &MockServer) -> Result<Self> {
        let env = Self::new(server)?;
        std::fs::write(env.root.join(".assure-token"), "tok-1")?;
        Ok(env)
    }

    fn assure(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("assure"));
        cmd.current_dir(&self.root);
        for key in [
            "ASSURE_API_URL",
            "ASSURE_TIMEOUT_SECS",
            "ASSURE_MAX_POLL_SECS",
            "ASSURE_TOKEN_PATH",
            "ASSURE_TOKEN",
            "RUST_LOG",
        ] {
            cmd.env_remove(key);
        }
        cmd
    }
}

fn response(id: &str, verdict: &str, level: &str, relevant: bool) -> Value {
    json!({
        "id": id,
        "assessment_id": "a1",
        "question_id": format!("q-{id}"),
        "verdict": verdict,
        "compliance_level": level,
        "is_relevant": relevant,
    })
}

/// 8 relevant of 10: 5 compliant, 2 partial, 1 non-compliant.
fn mixed_report() -> Value {
    let mut responses: Vec<Value> = (1..=5)
        .map(|i| response(&format!("r{i}"), "satisfactory", "compliant", true))
        .collect();
    responses.push(response("r6", "unsatisfactory", "partially_compliant", true));
    responses.push(response("r7", "unsatisfactory", "partially_compliant", true));
    responses.push(response("r8", "requirement", "non_compliant", true));
    responses.push(response("r9", "unsatisfactory", "non_compliant", false));
    responses.push(response("r10", "unsatisfactory", "non_compliant", false));
    json!({ "responses": responses, "total_questions": 10 })
}

async fn mount_report(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/assessments/a1/report"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mixed_report()))
        .mount(server)
        .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_and_logout_manage_token_file() -> Result<()> {
    let server = MockServer::start().await;
    let env = AssureTestEnv::new(&server)?;
    let token_file = env.root.join(".assure-token");

    env.assure()
        .args(["login", "--token", "secret"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in"));
    assert_eq!(std::fs::read_to_string(&token_file)?, "secret");

    env.assure().arg("logout").assert().success();
    assert!(!token_file.exists());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_commands_require_login() -> Result<()> {
    let server = MockServer::start().await;
    let env = AssureTestEnv::new(&server)?;

    env.assure()
        .args(["summary", "a1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not logged in"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_summary_modes_diverge_on_mixed_data() -> Result<()> {
    let server = MockServer::start().await;
    mount_report(&server).await;
    let env = AssureTestEnv::logged_in(&server)?;

    let output = env
        .assure()
        .args(["summary", "a1", "--mode", "weighted", "--format", "json"])
        .output()?;
    assert!(output.status.success());
    let weighted: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(weighted["summary"]["compliance_score_percent"], 75);
    assert_eq!(weighted["summary"]["total_relevant"], 8);

    let output = env
        .assure()
        .args(["summary", "a1", "--format", "json"])
        .output()?;
    assert!(output.status.success());
    let verdict: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(verdict["summary"]["compliance_score_percent"], 63);
    assert_eq!(verdict["summary"]["satisfactory_count"], 5);
    assert_eq!(verdict["consultant"]["pending"], 10);
    assert!(verdict["human_review"].is_null());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_track_prints_summary_after_completion() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/assessments/a1/job-status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "job": { "status": "Completed", "progress_percent": 100.0 },
            "is_complete": true
        })))
        .mount(&server)
        .await;
    mount_report(&server).await;
    let env = AssureTestEnv::logged_in(&server)?;

    env.assure()
        .args(["track", "a1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Analysis complete (10 questions)"))
        .stdout(predicate::str::contains("63%"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_track_falls_back_to_legacy_progress() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/assessments/a1/job-status"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/assessments/a1/progress"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "completed" })))
        .mount(&server)
        .await;
    mount_report(&server).await;
    let env = AssureTestEnv::logged_in(&server)?;

    env.assure()
        .args(["track", "a1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Analysis complete"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_track_failed_job_exits_non_zero() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/assessments/a1/job-status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "job": { "status": "Failed", "error_message": "OCR failed on page 3" },
            "is_complete": true
        })))
        .mount(&server)
        .await;
    let env = AssureTestEnv::logged_in(&server)?;

    env.assure()
        .args(["track", "a1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("OCR failed on page 3"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_track_stops_when_session_expires() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let env = AssureTestEnv::logged_in(&server)?;

    env.assure()
        .args(["track", "a1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("assure login"));
    assert!(!env.root.join(".assure-token").exists());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_documents_table_shows_current_assessment() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/projects/p1/documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                { "id": "d1", "project_id": "p1", "file_name": "fire-strategy.pdf", "category_id": "c1" },
                { "id": "d2", "project_id": "p1", "file_name": "structure.pdf" }
            ],
            "total": 2, "page": 1, "page_size": 20
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "c1", "name": "Fire safety", "code": "FS" }
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/documents/d1/assessments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "a0", "document_id": "d1", "assessment_type": "ai", "status": "failed" },
            { "id": "a1", "document_id": "d1", "assessment_type": "ai", "status": "completed" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/documents/d2/assessments"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_report(&server).await;
    let env = AssureTestEnv::logged_in(&server)?;

    env.assure()
        .args(["documents", "p1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fire-strategy.pdf"))
        .stdout(predicate::str::contains("Fire safety (FS)"))
        .stdout(predicate::str::contains("75%"))
        .stdout(predicate::str::contains("not assessed"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_review_persists_decision() -> Result<()> {
    let server = MockServer::start().await;
    mount_report(&server).await;
    Mock::given(method("PATCH"))
        .and(path("/assessments/a1/responses/r6/consultant-review"))
        .and(body_json(json!({ "consultant_accepted": true, "consultant_notes": "agreed" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    let env = AssureTestEnv::logged_in(&server)?;

    env.assure()
        .args(["review", "a1", "r6", "accept", "--notes", "agreed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("marked accepted"))
        .stdout(predicate::str::contains("1/10 reviewed"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_expired_token_is_cleared() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/assessments/a1/report"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let env = AssureTestEnv::logged_in(&server)?;

    env.assure().args(["summary", "a1"]).assert().failure();
    assert!(!env.root.join(".assure-token").exists());
    Ok(())
}
