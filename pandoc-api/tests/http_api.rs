//! End-to-end behaviour of the HTTP surface against a fake converter.

use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, Response, StatusCode, header};
use camino::Utf8PathBuf;
use pandoc_api::http::POWERED_BY;
use pandoc_api::{ProcessOutput, ProcessRunner, RunMode, ServiceConfig, app, build_router};
use rstest::rstest;
use tempfile::TempDir;
use test_helpers::fixtures::PANDOC_HELP;
use tower::ServiceExt;

const UPLOAD_LIMIT: usize = 4096;

/// Stands in for pandoc: answers `--help` and copies the input to the
/// `--output=` path with a marker prefix.
#[derive(Debug, Default)]
struct FakePandoc {
    stderr: Option<String>,
    writes_before_stderr: bool,
    delay: Option<Duration>,
    conversions: Mutex<Vec<Vec<String>>>,
}

impl FakePandoc {
    /// Reports `stderr` without producing any output file.
    fn failing(stderr: &str) -> Self {
        Self {
            stderr: Some(stderr.to_owned()),
            ..Self::default()
        }
    }

    /// Writes the output file and still reports `stderr`, like pandoc
    /// printing `[WARNING]` lines.
    fn warning(stderr: &str) -> Self {
        Self {
            stderr: Some(stderr.to_owned()),
            writes_before_stderr: true,
            ..Self::default()
        }
    }

    fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    fn conversions(&self) -> Vec<Vec<String>> {
        self.conversions.lock().expect("conversions lock").clone()
    }
}

#[async_trait]
impl ProcessRunner for FakePandoc {
    async fn run(&self, _program: &str, args: &[String]) -> io::Result<ProcessOutput> {
        if args == ["--help"] {
            return Ok(ProcessOutput {
                status: Some(0),
                stdout: PANDOC_HELP.as_bytes().to_vec(),
                stderr: Vec::new(),
            });
        }
        self.conversions
            .lock()
            .expect("conversions lock")
            .push(args.to_vec());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let diagnostics = self
            .stderr
            .as_ref()
            .map(|stderr| stderr.as_bytes().to_vec())
            .unwrap_or_default();
        if !diagnostics.is_empty() && !self.writes_before_stderr {
            return Ok(ProcessOutput {
                status: Some(1),
                stdout: Vec::new(),
                stderr: diagnostics,
            });
        }
        let output = args
            .iter()
            .find_map(|arg| arg.strip_prefix("--output="))
            .expect("output argument");
        let input = args.last().expect("input argument");
        let mut converted = b"converted:".to_vec();
        converted.extend(std::fs::read(input)?);
        std::fs::write(output, converted)?;
        Ok(ProcessOutput {
            status: Some(0),
            stdout: Vec::new(),
            stderr: diagnostics,
        })
    }
}

struct Harness {
    _scratch: TempDir,
    temp_dir: Utf8PathBuf,
    runner: Arc<FakePandoc>,
    router: Router,
}

impl Harness {
    async fn new(fake: FakePandoc, mode: RunMode) -> Self {
        let scratch = tempfile::tempdir().expect("tempdir");
        let temp_dir = Utf8PathBuf::from_path_buf(scratch.path().join("pandoc-api"))
            .expect("utf-8 tempdir");
        let config = ServiceConfig {
            temp_dir: temp_dir.clone(),
            mode,
            max_upload_bytes: UPLOAD_LIMIT,
            ..ServiceConfig::default()
        };
        let runner = Arc::new(fake);
        let state = app::build_state(&config, runner.clone())
            .await
            .expect("state builds");
        Self {
            _scratch: scratch,
            temp_dir,
            runner,
            router: build_router(state, config.max_upload_bytes),
        }
    }

    async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    async fn wait_for_cleanup(&self, limit: Duration) -> usize {
        let deadline = tokio::time::Instant::now() + limit;
        while self.leftover_files() > 0 && tokio::time::Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        self.leftover_files()
    }

    fn leftover_files(&self) -> usize {
        std::fs::read_dir(&self.temp_dir)
            .expect("temp dir exists")
            .count()
    }
}

fn raw_upload(uri: &str, file_name: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{file_name}\""),
        )
        .body(body.into())
        .expect("request")
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).expect("json body")
}

fn header_text<'a>(response: &'a Response<Body>, name: &header::HeaderName) -> &'a str {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

#[rstest]
#[tokio::test]
async fn root_redirects_to_help() {
    let harness = Harness::new(FakePandoc::default(), RunMode::Development).await;
    let response = harness
        .send(Request::get("/").body(Body::empty()).expect("request"))
        .await;
    assert!(response.status().is_redirection());
    assert_eq!(header_text(&response, &header::LOCATION), "/api/help");
}

#[rstest]
#[tokio::test]
async fn help_serves_banner_and_converter_help() {
    let harness = Harness::new(FakePandoc::default(), RunMode::Development).await;
    let response = harness
        .send(Request::get("/api/help").body(Body::empty()).expect("request"))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(header_text(&response, &header::CONTENT_TYPE).starts_with("text/plain"));
    assert_eq!(
        header_text(&response, &header::HeaderName::from_static("x-powered-by")),
        POWERED_BY
    );
    let text = body_text(response).await;
    assert!(text.starts_with("pandoc-api, a RESTful wrapper for pandoc"));
    assert!(text.contains("http://localhost:4000/api/convert/from/docx/to/html"));
    assert!(text.ends_with(PANDOC_HELP));
}

#[rstest]
#[tokio::test]
async fn raw_upload_is_converted_and_cleaned_up() {
    let harness = Harness::new(FakePandoc::default(), RunMode::Development).await;
    let response = harness
        .send(raw_upload(
            "/api/convert/from/docx/to/html/standalone/true",
            "report.docx",
            "DOCX",
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(header_text(&response, &header::CONTENT_TYPE).starts_with("text/html"));
    assert_eq!(
        header_text(&response, &header::CONTENT_DISPOSITION),
        "attachment; filename=\"report.docx.html\""
    );
    assert_eq!(body_text(response).await, "converted:DOCX");

    let conversions = harness.runner.conversions();
    let args = conversions.first().expect("one conversion");
    assert_eq!(
        args.get(..3).expect("option arguments"),
        ["--from=docx", "--to=html", "--standalone"]
    );
    assert!(args.get(3).is_some_and(|arg| arg.starts_with("--output=") && arg.ends_with(".html")));
    assert!(args.get(4).is_some_and(|arg| arg.ends_with(".docx")));
    assert_eq!(harness.leftover_files(), 0);
}

#[rstest]
#[tokio::test]
async fn multipart_upload_is_converted() {
    let harness = Harness::new(FakePandoc::default(), RunMode::Development).await;
    let body = concat!(
        "--BOUNDARY\r\n",
        "Content-Disposition: form-data; name=\"file\"; filename=\"notes.md\"\r\n",
        "Content-Type: text/markdown\r\n\r\n",
        "# Notes\r\n",
        "--BOUNDARY--\r\n",
    );
    let request = Request::builder()
        .method("POST")
        .uri("/api/convert/from/markdown/to/gfm")
        .header(header::CONTENT_TYPE, "multipart/form-data; boundary=BOUNDARY")
        .body(Body::from(body))
        .expect("request");

    let response = harness.send(request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header_text(&response, &header::CONTENT_DISPOSITION),
        "attachment; filename=\"notes.md.md\""
    );
    assert_eq!(body_text(response).await, "converted:# Notes");
    assert_eq!(harness.leftover_files(), 0);
}

#[rstest]
#[tokio::test]
async fn percent_encoded_segments_are_decoded() {
    let harness = Harness::new(FakePandoc::default(), RunMode::Development).await;
    let response = harness
        .send(raw_upload(
            "/api/convert/to/html/M/title%3AQuarterly%20Report",
            "q.docx",
            "x",
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let conversions = harness.runner.conversions();
    let args = conversions.first().expect("one conversion");
    assert!(args.contains(&"--metadata=title:Quarterly Report".to_owned()));
}

#[rstest]
#[tokio::test]
async fn non_ascii_names_get_extended_disposition() {
    let harness = Harness::new(FakePandoc::default(), RunMode::Development).await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/convert/to/html")
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(
            header::CONTENT_DISPOSITION,
            "attachment; filename*=UTF-8''%E6%8A%A5%E5%91%8A.docx",
        )
        .body(Body::from("x"))
        .expect("request");
    let response = harness.send(request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header_text(&response, &header::CONTENT_DISPOSITION),
        "attachment; filename=\"__.docx.html\"; filename*=UTF-8''%E6%8A%A5%E5%91%8A.docx.html"
    );
}

#[rstest]
#[case("/api/convert/from/docx/to/html5", "invalid option of enum type: to=html5")]
#[case("/api/convert/bogus/1", "invalid option 'bogus'")]
#[case("/api/convert/to", "invalid option of enum type: to=")]
#[tokio::test]
async fn invalid_options_are_rejected_before_storing(#[case] uri: &str, #[case] message: &str) {
    let harness = Harness::new(FakePandoc::default(), RunMode::Development).await;
    let response = harness.send(raw_upload(uri, "a.docx", "x")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["status"], 400);
    assert_eq!(json["code"], "invalid_option");
    assert_eq!(json["message"], message);
    assert!(harness.runner.conversions().is_empty());
    assert_eq!(harness.leftover_files(), 0);
}

#[rstest]
#[tokio::test]
async fn raw_upload_without_disposition_is_rejected() {
    let harness = Harness::new(FakePandoc::default(), RunMode::Development).await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/convert/to/html")
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .body(Body::from("x"))
        .expect("request");
    let response = harness.send(request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "invalid_header");
}

#[rstest]
#[case(RunMode::Development, serde_json::json!("conversion failed: Unknown reader: docz"))]
#[case(RunMode::Production, serde_json::Value::Null)]
#[tokio::test]
async fn converter_diagnostics_become_internal_errors(
    #[case] mode: RunMode,
    #[case] message: serde_json::Value,
) {
    let harness = Harness::new(FakePandoc::failing("Unknown reader: docz"), mode).await;
    let response = harness
        .send(raw_upload("/api/convert/to/html", "a.docx", "x"))
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["status"], 500);
    assert_eq!(json["code"], "internal_server_error");
    assert_eq!(json["message"], message);
    assert_eq!(harness.leftover_files(), 0);
}

#[rstest]
#[tokio::test]
async fn output_written_alongside_diagnostics_is_removed() {
    let harness = Harness::new(
        FakePandoc::warning("[WARNING] Could not fetch resource"),
        RunMode::Development,
    )
    .await;
    let response = harness
        .send(raw_upload("/api/convert/from/docx/to/html", "a.docx", "x"))
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await["message"],
        "conversion failed: [WARNING] Could not fetch resource"
    );
    assert_eq!(harness.runner.conversions().len(), 1);
    assert_eq!(harness.leftover_files(), 0);
}

#[rstest]
#[tokio::test]
async fn abandoned_requests_still_clean_up() {
    let harness = Harness::new(
        FakePandoc::slow(Duration::from_millis(300)),
        RunMode::Development,
    )
    .await;
    let abandoned = tokio::time::timeout(
        Duration::from_millis(50),
        harness.send(raw_upload("/api/convert/from/docx/to/html", "a.docx", "x")),
    )
    .await;
    assert!(abandoned.is_err(), "request should still be converting");

    assert_eq!(harness.wait_for_cleanup(Duration::from_secs(5)).await, 0);
    assert_eq!(harness.runner.conversions().len(), 1);
}

#[rstest]
#[tokio::test]
async fn oversized_uploads_are_refused() {
    let harness = Harness::new(FakePandoc::default(), RunMode::Development).await;
    let response = harness
        .send(raw_upload(
            "/api/convert/to/html",
            "big.docx",
            vec![b'x'; UPLOAD_LIMIT * 2],
        ))
        .await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body_json(response).await["code"], "payload_too_large");
    assert!(harness.runner.conversions().is_empty());
}

#[rstest]
#[case("/nowhere")]
#[case("/api/helpme")]
#[tokio::test]
async fn unknown_routes_are_json_404s(#[case] uri: &str) {
    let harness = Harness::new(FakePandoc::default(), RunMode::Development).await;
    let response = harness
        .send(Request::get(uri).body(Body::empty()).expect("request"))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        header_text(&response, &header::HeaderName::from_static("x-powered-by")),
        POWERED_BY
    );
    let json = body_json(response).await;
    assert_eq!(json["code"], "route_not_found");
    assert_eq!(json["message"], "the requested path does not exist");
}
