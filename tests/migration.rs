//! End-to-end migration runs against real directories.
//!
//! Each test builds an input/processed/error tree in a temp directory and
//! runs the orchestrator with the live filesystem adapter. The work-order
//! API is either a stub HTTP server (exercising the live client) or an
//! in-process fake.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use serde_json::Value;

use workorder_migrate::adapters::live::{LiveClock, LiveFileSystem, LiveWorkOrderApi};
use workorder_migrate::context::ServiceContext;
use workorder_migrate::error::SubmitError;
use workorder_migrate::migration::{self, FailureReason, Verdict};
use workorder_migrate::ports::{SubmitFuture, WorkOrderApi};
use workorder_migrate::store::DirLayout;
use workorder_migrate::workorder::WorkOrder;

const HEADER: &str = "order_ref,client_org_name,client_contact_name,client_phone_num,site_full_address,site_notes,job_date,job_time,task_identifier,task_description,task_hours_estimate\n";

fn e2e_csv() -> String {
    format!(
        "{HEADER}\
         E2E-001,Acme Corp,Jane Doe,555-0100,1 Main St,Use side gate,2024-09-01,08:30,INSPECT,Inspect boiler,1.5\n\
         E2E-001,Acme Corp,Jane Doe,555-0100,1 Main St,Use side gate,2024-09-01,08:30,REPAIR,Replace valve,2\n\
         E2E-002,Beta LLC,Bo Smith,555-0200,2 Side St,,2024-09-02,14:00,PAINT,Paint fence,4\n"
    )
}

fn setup(content: &[u8]) -> (tempfile::TempDir, DirLayout) {
    let root = tempfile::tempdir().unwrap();
    let layout = DirLayout::under(root.path());
    std::fs::create_dir_all(&layout.input).unwrap();
    std::fs::write(layout.input.join("work_orders_e2e.csv"), content).unwrap();
    (root, layout)
}

fn context(api: impl WorkOrderApi + 'static) -> ServiceContext {
    ServiceContext::new(Box::new(LiveFileSystem), Box::new(LiveClock), Box::new(api))
}

fn exists(dir: &Path, name: &str) -> bool {
    dir.join(name).is_file()
}

/// Minimal work-order API: stores accepted bodies, rejects configured references.
struct StubApiServer {
    base_url: String,
    handle: JoinHandle<Vec<Value>>,
}

impl StubApiServer {
    fn start(expected_requests: usize, reject: &'static [&'static str]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let handle = std::thread::spawn(move || {
            let mut stored = Vec::new();
            for _ in 0..expected_requests {
                let (mut stream, _) = listener.accept().unwrap();
                let (head, body) = read_request(&mut stream);
                let doc: Value = serde_json::from_slice(&body).unwrap();
                let authorized = head.contains("x-api-key: test-key");
                let reference = doc["customerReference"].as_str().unwrap_or_default().to_string();

                let (status, reply) = if !authorized {
                    ("401 Unauthorized", r#"{"message":"invalid api key"}"#.to_string())
                } else if reject.contains(&reference.as_str()) {
                    ("400 Bad Request", r#"{"message":"rejected"}"#.to_string())
                } else {
                    stored.push(doc);
                    ("201 Created", format!(r#"{{"id":"{reference}"}}"#))
                };
                let response = format!(
                    "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{reply}",
                    reply.len()
                );
                stream.write_all(response.as_bytes()).unwrap();
            }
            stored
        });
        Self { base_url, handle }
    }

    fn api(&self) -> LiveWorkOrderApi {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        LiveWorkOrderApi::with_client(client, &self.base_url, "test-key")
    }

    fn stored(self) -> Vec<Value> {
        self.handle.join().unwrap()
    }
}

/// Returns the lowercased request head and the raw body.
fn read_request(stream: &mut TcpStream) -> (String, Vec<u8>) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = stream.read(&mut chunk).unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let len = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + len {
                return (head, buf[end + 4..end + 4 + len].to_vec());
            }
        }
    }
    (String::from_utf8_lossy(&buf).to_lowercase(), Vec::new())
}

/// In-process API double for scenarios that need no HTTP.
#[derive(Clone, Default)]
struct RecordingApi {
    calls: Arc<Mutex<Vec<String>>>,
}

impl WorkOrderApi for RecordingApi {
    fn submit<'a>(&'a self, order: &'a WorkOrder) -> SubmitFuture<'a> {
        Box::pin(async move {
            self.calls.lock().unwrap().push(order.customer_reference.clone());
            Ok::<(), SubmitError>(())
        })
    }
}

#[tokio::test]
async fn all_groups_accepted_moves_file_to_processed() {
    let (_root, layout) = setup(e2e_csv().as_bytes());
    let server = StubApiServer::start(2, &[]);
    let ctx = context(server.api());

    let report = migration::run(&ctx, &layout).await.unwrap();

    assert_eq!((report.found(), report.succeeded(), report.failed()), (1, 1, 0));
    assert!(exists(&layout.processed, "work_orders_e2e.csv"));
    assert!(!exists(&layout.input, "work_orders_e2e.csv"));

    let stored = server.stored();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0]["customerReference"], "E2E-001");
    assert_eq!(stored[0]["client"]["name"], "Acme Corp");
    assert_eq!(stored[0]["location"]["instructions"], "Use side gate");
    assert_eq!(stored[0]["jobDetails"]["scheduledFor"], "2024-09-01T08:30:00Z");
    let codes: Vec<&str> = stored[0]["jobDetails"]["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["taskCode"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["INSPECT", "REPAIR"]);
    assert_eq!(stored[1]["customerReference"], "E2E-002");
    assert_eq!(stored[1]["location"]["instructions"], "");
    assert_eq!(stored[1]["jobDetails"]["tasks"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn one_rejected_group_moves_file_to_error() {
    let (_root, layout) = setup(e2e_csv().as_bytes());
    let server = StubApiServer::start(2, &["E2E-002"]);
    let ctx = context(server.api());

    let report = migration::run(&ctx, &layout).await.unwrap();

    let outcome = report.outcome("work_orders_e2e.csv").unwrap();
    assert_eq!(outcome.verdict, Verdict::Failure(FailureReason::SubmissionsFailed));
    assert_eq!((outcome.submitted, outcome.rejected), (1, 1));
    assert!(exists(&layout.error, "work_orders_e2e.csv"));
    assert!(!exists(&layout.processed, "work_orders_e2e.csv"));

    let stored = server.stored();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["customerReference"], "E2E-001");
}

#[tokio::test]
async fn header_only_file_goes_to_error_without_calls() {
    let (_root, layout) = setup(HEADER.as_bytes());
    let api = RecordingApi::default();
    let ctx = context(api.clone());

    let report = migration::run(&ctx, &layout).await.unwrap();

    assert_eq!(
        report.outcome("work_orders_e2e.csv").unwrap().verdict,
        Verdict::Failure(FailureReason::NoValidWorkOrders)
    );
    assert!(exists(&layout.error, "work_orders_e2e.csv"));
    assert!(api.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn bad_time_group_is_dropped_and_rest_submitted() {
    let csv = format!(
        "{HEADER}\
         OK-1,Acme,Jane,555,1 Main St,,2024-09-01,08:30,T1,Inspect,1\n\
         OK-1,Acme,Jane,555,1 Main St,,2024-09-01,08:30,T2,Repair,2\n\
         BAD-1,Beta,Bo,556,2 Side St,,2024-09-01,99:99,T1,Paint,1\n"
    );
    let (_root, layout) = setup(csv.as_bytes());
    let api = RecordingApi::default();
    let ctx = context(api.clone());

    let report = migration::run(&ctx, &layout).await.unwrap();

    assert!(report.outcome("work_orders_e2e.csv").unwrap().verdict.is_success());
    assert_eq!(*api.calls.lock().unwrap(), vec!["OK-1".to_string()]);
    assert!(exists(&layout.processed, "work_orders_e2e.csv"));
}

#[tokio::test]
async fn unreadable_file_goes_to_error() {
    let (_root, layout) = setup(&[0xff, 0xfe, 0x00, 0x41]);
    let ctx = context(RecordingApi::default());

    let report = migration::run(&ctx, &layout).await.unwrap();

    assert_eq!(
        report.outcome("work_orders_e2e.csv").unwrap().verdict,
        Verdict::Failure(FailureReason::Unreadable)
    );
    assert!(exists(&layout.error, "work_orders_e2e.csv"));
}

#[tokio::test]
async fn rerun_with_same_name_does_not_overwrite_previous_file() {
    let (_root, layout) = setup(HEADER.as_bytes());
    let ctx = context(RecordingApi::default());
    migration::run(&ctx, &layout).await.unwrap();

    std::fs::write(layout.input.join("work_orders_e2e.csv"), HEADER).unwrap();
    let report = migration::run(&ctx, &layout).await.unwrap();

    let moved = report.outcome("work_orders_e2e.csv").unwrap().destination.clone().unwrap();
    assert_ne!(moved, layout.error.join("work_orders_e2e.csv"));
    assert_eq!(std::fs::read_dir(&layout.error).unwrap().count(), 2);
}
