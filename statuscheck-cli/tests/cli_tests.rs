//! Integration tests for the check pipeline and its report.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

use statuscheck_cli::{CheckState, Cli, check_document, run};
use statuscheck_html::components::ComponentSelectors;

/// Helper to run a check and capture what it prints
fn run_check(cli: &Cli) -> (CheckState, String) {
    let mut out = Vec::new();
    let state = run(cli, &mut out).expect("writing to a Vec cannot fail");
    (state, String::from_utf8(out).expect("report is UTF-8"))
}

/// Serve a single HTTP response on a loopback port and return its URL
fn serve_once(status_line: &'static str, body: String) -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let url = format!("http://{}/", listener.local_addr().expect("local addr"));
    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept");
        let mut reader = BufReader::new(stream);
        // Drain the request head
        let mut line = String::new();
        while reader.read_line(&mut line).expect("read request") > 2 {
            line.clear();
        }
        let mut stream = reader.into_inner();
        write!(
            stream,
            "HTTP/1.1 {status_line}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
        .expect("write response");
    });
    (url, handle)
}

/// Helper to build one component block
fn component(name: &str, status: &str) -> String {
    format!(
        r#"<div class="component-container"><div class="component-name">{name}</div><div class="component-status">{status}</div></div>"#
    )
}

#[test]
fn test_missing_url_is_warning() {
    let cli = Cli {
        url: None,
        ..Cli::with_url("unused")
    };
    let (state, text) = run_check(&cli);
    assert_eq!(state, CheckState::Warning);
    assert_eq!(state.exit_code(), 1);
    assert_eq!(
        text,
        "WARNING: --url or STATUS_PAGE_URL environment variable is required\n"
    );
}

#[test]
fn test_unreachable_page_is_critical() {
    let (state, text) = run_check(&Cli::with_url("not a url"));
    assert_eq!(state, CheckState::Critical);
    assert!(text.starts_with("CRITICAL: error fetching status page: "));
}

#[test]
fn test_all_operational_page_is_ok() {
    let (url, server) = serve_once("200 OK", component("bunny.net", "Operational"));
    let (state, text) = run_check(&Cli::with_url(&url));
    server.join().expect("server thread");
    assert_eq!(state, CheckState::Ok);
    assert_eq!(text, "All components operational.\n");
}

#[test]
fn test_issues_are_critical_and_listed() {
    let body = format!(
        "<!DOCTYPE html><html><body>{}{}</body></html>",
        component("Voice Service", "MAJOR"),
        component("ServiceNow", "MINOR")
    );
    let (url, server) = serve_once("200 OK", body);
    let (state, text) = run_check(&Cli::with_url(&url));
    server.join().expect("server thread");
    assert_eq!(state, CheckState::Critical);
    assert_eq!(state.exit_code(), 2);
    assert_eq!(
        text,
        "Non-operational components:\n - Voice Service: MAJOR\n - ServiceNow: MINOR\n"
    );
}

#[test]
fn test_error_status_body_is_still_parsed() {
    let (url, server) = serve_once("503 Service Unavailable", component("API", "Major Outage"));
    let (state, text) = run_check(&Cli::with_url(&url));
    server.join().expect("server thread");
    assert_eq!(state, CheckState::Critical);
    assert!(text.contains(" - API: Major Outage"));
}

#[test]
fn test_truncated_page_is_critical_without_issues() {
    let body = format!("{}<div class=\"component-st", component("Voice Service", "MAJOR"));
    let (url, server) = serve_once("200 OK", body);
    let (state, text) = run_check(&Cli::with_url(&url));
    server.join().expect("server thread");
    assert_eq!(state, CheckState::Critical);
    assert!(text.starts_with("CRITICAL: error parsing HTML: "));
    assert!(!text.contains("Voice Service"));
}

#[test]
fn test_check_document_with_custom_container() {
    let html = r#"<ul><li class="component-name">DNS</li><li class="component-status">MINOR</li></ul>"#;
    let issues = check_document(html.as_bytes(), ComponentSelectors::with_container("li")).unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].to_string(), "DNS: MINOR");
}
