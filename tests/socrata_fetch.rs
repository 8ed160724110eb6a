use covid_testing_report::config::Config;
use covid_testing_report::error::PipelineError;
use covid_testing_report::source::{Outcome, SocrataSource, Source};
use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

const BODY: &str = r#"[{"state_name":"Ohio","overall_outcome":"Positive","date":"2021-03-01T00:00:00.000","new_results_reported":"5","total_results_reported":"50"}]"#;

/// Serve one HTTP request, answering with `BODY` after `delay`.
fn slow_server(delay: Duration) -> (String, thread::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut buf = [0u8; 4096];
        let mut request = Vec::new();
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                return;
            }
            request.extend_from_slice(&buf[..n]);
        }
        thread::sleep(delay);
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            BODY.len(),
            BODY
        );
        // The client may already have hung up.
        let _ = stream.write_all(response.as_bytes());
    });
    (format!("http://{addr}"), handle)
}

fn config(base_url: String, timeout_seconds: u64) -> Config {
    let mut cfg = Config::default();
    cfg.source.base_url = base_url;
    cfg.source.timeout_seconds = timeout_seconds;
    cfg.source.app_token_env = String::new();
    cfg
}

#[test]
fn fetches_rows_over_http() {
    let (url, server) = slow_server(Duration::ZERO);
    let rows = SocrataSource::new(&config(url, 10)).unwrap().fetch().unwrap();
    server.join().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].outcome, Outcome::Positive);
    assert_eq!(rows[0].total_results_reported, 50);
}

#[test]
fn configured_timeout_is_source_unavailable() {
    let (url, server) = slow_server(Duration::from_secs(3));
    let err = SocrataSource::new(&config(url, 1)).unwrap().fetch().unwrap_err();
    assert!(matches!(err, PipelineError::SourceUnavailable(_)), "unexpected error: {err:?}");
    server.join().unwrap();
}

#[test]
fn zero_timeout_outlasts_client_default() {
    // reqwest's blocking client would give up after 30s without an explicit `None`.
    let (url, server) = slow_server(Duration::from_secs(32));
    let rows = SocrataSource::new(&config(url, 0)).unwrap().fetch().unwrap();
    server.join().unwrap();
    assert_eq!(rows.len(), 1);
}
