//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rc_proxy::config::ProxyConfig;
use rc_proxy::http::HttpServer;
use rc_proxy::lifecycle::Shutdown;
use rc_proxy::upstream::DEFAULT_UPSTREAM_TEMPLATE;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

/// Query string the default template produces for `keyword=art`, `portal=`.
#[allow(dead_code)]
pub const ART_QUERY: &str = "fulltext=&title=&autocomplete=&keyword=art&portal=&statusprogress=0&statusprogress=1&statuspublished=0&statuspublished=1&includelimited=0&includelimited=1&includeprivate=0&includeprivate=1&type_research=research&resulttype=research&modifiedafter=&modifiedbefore=&format=json&limit=250&page=0";

/// A raw-TCP upstream that records each request target (path + query).
pub struct MockUpstream {
    pub addr: SocketAddr,
    targets: Arc<Mutex<Vec<String>>>,
}

impl MockUpstream {
    #[allow(dead_code)]
    pub fn targets(&self) -> Vec<String> {
        self.targets.lock().unwrap().clone()
    }

    /// The default template pointed at this mock instead of the real host.
    pub fn template(&self) -> String {
        template_for(&format!("http://{}", self.addr))
    }
}

pub fn template_for(base: &str) -> String {
    DEFAULT_UPSTREAM_TEMPLATE.replace("https://www.researchcatalogue.net", base)
}

/// Full HTTP/1.1 response with a correct Content-Length.
pub fn http_response(status_line: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_line,
        body.len(),
        body
    )
}

/// Start a programmable upstream. `reply` maps the request target to the
/// raw bytes written back; `delay` is waited before replying.
pub async fn start_mock_upstream<F>(delay: Duration, reply: F) -> MockUpstream
where
    F: Fn(&str) -> String + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let targets = Arc::new(Mutex::new(Vec::new()));
    let reply = Arc::new(reply);

    let recorded = targets.clone();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let reply = reply.clone();
            let recorded = recorded.clone();
            tokio::spawn(async move {
                let Some(target) = read_request_target(&mut socket).await else {
                    return;
                };
                recorded.lock().unwrap().push(target.clone());

                tokio::time::sleep(delay).await;
                let _ = socket.write_all(reply(&target).as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    MockUpstream { addr, targets }
}

/// Start an upstream that answers one request with an endless chunked body,
/// one chunk every 20ms. The receiver yields `true` once a write fails,
/// i.e. the proxy released the connection, or `false` after ~10s.
#[allow(dead_code)]
pub async fn start_streaming_upstream() -> (MockUpstream, oneshot::Receiver<bool>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let targets = Arc::new(Mutex::new(Vec::new()));
    let (closed_tx, closed_rx) = oneshot::channel();

    let recorded = targets.clone();
    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };
        let Some(target) = read_request_target(&mut socket).await else {
            return;
        };
        recorded.lock().unwrap().push(target);

        let head = "HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n5\r\nfirst\r\n";
        if socket.write_all(head.as_bytes()).await.is_err() {
            let _ = closed_tx.send(true);
            return;
        }

        for _ in 0..500 {
            tokio::time::sleep(Duration::from_millis(20)).await;
            let chunk = socket.write_all(b"4\r\nmore\r\n").await;
            let flushed = socket.flush().await;
            if chunk.is_err() || flushed.is_err() {
                let _ = closed_tx.send(true);
                return;
            }
        }
        let _ = closed_tx.send(false);
    });

    (MockUpstream { addr, targets }, closed_rx)
}

/// Read an HTTP request head and return its target (path + query).
async fn read_request_target(socket: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return None,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }

    let head = String::from_utf8_lossy(&buf);
    head.lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .map(str::to_string)
}

/// Start the proxy on an ephemeral port against `template`.
pub async fn start_proxy(template: String) -> (SocketAddr, Shutdown) {
    let mut config = ProxyConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstream.template = template;
    config.upstream.system_proxy = false;

    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
