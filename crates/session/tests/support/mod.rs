#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use envelope::Credentials;
use session::{Session, SessionConfig};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

#[derive(Clone)]
pub struct ScriptedResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

pub fn respond(status: u16, body: &str) -> ScriptedResponse {
    ScriptedResponse {
        status,
        body: body.as_bytes().to_vec(),
    }
}

/// One HTTP request as the server saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub head: String,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn request_line(&self) -> &str {
        self.head.lines().next().unwrap_or_default()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(name)
                .then(|| value.trim())
        })
    }
}

/// Loopback HTTP/1.1 server answering requests from a fixed script, in order.
/// Requests past the end of the script get the last entry again.
pub struct ScriptedServer {
    pub base_url: String,
    pub port: u16,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: JoinHandle<()>,
}

impl ScriptedServer {
    pub async fn new(scripts: Vec<ScriptedResponse>) -> Self {
        assert!(!scripts.is_empty(), "script needs at least one response");
        let scripts = Arc::new(scripts);
        let requests = Arc::new(Mutex::new(Vec::new()));
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("local TCP listener should bind");
        let addr = listener
            .local_addr()
            .expect("resolved local listener address");
        let base_url = format!("http://{addr}");

        let handle = tokio::spawn({
            let scripts = Arc::clone(&scripts);
            let requests = Arc::clone(&requests);

            async move {
                loop {
                    let (socket, _) = match listener.accept().await {
                        Ok(pair) => pair,
                        Err(_) => break,
                    };
                    let scripts = Arc::clone(&scripts);
                    let requests = Arc::clone(&requests);
                    tokio::spawn(async move {
                        serve_one(socket, scripts, requests).await;
                    });
                }
            }
        });

        Self {
            base_url,
            port: addr.port(),
            requests,
            handle,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("request log lock").clone()
    }

    pub fn session(&self) -> Session {
        Session::with_config(
            &sample_credentials(),
            &SessionConfig::default().with_base_url(&self.base_url),
        )
        .expect("session against loopback server")
    }

    /// Config addressing this server as `localhost` with the platform root
    /// set to match, so root-scoped credential cookies apply to its requests.
    pub fn localhost_config(&self) -> SessionConfig {
        SessionConfig::default()
            .with_base_url(format!("http://localhost:{}", self.port))
            .with_platform_root("localhost")
    }

    pub fn shutdown(&self) {
        self.handle.abort();
    }
}

impl Drop for ScriptedServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub fn sample_credentials() -> Credentials {
    Credentials::new(
        "gat-value",
        "isid-value",
        "sid-value",
        "acw-value",
        "iget-value",
        "token-value",
        "device-value",
    )
}

/// Binds and immediately releases a loopback port, leaving an address that
/// refuses connections.
pub async fn refused_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("local TCP listener should bind");
    let addr = listener
        .local_addr()
        .expect("resolved local listener address");
    drop(listener);
    format!("http://{addr}")
}

async fn serve_one(
    mut socket: TcpStream,
    scripts: Arc<Vec<ScriptedResponse>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
) {
    let Some(request) = read_request(&mut socket).await else {
        return;
    };
    let index = {
        let mut log = requests.lock().expect("request log lock");
        log.push(request);
        log.len() - 1
    };
    let script = &scripts[index.min(scripts.len() - 1)];

    let head = format!(
        "HTTP/1.1 {} Scripted\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        script.status,
        script.body.len()
    );
    if socket.write_all(head.as_bytes()).await.is_err() {
        return;
    }
    let _ = socket.write_all(&script.body).await;
    let _ = socket.shutdown().await;
}

async fn read_request(socket: &mut TcpStream) -> Option<RecordedRequest> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];

    let head_end = loop {
        if let Some(position) = find_head_end(&buffer) {
            break position;
        }
        let read = socket.read(&mut chunk).await.ok()?;
        if read == 0 {
            return None;
        }
        buffer.extend_from_slice(&chunk[..read]);
    };

    let head = String::from_utf8_lossy(&buffer[..head_end]).into_owned();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    let body_start = head_end + 4;
    while buffer.len() < body_start + content_length {
        let read = socket.read(&mut chunk).await.ok()?;
        if read == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..read]);
    }
    let body_end = buffer.len().min(body_start + content_length);

    Some(RecordedRequest {
        head,
        body: buffer[body_start..body_end].to_vec(),
    })
}

fn find_head_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(4).position(|window| window == b"\r\n\r\n")
}
