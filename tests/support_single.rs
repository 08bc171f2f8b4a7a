use std::ffi::OsStr;
use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::process::{Command, Output};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

pub const RPC_OK: &str = r#"{"jsonrpc":"2.0","id":1,"result":"cool"}"#;
pub const RPC_ERROR: &str =
    r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32000,"message":"bundle reverted"}}"#;

/// Request counters observed by the mock endpoint.
#[derive(Debug, Default)]
pub struct ServerStats {
    pub requests: AtomicU64,
    pub high_priority: AtomicU64,
    pub call_bundle: AtomicU64,
}

pub struct ServerHandle {
    shutdown: mpsc::Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
    pub stats: Arc<ServerStats>,
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        let _send_result = self.shutdown.send(());
        if let Some(handle) = self.thread.take() {
            drop(handle.join());
        }
    }
}

/// Spawn a lightweight JSON-RPC server that answers every POST with `body`.
///
/// # Errors
///
/// Returns an error if the listener cannot be created or configured.
pub fn spawn_rpc_server(body: &'static str) -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind test server failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("server addr failed: {}", err))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("set_nonblocking failed: {}", err))?;

    let (shutdown_tx, shutdown_rx) = mpsc::channel();
    let stats = Arc::new(ServerStats::default());
    let server_stats = Arc::clone(&stats);

    let handle = thread::spawn(move || {
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }

            match listener.accept() {
                Ok((stream, _)) => {
                    let stats = Arc::clone(&server_stats);
                    thread::spawn(move || handle_client(stream, body, &stats));
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(5));
                }
                Err(_) => break,
            }
        }
    });

    Ok((
        format!("http://{}", addr),
        ServerHandle {
            shutdown: shutdown_tx,
            thread: Some(handle),
            stats,
        },
    ))
}

/// Like [`spawn_rpc_server`], but skips the test in sandboxes that forbid sockets.
///
/// # Errors
///
/// Returns an error for any bind failure other than a permission denial.
pub fn spawn_rpc_server_or_skip(
    body: &'static str,
) -> Result<Option<(String, ServerHandle)>, String> {
    match spawn_rpc_server(body) {
        Ok(result) => Ok(Some(result)),
        Err(err) if err.contains("Operation not permitted") => {
            eprintln!("Skipping e2e test: {}", err);
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// Serves keep-alive connections until the client closes them.
fn handle_client(mut stream: TcpStream, body: &str, stats: &ServerStats) {
    if stream.set_nonblocking(false).is_err() {
        return;
    }
    if stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .is_err()
    {
        return;
    }
    while let Some(request) = read_request(&mut stream) {
        stats.requests.fetch_add(1, Ordering::Relaxed);
        let lower = request.to_ascii_lowercase();
        if lower.contains("\r\nhigh_priority: true\r\n") {
            stats.high_priority.fetch_add(1, Ordering::Relaxed);
        }
        if request.contains(r#""method":"eth_callBundle""#) {
            stats.call_bundle.fetch_add(1, Ordering::Relaxed);
        }
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        );
        if stream.write_all(response.as_bytes()).is_err() || stream.flush().is_err() {
            break;
        }
    }
    drop(stream.shutdown(Shutdown::Both));
}

/// Reads one HTTP/1.1 request (head plus `Content-Length` body).
fn read_request(stream: &mut TcpStream) -> Option<String> {
    let mut raw = Vec::new();
    let mut buffer = [0u8; 4096];
    loop {
        let read = stream.read(&mut buffer).ok()?;
        if read == 0 {
            return None;
        }
        raw.extend_from_slice(buffer.get(..read)?);
        let text = String::from_utf8_lossy(&raw).into_owned();
        let Some(header_end) = text.find("\r\n\r\n") else {
            continue;
        };
        let content_length = text
            .get(..header_end)?
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                if !name.eq_ignore_ascii_case("content-length") {
                    return None;
                }
                value.trim().parse::<usize>().ok()
            })
            .unwrap_or(0);
        if raw.len() >= header_end.saturating_add(4).saturating_add(content_length) {
            return Some(text);
        }
    }
}

/// Run the `bundle-loadtest` binary and capture output.
///
/// # Errors
///
/// Returns an error if the binary cannot be executed.
pub fn run_bundle_loadtest<I, S>(args: I) -> Result<Output, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = bundle_loadtest_bin()?;
    Command::new(bin)
        .args(args)
        .env("BUNDLE_LOADTEST_LOG", "error")
        .env_remove("BUNDLE_LOADTEST_URL")
        .env_remove("BUNDLE_LOADTEST_FIXTURES")
        .output()
        .map_err(|err| format!("run bundle-loadtest failed: {}", err))
}

fn bundle_loadtest_bin() -> Result<String, String> {
    option_env!("CARGO_BIN_EXE_bundle-loadtest").map_or_else(
        || Err("CARGO_BIN_EXE_bundle-loadtest missing at compile time.".to_owned()),
        |path| Ok(path.to_owned()),
    )
}
