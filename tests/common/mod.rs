// tests/common/mod.rs
//! Shared fixtures: a scripted daemon and a throwaway HTTP server
#![allow(dead_code)]

use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use straya_terminal::config::{Config, ExplorerConfig, MarketConfig};
use straya_terminal::{
    DaemonRpc, MinerCommand, Report, ReportKind, ReportMode, ReportSink, SessionManager,
    StatsProvider, TerminalError,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::Notify;

/// Canned answer for one daemon command
#[derive(Clone)]
pub enum Reply {
    Ok(String),
    Fail(String),
    Hang,
}

/// Daemon double that answers from a table and records every call
pub struct ScriptedDaemon {
    replies: HashMap<String, Reply>,
    fail_generate_on: Option<usize>,
    missing: bool,
    panic_on_generate: bool,
    generate_delay: Duration,
    pub generate_calls: AtomicUsize,
    pub calls: Mutex<Vec<Vec<String>>>,
    pub generating: Notify,
}

impl ScriptedDaemon {
    /// difficulty 0.5, hashrate 1 MH/s, 3 connected peers
    pub fn healthy() -> Self {
        let mut replies = HashMap::new();
        replies.insert("getdifficulty".into(), Reply::Ok("0.5\n".into()));
        replies.insert("getnetworkhashps".into(), Reply::Ok("1000000\n".into()));
        replies.insert(
            "getpeerinfo".into(),
            Reply::Ok(r#"[{"id":1},{"id":2},{"id":3}]"#.into()),
        );
        replies.insert("getbalance".into(), Reply::Ok("12.50000000\n".into()));
        replies.insert("sendtoaddress".into(), Reply::Ok("deadbeef\n".into()));
        ScriptedDaemon {
            replies,
            fail_generate_on: None,
            missing: false,
            panic_on_generate: false,
            generate_delay: Duration::ZERO,
            generate_calls: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
            generating: Notify::new(),
        }
    }

    pub fn reply(mut self, command: &str, reply: Reply) -> Self {
        self.replies.insert(command.into(), reply);
        self
    }

    /// Makes the n-th (1-based) `generate` call exit non-zero
    pub fn fail_generate_on(mut self, call: usize) -> Self {
        self.fail_generate_on = Some(call);
        self
    }

    pub fn missing(mut self) -> Self {
        self.missing = true;
        self
    }

    /// Makes every `generate` call panic inside the session worker
    pub fn panic_on_generate(mut self) -> Self {
        self.panic_on_generate = true;
        self
    }

    pub fn generate_delay(mut self, delay: Duration) -> Self {
        self.generate_delay = delay;
        self
    }

    pub fn generate_args(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c[0] == "generate")
            .map(|c| c[1].clone())
            .collect()
    }

    async fn answer(&self, args: Vec<String>) -> Result<String, TerminalError> {
        self.calls.lock().unwrap().push(args.clone());
        if self.missing {
            return Err(TerminalError::ToolNotFound("Strayacoin-cli".into()));
        }

        if args[0] == "generate" {
            let n = self.generate_calls.fetch_add(1, Ordering::SeqCst) + 1;
            self.generating.notify_one();
            if self.panic_on_generate {
                panic!("scripted daemon crashed in generate");
            }
            tokio::time::sleep(self.generate_delay).await;
            if self.fail_generate_on == Some(n) {
                return Err(TerminalError::ToolInvocation {
                    code: Some(1),
                    stderr: "boom".into(),
                });
            }
            return Ok(format!("[\"{:064x}\"]\n", n));
        }

        match self.replies.get(&args[0]) {
            Some(Reply::Ok(out)) => Ok(out.clone()),
            Some(Reply::Fail(stderr)) => Err(TerminalError::ToolInvocation {
                code: Some(1),
                stderr: stderr.clone(),
            }),
            Some(Reply::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(String::new())
            }
            None => Err(TerminalError::ToolInvocation {
                code: Some(1),
                stderr: format!("Method not found: {}", args[0]),
            }),
        }
    }
}

impl DaemonRpc for ScriptedDaemon {
    fn call<'a>(&'a self, args: &'a [&'a str]) -> BoxFuture<'a, Result<String, TerminalError>> {
        let args = args.iter().map(|a| a.to_string()).collect();
        Box::pin(self.answer(args))
    }
}

/// Route served by [`http_stub`]; status 0 means "accept and never answer"
pub type Route = (&'static str, u16, &'static str);

pub const PEERS_PATH: &str = "/api/getconnectioncount";
pub const SUPPLY_PATH: &str = "/ext/getmoneysupply";
pub const TICKER_PATH: &str = "/api/v1/ticker/NAH-BTC";

/// Explorer and ticker answering normally
pub fn healthy_routes() -> Vec<Route> {
    vec![
        (PEERS_PATH, 200, "12"),
        (SUPPLY_PATH, 200, "1234567.89"),
        (
            TICKER_PATH,
            200,
            r#"{"success":true,"price":"0.00000003","bid":"0.00000002","ask":"0.00000004"}"#,
        ),
    ]
}

/// Replaces the route for `path`
pub fn with_route(mut routes: Vec<Route>, route: Route) -> Vec<Route> {
    routes.retain(|r| r.0 != route.0);
    routes.push(route);
    routes
}

/// Starts a minimal HTTP/1.1 server and returns its base URL
pub async fn http_stub(routes: Vec<Route>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let routes = Arc::new(routes);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let routes = routes.clone();
            tokio::spawn(async move {
                let mut buf = vec![0u8; 8192];
                let mut read = 0;
                while read < buf.len() {
                    let n = socket.read(&mut buf[read..]).await.unwrap_or(0);
                    if n == 0 {
                        break;
                    }
                    read += n;
                    if buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }

                let request = String::from_utf8_lossy(&buf[..read]).to_string();
                let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                let (status, body) = routes
                    .iter()
                    .find(|r| r.0 == path)
                    .map(|r| (r.1, r.2))
                    .unwrap_or((404, "not found"));

                if status == 0 {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    return;
                }

                let reason = match status {
                    200 => "OK",
                    404 => "Not Found",
                    500 => "Internal Server Error",
                    _ => "Other",
                };
                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    reason,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{}", addr)
}

/// Configuration pointing every remote source at `base`, 1 s timeouts
pub fn test_config(base: &str, report: ReportMode) -> Config {
    Config {
        cli_path: "Strayacoin-cli".into(),
        http_timeout_secs: 1,
        daemon_timeout_secs: 1,
        use_system_proxy: false,
        report,
        explorer: ExplorerConfig {
            connection_count_url: format!("{}{}", base, PEERS_PATH),
            money_supply_url: format!("{}{}", base, SUPPLY_PATH),
        },
        market: MarketConfig {
            ticker_url: format!("{}/api/v1/ticker", base),
            pair: "NAH-BTC".into(),
            quote_unit: "BTC".into(),
            exchange: "TradeOgre".into(),
        },
    }
}

pub async fn provider(daemon: Arc<ScriptedDaemon>, routes: Vec<Route>) -> StatsProvider {
    let base = http_stub(routes).await;
    StatsProvider::new(&test_config(&base, ReportMode::Full), daemon).unwrap()
}

/// Session manager wired to a scripted daemon and a stub server
pub struct Harness {
    pub manager: SessionManager,
    pub daemon: Arc<ScriptedDaemon>,
    pub reports: crossbeam_channel::Receiver<Report>,
    pub sink: ReportSink,
}

pub async fn harness(daemon: ScriptedDaemon, routes: Vec<Route>, mode: ReportMode) -> Harness {
    let daemon = Arc::new(daemon);
    let base = http_stub(routes).await;
    let config = test_config(&base, mode);
    let provider = StatsProvider::new(&config, daemon.clone()).unwrap();
    let (sink, reports) = ReportSink::channel();
    let manager = SessionManager::new(
        MinerCommand::new(daemon.clone()),
        provider,
        mode,
        sink.clone(),
    );
    Harness {
        manager,
        daemon,
        reports,
        sink,
    }
}

impl Harness {
    /// Everything reported so far
    pub fn drain(&self) -> Vec<Report> {
        self.reports.try_iter().collect()
    }
}

pub fn block_reports(reports: &[Report]) -> Vec<&Report> {
    reports
        .iter()
        .filter(|r| r.kind == ReportKind::Output && r.text.starts_with("Mined Block"))
        .collect()
}
