// src/main.rs
use clap::Parser;
use crossbeam_channel::Receiver;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use straya_terminal::shell::Flow;
use straya_terminal::{self, *};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Main entry point for the terminal
///
/// # Flow
/// 1. Parses command line arguments
/// 2. Delegates to the shell, one-shot mining or config generation
/// 3. Propagates any errors upward
fn main() -> Result<(), TerminalError> {
    let cli = cli::Commands::parse();
    init_logging(cli.verbose);

    match cli.action {
        Some(cli::Action::Config(ref opts)) => generate_config(opts),
        Some(cli::Action::Mine(ref opts)) => {
            let request = MiningRequest {
                block_count: opts.blocks,
                repeat: opts.repeat,
            };
            run_async(&cli, |shell| mine_once(shell, request))
        }
        Some(cli::Action::Shell) | None => run_async(&cli, run_shell),
    }
}

/// Loads configuration, wires the daemon, stats and session manager
/// together and runs `body` on a Tokio runtime while a separate thread
/// renders report lines
fn run_async<F, Fut>(cli: &cli::Commands, body: F) -> Result<(), TerminalError>
where
    F: FnOnce(Shell) -> Fut,
    Fut: std::future::Future<Output = Result<(), TerminalError>>,
{
    let mut config = config::load(&cli.config)?;
    // Apply CLI overrides
    if let Some(path) = &cli.cli_path {
        config.cli_path = path.clone();
    }
    if let Some(mode) = cli.report {
        config.report = mode;
    }
    config.validate()?;
    log::debug!("Using daemon CLI {}", config.cli_path.display());

    let (sink, reports) = ReportSink::channel();
    let renderer = std::thread::spawn(move || render(reports));

    let rt = tokio::runtime::Runtime::new()?;
    let result = rt.block_on(async {
        let daemon: Arc<dyn DaemonRpc> = Arc::new(CliDaemon::new(config.cli_path.clone()));
        let provider = StatsProvider::new(&config, daemon.clone())?;
        let sessions = SessionManager::new(
            MinerCommand::new(daemon.clone()),
            provider,
            config.report,
            sink.clone(),
        );
        body(Shell::new(sessions, daemon, sink)).await
    });
    // Dropping the runtime drops every sink clone, which ends the renderer.
    drop(rt);

    if renderer.join().is_err() {
        log::error!("Report renderer panicked");
    }
    result
}

/// Prints report lines until every sender is gone
fn render(reports: Receiver<Report>) {
    let stdout = std::io::stdout();
    for report in reports {
        let mut out = stdout.lock();
        let written = if report.text == shell::builtins::CLEAR_SCREEN {
            write!(out, "{}", report.text)
        } else {
            writeln!(out, "{}", report)
        };
        if written.and_then(|_| out.flush()).is_err() {
            break;
        }
    }
}

/// Interactive loop: one command per stdin line, Ctrl-C stops mining
/// (or leaves the shell when nothing is mining)
async fn run_shell(shell: Shell) -> Result<(), TerminalError> {
    shell.welcome();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(line) => {
                        if shell.execute(&line).await == Flow::Exit {
                            break;
                        }
                    }
                    None => break,
                }
            }
            signal = tokio::signal::ctrl_c() => {
                signal?;
                if shell.sessions().is_active() {
                    shell.sessions().stop();
                } else {
                    break;
                }
            }
        }
    }

    if shell.sessions().is_active() {
        shell.sessions().stop();
        shell.sessions().wait_idle(SHUTDOWN_GRACE).await;
    }
    Ok(())
}

/// How long leaving the shell waits for a stopped session to wind down
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Runs one session to completion; Ctrl-C cancels it
async fn mine_once(shell: Shell, request: MiningRequest) -> Result<(), TerminalError> {
    let Ok(handle) = shell.sessions().start(request) else {
        return Ok(());
    };
    let finished = handle.wait();
    tokio::pin!(finished);

    tokio::select! {
        result = &mut finished => return result,
        signal = tokio::signal::ctrl_c() => {
            signal?;
            shell.sessions().stop();
        }
    }

    // The in-flight block finishes before the stop notice goes out.
    finished.await
}

/// Writes the configuration template
///
/// Refuses to overwrite an existing file unless `--force` is given.
fn generate_config(opts: &cli::ConfigOptions) -> Result<(), TerminalError> {
    if opts.output.exists() && !opts.force {
        return Err(TerminalError::ConfigError(format!(
            "{} already exists (use --force to overwrite)",
            opts.output.display()
        )));
    }
    std::fs::write(&opts.output, config::generate_template())?;
    println!("Wrote {}", opts.output.display());
    Ok(())
}
