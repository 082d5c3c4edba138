// src/miner/session.rs
//! Mining session control
//!
//! A [`SessionManager`] owns the "is a session running" gate and the
//! cancellation token of the current session. Each accepted start spawns
//! one worker task that mines block by block, gathers stats after each
//! block and sends a formatted report to the sink.

use crate::miner::command::{self, MinerCommand};
use crate::miner::report::{BlockReport, Report, ReportSink};
use crate::stats::{StatsAggregator, StatsProvider};
use crate::types::{MiningRequest, ReportMode};
use crate::utils::error::TerminalError;
use arc_swap::ArcSwapOption;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Text of the notice emitted when a session ends because of a stop request
pub const STOPPED_BY_USER: &str = "Mining stopped by user";

/// Cooperative, idempotent stop flag shared with one session worker
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates a token in the not-cancelled state
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation; calling it again has no further effect
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Clears the re-entrancy gate when the worker exits, including by panic
struct ActiveGuard(Arc<AtomicBool>);

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Handle to a started session
///
/// Dropping it does not stop the session; the worker keeps running
/// detached until it finishes or is cancelled.
pub struct SessionHandle {
    cancel: CancelToken,
    join: JoinHandle<()>,
}

impl SessionHandle {
    /// Requests the session to stop after the in-flight block
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Waits for the worker to exit
    pub async fn wait(self) -> Result<(), TerminalError> {
        self.join.await?;
        Ok(())
    }
}

/// Starts, tracks and stops mining sessions
///
/// At most one session runs at a time; a start while one is active is
/// rejected, never queued.
pub struct SessionManager {
    /// Re-entrancy gate, cleared by the worker when it exits
    active: Arc<AtomicBool>,
    /// Token of the most recently started session
    current: ArcSwapOption<CancelToken>,
    miner: MinerCommand,
    provider: StatsProvider,
    mode: ReportMode,
    sink: ReportSink,
}

impl SessionManager {
    /// Creates an idle manager
    ///
    /// # Arguments
    /// * `miner` - Mining command invoked once per block
    /// * `provider` - Source of per-block stats
    /// * `mode` - Whether supply and market figures are fetched
    /// * `sink` - Where every report line goes
    pub fn new(
        miner: MinerCommand,
        provider: StatsProvider,
        mode: ReportMode,
        sink: ReportSink,
    ) -> Self {
        SessionManager {
            active: Arc::new(AtomicBool::new(false)),
            current: ArcSwapOption::empty(),
            miner,
            provider,
            mode,
            sink,
        }
    }

    /// Whether a session worker is currently running
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Starts a session for `request`
    ///
    /// Must be called from within a Tokio runtime. Each session gets a
    /// fresh cancellation token; tokens are never reused.
    ///
    /// # Returns
    /// * `Ok(SessionHandle)` - The worker was spawned
    /// * `Err(TerminalError::ReentrancyRejected)` - A session is already
    ///   running; a warning was sent to the sink and nothing was spawned
    pub fn start(&self, request: MiningRequest) -> Result<SessionHandle, TerminalError> {
        if self
            .active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            let err = TerminalError::ReentrancyRejected;
            self.sink.emit(Report::warning(err.to_string()));
            return Err(err);
        }

        let cancel = CancelToken::new();
        self.current.store(Some(Arc::new(cancel.clone())));

        if request.repeat {
            self.sink.emit(Report::success(format!(
                "Starting repeated mining of {} blocks (Ctrl-C or 'stop' to stop)",
                request.block_count
            )));
        } else {
            self.sink.emit(Report::success(format!(
                "Started mining {} blocks",
                request.block_count
            )));
        }
        log::info!(
            "Mining session started: {} blocks, repeat={}, report={}",
            request.block_count,
            request.repeat,
            self.mode
        );

        let worker = SessionWorker {
            request,
            cancel: cancel.clone(),
            active: self.active.clone(),
            miner: self.miner.clone(),
            provider: self.provider.clone(),
            mode: self.mode,
            sink: self.sink.clone(),
        };
        let join = tokio::spawn(worker.run());

        Ok(SessionHandle { cancel, join })
    }

    /// Asks the running session to stop
    ///
    /// # Returns
    /// `true` if a session was running and has been signalled
    pub fn stop(&self) -> bool {
        if !self.is_active() {
            self.sink.emit(Report::output("No active mining operation"));
            return false;
        }

        if let Some(cancel) = self.current.load_full() {
            cancel.cancel();
        }
        self.sink.emit(Report::warning("Stopping mining..."));
        true
    }

    /// Waits up to `grace` for the running worker to exit
    ///
    /// Used before shutdown so the in-flight block and the stop notice are
    /// not cut off when the runtime goes away.
    ///
    /// # Returns
    /// `true` if no session is running any more
    pub async fn wait_idle(&self, grace: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + grace;
        while self.is_active() {
            if tokio::time::Instant::now() >= deadline {
                log::warn!("Mining session still running after {:?}", grace);
                return false;
            }
            tokio::time::sleep(IDLE_POLL).await;
        }
        true
    }
}

const IDLE_POLL: Duration = Duration::from_millis(20);

/// State moved into the spawned worker task
struct SessionWorker {
    request: MiningRequest,
    cancel: CancelToken,
    active: Arc<AtomicBool>,
    miner: MinerCommand,
    provider: StatsProvider,
    mode: ReportMode,
    sink: ReportSink,
}

impl SessionWorker {
    async fn run(self) {
        let active = ActiveGuard(self.active.clone());
        self.run_passes().await;

        if self.cancel.is_cancelled() {
            self.sink.emit(Report::warning(STOPPED_BY_USER));
        }
        drop(active);
        log::info!("Mining session finished");
    }

    /// Runs passes until the request is satisfied, the token is
    /// cancelled or the mining command fails
    async fn run_passes(&self) {
        'session: loop {
            for block in 1..=self.request.block_count {
                if self.cancel.is_cancelled() {
                    break 'session;
                }

                let output = match self.miner.run(block).await {
                    Ok(output) => output,
                    Err(e) => {
                        log::warn!("Mining command failed on block {}: {}", block, e);
                        self.sink.emit(Report::error(command::failure_text(&e)));
                        break 'session;
                    }
                };

                let report = self.collect(block).await;
                self.sink.emit(Report::output(report.to_string()));

                let output = output.trim_end();
                if !output.trim().is_empty() {
                    self.sink.emit(Report::output(output));
                }
            }

            if !self.request.repeat || self.cancel.is_cancelled() {
                break;
            }
        }
    }

    async fn collect(&self, block: u32) -> BlockReport {
        let (raw, money_supply, market) = match self.mode {
            ReportMode::Full => {
                let (raw, supply, market) = tokio::join!(
                    self.provider.fetch_all(),
                    self.provider.money_supply(),
                    self.provider.fetch_market()
                );
                (raw, Some(supply), Some(market))
            }
            ReportMode::Basic => (self.provider.fetch_all().await, None, None),
        };

        BlockReport {
            block,
            raw,
            derived: StatsAggregator::derive(&raw),
            money_supply,
            market,
        }
    }
}
