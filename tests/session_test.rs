// tests/session_test.rs
//! Mining session behaviour against a scripted daemon

mod common;

use common::*;
use std::sync::atomic::Ordering;
use std::time::Duration;
use straya_terminal::miner::session::STOPPED_BY_USER;
use straya_terminal::{MiningRequest, Report, ReportKind, ReportMode, TerminalError};

fn request(block_count: u32, repeat: bool) -> MiningRequest {
    MiningRequest {
        block_count,
        repeat,
    }
}

#[tokio::test]
async fn single_pass_mines_every_block_then_stops() {
    let h = harness(ScriptedDaemon::healthy(), healthy_routes(), ReportMode::Basic).await;

    let handle = h.manager.start(request(3, false)).unwrap();
    handle.wait().await.unwrap();

    let reports = h.drain();
    assert_eq!(reports[0], Report::success("Started mining 3 blocks"));
    let blocks = block_reports(&reports);
    assert_eq!(blocks.len(), 3);
    for (i, report) in blocks.iter().enumerate() {
        assert!(report.text.starts_with(&format!("Mined Block {}\n", i + 1)));
    }
    assert_eq!(h.daemon.generate_args(), vec!["1", "2", "3"]);
    assert!(reports.iter().all(|r| r.kind != ReportKind::Warning));
    assert!(!h.manager.is_active());
}

#[tokio::test]
async fn block_report_carries_derived_metrics() {
    let h = harness(ScriptedDaemon::healthy(), healthy_routes(), ReportMode::Basic).await;

    h.manager.start(request(1, false)).unwrap().wait().await.unwrap();

    let reports = h.drain();
    let text = &block_reports(&reports)[0].text;
    // difficulty 0.5, 3 connected peers, 12 network peers, 1 MH/s
    assert!(text.contains("├─ RMS: 0.6667"), "{}", text);
    assert!(text.contains("├─ Connected Peers: 3"));
    assert!(text.contains("├─ Network Peers: 12"));
    assert!(text.contains("├─ Network Hashrate: 1,000.00 KH/s"));
    assert!(!text.contains("BTC Price"));

    // mining output follows the block report
    let idx = reports.iter().position(|r| r.text.starts_with("Mined Block")).unwrap();
    assert!(reports[idx + 1].text.starts_with("[\""));
}

#[tokio::test]
async fn command_failure_ends_session_with_one_error() {
    let daemon = ScriptedDaemon::healthy().fail_generate_on(2);
    let h = harness(daemon, healthy_routes(), ReportMode::Basic).await;

    h.manager.start(request(3, false)).unwrap().wait().await.unwrap();

    let reports = h.drain();
    let errors: Vec<_> = reports.iter().filter(|r| r.kind == ReportKind::Error).collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].text, "Mining error: boom");
    let blocks = block_reports(&reports);
    assert_eq!(blocks.len(), 1);
    assert!(blocks[0].text.starts_with("Mined Block 1\n"));
    assert_eq!(h.daemon.generate_calls.load(Ordering::SeqCst), 2);
    assert!(!h.manager.is_active());
}

#[tokio::test]
async fn command_failure_is_fatal_in_repeat_mode() {
    let daemon = ScriptedDaemon::healthy().fail_generate_on(1);
    let h = harness(daemon, healthy_routes(), ReportMode::Basic).await;

    h.manager.start(request(2, true)).unwrap().wait().await.unwrap();

    let reports = h.drain();
    assert_eq!(h.daemon.generate_calls.load(Ordering::SeqCst), 1);
    assert!(block_reports(&reports).is_empty());
    assert_eq!(reports.last().unwrap().kind, ReportKind::Error);
}

#[tokio::test]
async fn missing_tool_is_reported_distinctly() {
    let h = harness(ScriptedDaemon::healthy().missing(), healthy_routes(), ReportMode::Basic).await;

    h.manager.start(request(2, true)).unwrap().wait().await.unwrap();

    let reports = h.drain();
    let errors: Vec<_> = reports.iter().filter(|r| r.kind == ReportKind::Error).collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].text.starts_with("Mining aborted, daemon CLI not found"));
    assert!(block_reports(&reports).is_empty());
}

#[tokio::test]
async fn second_start_is_rejected_while_active() {
    let daemon = ScriptedDaemon::healthy().generate_delay(Duration::from_millis(50));
    let h = harness(daemon, healthy_routes(), ReportMode::Basic).await;

    let handle = h.manager.start(request(1, true)).unwrap();
    let second = h.manager.start(request(5, false));
    assert!(matches!(second, Err(TerminalError::ReentrancyRejected)));
    assert!(h.manager.is_active());

    h.daemon.generating.notified().await;
    assert!(h.manager.stop());
    handle.wait().await.unwrap();

    let reports = h.drain();
    let warnings: Vec<_> = reports
        .iter()
        .filter(|r| r.kind == ReportKind::Warning)
        .map(|r| r.text.as_str())
        .collect();
    assert_eq!(
        warnings,
        vec!["Mining already in progress", "Stopping mining...", STOPPED_BY_USER]
    );
    // only the first request ever reached the daemon
    assert!(h.daemon.generate_args().iter().all(|a| a == "1"));
    assert!(!reports.iter().any(|r| r.text.contains("5 blocks")));
}

#[tokio::test]
async fn cancellation_stops_after_in_flight_block() {
    let daemon = ScriptedDaemon::healthy().generate_delay(Duration::from_millis(100));
    let h = harness(daemon, healthy_routes(), ReportMode::Basic).await;

    let handle = h.manager.start(request(2, true)).unwrap();
    h.daemon.generating.notified().await;
    h.manager.stop();
    handle.wait().await.unwrap();

    let reports = h.drain();
    assert_eq!(block_reports(&reports).len(), 1);
    assert_eq!(h.daemon.generate_calls.load(Ordering::SeqCst), 1);
    assert_eq!(reports.last().unwrap(), &Report::warning(STOPPED_BY_USER));
    assert!(!h.manager.is_active());
}

#[tokio::test]
async fn immediate_cancel_emits_at_most_one_block() {
    let h = harness(ScriptedDaemon::healthy(), healthy_routes(), ReportMode::Basic).await;

    let handle = h.manager.start(request(1, true)).unwrap();
    handle.cancel();
    handle.wait().await.unwrap();

    let reports = h.drain();
    assert!(block_reports(&reports).len() <= 1);
    assert_eq!(reports.last().unwrap(), &Report::warning(STOPPED_BY_USER));
}

#[tokio::test]
async fn wait_idle_after_stop_sees_the_stop_notice() {
    let daemon = ScriptedDaemon::healthy().generate_delay(Duration::from_millis(100));
    let h = harness(daemon, healthy_routes(), ReportMode::Basic).await;

    let _handle = h.manager.start(request(3, true)).unwrap();
    h.daemon.generating.notified().await;
    h.manager.stop();
    assert!(h.manager.wait_idle(Duration::from_secs(5)).await);

    let reports = h.drain();
    assert_eq!(block_reports(&reports).len(), 1);
    assert_eq!(reports.last().unwrap(), &Report::warning(STOPPED_BY_USER));
}

#[tokio::test]
async fn wait_idle_gives_up_after_grace() {
    let daemon = ScriptedDaemon::healthy().generate_delay(Duration::from_millis(500));
    let h = harness(daemon, healthy_routes(), ReportMode::Basic).await;

    let handle = h.manager.start(request(1, false)).unwrap();
    h.daemon.generating.notified().await;
    assert!(!h.manager.wait_idle(Duration::from_millis(30)).await);
    assert!(h.manager.is_active());

    handle.wait().await.unwrap();
    assert!(h.manager.wait_idle(Duration::ZERO).await);
}

#[tokio::test]
async fn panicking_worker_releases_the_gate() {
    let h = harness(
        ScriptedDaemon::healthy().panic_on_generate(),
        healthy_routes(),
        ReportMode::Basic,
    )
    .await;

    let handle = h.manager.start(request(1, false)).unwrap();
    assert!(matches!(handle.wait().await, Err(TerminalError::TaskError(_))));
    assert!(!h.manager.is_active());

    let retry = h.manager.start(request(1, false)).unwrap();
    assert!(matches!(retry.wait().await, Err(TerminalError::TaskError(_))));
}

#[tokio::test]
async fn stop_while_idle_is_a_reported_no_op() {
    let h = harness(ScriptedDaemon::healthy(), healthy_routes(), ReportMode::Basic).await;

    assert!(!h.manager.stop());
    assert_eq!(h.drain(), vec![Report::output("No active mining operation")]);
}

#[tokio::test]
async fn new_session_gets_a_fresh_token() {
    let h = harness(ScriptedDaemon::healthy(), healthy_routes(), ReportMode::Basic).await;

    let first = h.manager.start(request(1, true)).unwrap();
    first.cancel();
    first.wait().await.unwrap();
    h.drain();

    h.manager.start(request(2, false)).unwrap().wait().await.unwrap();

    let reports = h.drain();
    assert_eq!(block_reports(&reports).len(), 2);
    assert!(!reports.iter().any(|r| r.text == STOPPED_BY_USER));
}

#[tokio::test]
async fn block_counter_restarts_each_pass() {
    let daemon = ScriptedDaemon::healthy().fail_generate_on(5);
    let h = harness(daemon, healthy_routes(), ReportMode::Basic).await;

    h.manager.start(request(2, true)).unwrap().wait().await.unwrap();

    let reports = h.drain();
    let headers: Vec<_> = block_reports(&reports)
        .iter()
        .map(|r| r.text.lines().next().unwrap().to_string())
        .collect();
    assert_eq!(
        headers,
        vec!["Mined Block 1", "Mined Block 2", "Mined Block 1", "Mined Block 2"]
    );
    assert_eq!(h.daemon.generate_args(), vec!["1", "2", "1", "2", "1"]);
}

#[tokio::test]
async fn full_report_includes_supply_and_market() {
    let h = harness(ScriptedDaemon::healthy(), healthy_routes(), ReportMode::Full).await;

    h.manager.start(request(1, false)).unwrap().wait().await.unwrap();

    let reports = h.drain();
    let text = &block_reports(&reports)[0].text;
    assert!(text.contains("├─ Network Money Supply: 1,234,568"), "{}", text);
    assert!(text.contains("├─ BTC Price (TradeOgre): 0.00000003 BTC"));
    assert!(text.contains("├─ BTC Sell (TradeOgre): 0.00000002 BTC"));
    assert!(text.contains("├─ BTC Buy (TradeOgre): 0.00000004 BTC"));
}

#[tokio::test]
async fn ticker_outage_leaves_network_figures_intact() {
    let routes = with_route(healthy_routes(), (TICKER_PATH, 500, "oops"));
    let h = harness(ScriptedDaemon::healthy(), routes, ReportMode::Full).await;

    h.manager.start(request(1, false)).unwrap().wait().await.unwrap();

    let reports = h.drain();
    assert!(reports.iter().all(|r| r.kind != ReportKind::Error));
    let text = &block_reports(&reports)[0].text;
    assert!(text.contains("├─ BTC Price (TradeOgre): N/A"));
    assert!(text.contains("├─ BTC Sell (TradeOgre): N/A"));
    assert!(text.contains("├─ BTC Buy (TradeOgre): N/A"));
    assert!(text.contains("├─ RMS: 0.6667"));
    assert!(text.contains("├─ Network Peers: 12"));
}
