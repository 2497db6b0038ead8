use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::{Instant, sleep, timeout};
use tracing::{debug, info, warn};

use crate::readiness::types::{ProbeSettings, ReadinessOutcome, ReadinessPolicy};

/// Delay before the retry following `attempt` (zero-based): `initial * 2^attempt`, capped at `max`.
pub fn backoff_delay(attempt: u32, initial: Duration, max: Duration) -> Duration {
    let factor = 2_u32.checked_pow(attempt).unwrap_or(u32::MAX);
    initial.checked_mul(factor).unwrap_or(max).min(max)
}

/// Wait until the policy considers the backend reachable.
///
/// Never fails: a probe that runs out of time reports
/// [`ReadinessOutcome::TimedOut`] and the caller loads the target anyway.
pub async fn wait_until_ready(policy: &ReadinessPolicy) -> ReadinessOutcome {
    match policy {
        ReadinessPolicy::FixedDelay(delay) => {
            debug!(event = "core.readiness.fixed_delay_started", delay_ms = delay.as_millis() as u64);
            sleep(*delay).await;
            ReadinessOutcome::DelayElapsed
        }
        ReadinessPolicy::Probe(settings) => probe_until_ready(settings).await,
    }
}

async fn probe_until_ready(settings: &ProbeSettings) -> ReadinessOutcome {
    let started = Instant::now();
    let mut attempts = 0_u32;

    info!(
        event = "core.readiness.probe_started",
        host = %settings.host,
        port = settings.port,
        health_path = ?settings.health_path,
        max_wait_ms = settings.max_wait.as_millis() as u64
    );

    loop {
        attempts += 1;

        match probe_once(settings).await {
            Ok(()) => {
                let waited_ms = started.elapsed().as_millis() as u64;
                info!(event = "core.readiness.backend_reachable", attempts, waited_ms);
                return ReadinessOutcome::Reachable {
                    attempts,
                    waited_ms,
                };
            }
            Err(reason) => {
                debug!(event = "core.readiness.probe_failed", attempt = attempts, reason = %reason);
            }
        }

        let elapsed = started.elapsed();
        if elapsed >= settings.max_wait {
            let waited_ms = elapsed.as_millis() as u64;
            warn!(
                event = "core.readiness.probe_timed_out",
                attempts,
                waited_ms,
                message = "Backend not reachable, loading the window anyway"
            );
            return ReadinessOutcome::TimedOut {
                attempts,
                waited_ms,
            };
        }

        let delay = backoff_delay(attempts - 1, settings.initial_backoff, settings.max_backoff)
            .min(settings.max_wait - elapsed);
        sleep(delay).await;
    }
}

/// One connection attempt, bounded by `probe_timeout`.
async fn probe_once(settings: &ProbeSettings) -> Result<(), String> {
    match timeout(settings.probe_timeout, probe_connection(settings)).await {
        Ok(result) => result,
        Err(_) => Err(format!(
            "no answer within {}ms",
            settings.probe_timeout.as_millis()
        )),
    }
}

async fn probe_connection(settings: &ProbeSettings) -> Result<(), String> {
    let mut stream = TcpStream::connect((settings.host.as_str(), settings.port))
        .await
        .map_err(|e| format!("connect failed: {e}"))?;

    let Some(path) = &settings.health_path else {
        return Ok(());
    };

    let request = format!(
        "GET {path} HTTP/1.1\r\nHost: {}:{}\r\nConnection: close\r\n\r\n",
        settings.host, settings.port
    );
    stream
        .write_all(request.as_bytes())
        .await
        .map_err(|e| format!("write failed: {e}"))?;

    let mut reader = BufReader::new(stream);
    let mut status_line = String::new();
    reader
        .read_line(&mut status_line)
        .await
        .map_err(|e| format!("read failed: {e}"))?;

    match parse_status_code(&status_line) {
        Some(code) if (200..300).contains(&code) => Ok(()),
        Some(code) => Err(format!("health check answered {code}")),
        None => Err(format!("malformed status line: {:?}", status_line.trim_end())),
    }
}

/// Extract the status code from an HTTP/1.x status line.
fn parse_status_code(line: &str) -> Option<u16> {
    let mut parts = line.split_whitespace();
    let version = parts.next()?;
    if !version.starts_with("HTTP/") {
        return None;
    }
    parts.next()?.parse().ok()
}
