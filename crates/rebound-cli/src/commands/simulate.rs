//! Flaky dependency simulation

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use colored::*;
use rebound_core::config::ResilienceConfig;
use rebound_core::recovery::{ApiError, BreakerStatus, ErrorRecovery, RetryOptions};
use tokio::time::Instant;

use crate::console::CliConsole;

#[derive(Debug, Clone)]
pub struct SimulateArgs {
    pub failures: u32,
    pub code: String,
    pub calls: u32,
    pub service: String,
    pub fallback: Option<String>,
}

/// Dependency that fails a fixed number of times, then recovers
#[derive(Debug)]
struct FlakyDependency {
    failures: u32,
    code: String,
    invocations: AtomicU32,
}

impl FlakyDependency {
    fn new(failures: u32, code: impl Into<String>) -> Self {
        Self {
            failures,
            code: code.into(),
            invocations: AtomicU32::new(0),
        }
    }

    async fn call(&self) -> Result<String, ApiError> {
        let invocation = self.invocations.fetch_add(1, Ordering::SeqCst) + 1;
        if invocation <= self.failures {
            Err(ApiError::with_message(
                self.code.clone(),
                format!("simulated failure #{}", invocation),
            ))
        } else {
            Ok(format!("response #{}", invocation))
        }
    }

    fn invocations(&self) -> u32 {
        self.invocations.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum CallOutcome {
    Value(String),
    Failed {
        message: String,
        /// Code of the dependency's own error; `None` for breaker rejections
        code: Option<String>,
    },
}

#[derive(Debug)]
struct SimulationReport {
    outcomes: Vec<(CallOutcome, Duration)>,
    invocations: u32,
    statuses: BTreeMap<String, BreakerStatus>,
}

/// Run the simulation and print each outcome plus final breaker statuses
pub async fn execute(config: &ResilienceConfig, args: SimulateArgs) -> anyhow::Result<()> {
    let console = CliConsole::new();
    console.print_header("Simulation");
    console.info(&format!(
        "{} call(s) against '{}', first {} invocation(s) fail with {}",
        args.calls, args.service, args.failures, args.code
    ));

    let recovery = ErrorRecovery::from_config(config);
    let report = run(&recovery, &args).await;

    for (index, (outcome, elapsed)) in report.outcomes.iter().enumerate() {
        let took = format!("({}ms)", elapsed.as_millis()).dimmed();
        match outcome {
            CallOutcome::Value(value) if args.fallback.as_deref() == Some(value.as_str()) => {
                console.warn(&format!("call {}: fallback {} {}", index + 1, value, took))
            }
            CallOutcome::Value(value) => {
                console.success(&format!("call {}: {} {}", index + 1, value, took))
            }
            CallOutcome::Failed {
                message,
                code: Some(code),
            } => console.error(&format!("call {}: [{}] {} {}", index + 1, code, message, took)),
            CallOutcome::Failed {
                message,
                code: None,
            } => console.error(&format!("call {}: {} {}", index + 1, message, took)),
        }
    }

    console.print_header("Circuit Breakers");
    println!("Dependency invocations: {}", report.invocations);
    for (service, status) in &report.statuses {
        println!(
            "{}: {} (consecutive failures: {}, calls: {}, failures: {}, rejections: {}, failure rate: {:.1}%)",
            service.bold(),
            status.state,
            status.consecutive_failures,
            status.total_calls,
            status.total_failures,
            status.total_rejections,
            status.failure_rate()
        );
        if let Some(remaining) = status.retry_after() {
            println!("  next probe in {}ms", remaining.as_millis());
        }
    }

    Ok(())
}

async fn run(recovery: &ErrorRecovery, args: &SimulateArgs) -> SimulationReport {
    let dependency = FlakyDependency::new(args.failures, args.code.clone());
    let mut outcomes = Vec::with_capacity(args.calls as usize);

    for _ in 0..args.calls {
        let start = Instant::now();
        let outcome = match &args.fallback {
            Some(fallback) => CallOutcome::Value(
                recovery
                    .with_fallback(|| dependency.call(), fallback.clone(), &args.service)
                    .await,
            ),
            None => match recovery
                .execute_with_retry(|| dependency.call(), RetryOptions::default(), &args.service)
                .await
            {
                Ok(value) => CallOutcome::Value(value),
                Err(error) => CallOutcome::Failed {
                    message: error.to_string(),
                    code: error.operation_error().map(|e| e.code.clone()),
                },
            },
        };
        outcomes.push((outcome, start.elapsed()));
    }

    SimulationReport {
        outcomes,
        invocations: dependency.invocations(),
        statuses: recovery.all_circuit_breaker_statuses(),
    }
}
