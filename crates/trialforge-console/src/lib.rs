//! Colorful console output for solver metrics.
//!
//! Provides a custom `tracing` layer that formats the solver's structured
//! events with colors.
//!
//! ## Log Levels
//!
//! - **INFO**: Lifecycle events (solve start/end, new best solutions, efficiency)
//! - **DEBUG**: Algorithm runs
//! - **WARN**: Failed evaluations
//! - **TRACE**: Individual trials

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();
static SOLVE_START_NANOS: AtomicU64 = AtomicU64::new(0);

/// Package version for banner display.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Targets whose events the console layer renders.
const TARGETS: [&str; 2] = ["trialforge_solver", "trialforge::"];

/// Initializes the solver console output.
///
/// Safe to call multiple times - only the first call has effect.
/// Prints the TrialForge banner and sets up tracing. `RUST_LOG` overrides
/// the default `trialforge_solver=info` filter.
pub fn init() {
    INIT.get_or_init(|| {
        print_banner();

        let mut builder = EnvFilter::builder();
        if let Ok(directive) = "trialforge_solver=info".parse::<Directive>() {
            builder = builder.with_default_directive(directive);
        }
        let filter = builder.from_env_lossy();

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(SolverConsoleLayer)
            .try_init();
    });
}

// Marks the start of solving for elapsed time tracking.
fn mark_solve_start() {
    let epoch = EPOCH.get_or_init(Instant::now);
    let nanos = epoch.elapsed().as_nanos() as u64;
    SOLVE_START_NANOS.store(nanos, Ordering::Relaxed);
}

// Returns elapsed time since solve start.
fn elapsed_secs() -> f64 {
    let Some(epoch) = EPOCH.get() else {
        return 0.0;
    };
    let start_nanos = SOLVE_START_NANOS.load(Ordering::Relaxed);
    let now_nanos = epoch.elapsed().as_nanos() as u64;
    now_nanos.saturating_sub(start_nanos) as f64 / 1_000_000_000.0
}

fn print_banner() {
    let banner = r#"
 _____      _       _ _____
|_   _| __ (_) __ _| |  ___|__  _ __ __ _  ___
  | || '__|| |/ _` | | |_ / _ \| '__/ _` |/ _ \
  | || |   | | (_| | |  _| (_) | | | (_| |  __/
  |_||_|   |_|\__,_|_|_|  \___/|_|  \__, |\___|
                                    |___/
"#;

    let version_line = format!(
        "              v{} - Multi-Algorithm Trial Optimizer\n",
        VERSION
    );

    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", banner.bright_cyan());
    let _ = writeln!(stdout, "{}", version_line.bright_white().bold());
    let _ = stdout.flush();
}

/// A tracing layer that formats solver events with colors.
pub struct SolverConsoleLayer;

impl<S: Subscriber> Layer<S> for SolverConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let target = metadata.target();

        if !TARGETS.iter().any(|prefix| target.starts_with(prefix)) {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor, *metadata.level());
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    algorithm: Option<String>,
    strategy: Option<String>,
    reason: Option<String>,
    point: Option<String>,
    variables: Option<u64>,
    objectives: Option<u64>,
    algorithms: Option<u64>,
    evaluations_per_run: Option<u64>,
    budget: Option<u64>,
    trials: Option<u64>,
    evaluations: Option<u64>,
    total_evaluations: Option<u64>,
    vetoes: Option<u64>,
    runs: Option<u64>,
    optimal_solutions: Option<u64>,
    duration_ms: Option<u64>,
    satisfaction: Option<f64>,
    efficiency: Option<f64>,
    terminated_early: Option<bool>,
    failed: Option<bool>,
    vetoed: Option<bool>,
}

impl EventVisitor {
    fn set_text(&mut self, name: &str, value: String) {
        match name {
            "event" => self.event = Some(value),
            "algorithm" => self.algorithm = Some(value),
            "strategy" => self.strategy = Some(value),
            "reason" => self.reason = Some(value),
            "point" => self.point = Some(value),
            _ => {}
        }
    }
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        self.set_text(field.name(), s.trim_matches('"').to_string());
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.set_text(field.name(), value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "variables" => self.variables = Some(value),
            "objectives" => self.objectives = Some(value),
            "algorithms" => self.algorithms = Some(value),
            "evaluations_per_run" => self.evaluations_per_run = Some(value),
            "budget" => self.budget = Some(value),
            "trials" => self.trials = Some(value),
            "evaluations" => self.evaluations = Some(value),
            "total_evaluations" => self.total_evaluations = Some(value),
            "vetoes" => self.vetoes = Some(value),
            "runs" => self.runs = Some(value),
            "optimal_solutions" => self.optimal_solutions = Some(value),
            "duration_ms" => self.duration_ms = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        match field.name() {
            "satisfaction" => self.satisfaction = Some(value),
            "efficiency" => self.efficiency = Some(value),
            _ => {}
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        match field.name() {
            "terminated_early" => self.terminated_early = Some(value),
            "failed" => self.failed = Some(value),
            "vetoed" => self.vetoed = Some(value),
            _ => {}
        }
    }
}

fn format_event(v: &EventVisitor, level: Level) -> String {
    let event = v.event.as_deref().unwrap_or("");

    match event {
        "solve_start" => format_solve_start(v),
        "solve_end" => format_solve_end(v),
        "run_start" => format_run_start(v),
        "run_end" => format_run_end(v),
        "new_best" => format_new_best(v),
        "efficiency" => format_efficiency(v),
        "evaluation_failed" => format_evaluation_failed(v),
        "contract_violation" => format_contract_violation(v),
        "no_algorithm_available" => format_no_algorithm(),
        "trial" => format_trial(v, level),
        _ => String::new(),
    }
}

fn format_elapsed() -> String {
    format!("{:>7.3}s", elapsed_secs())
        .bright_black()
        .to_string()
}

fn count(value: Option<u64>) -> String {
    value.unwrap_or(0).to_formatted_string(&Locale::en)
}

fn format_solve_start(v: &EventVisitor) -> String {
    mark_solve_start();
    let strategy = v.strategy.as_deref().unwrap_or("?");

    format!(
        "{} {} Solving │ {} variables │ {} objectives │ {} algorithms │ {} strategy │ {} evaluations/run",
        format_elapsed(),
        "▶".bright_green().bold(),
        count(v.variables).bright_yellow(),
        count(v.objectives).bright_yellow(),
        count(v.algorithms).bright_yellow(),
        strategy.bright_magenta(),
        count(v.evaluations_per_run).bright_yellow(),
    )
}

fn format_solve_end(v: &EventVisitor) -> String {
    let satisfaction = v.satisfaction.unwrap_or(0.0);
    let failed = v.failed.unwrap_or(false);
    let stopped = v.terminated_early.unwrap_or(false);

    let status_text = if failed {
        "SOLVE FAILED"
    } else if stopped {
        "STOPPED EARLY"
    } else {
        "SOLVE COMPLETE"
    };
    let status_colored = if failed {
        status_text.bright_red().bold().to_string()
    } else if stopped {
        status_text.yellow().bold().to_string()
    } else {
        status_text.bright_green().bold().to_string()
    };

    let mut output = format!(
        "{} {} Solving complete │ {} │ {}",
        format_elapsed(),
        "■".bright_cyan().bold(),
        format_satisfaction(satisfaction),
        status_colored
    );

    // Summary box
    let inner_width: usize = 58;
    output.push_str("\n\n");
    output.push_str(&format!("╔{}╗", "═".repeat(inner_width)).bright_cyan().to_string());
    output.push('\n');

    let total_pad = inner_width.saturating_sub(status_text.len());
    let left_pad = total_pad / 2;
    let right_pad = total_pad - left_pad;
    output.push_str(&format!(
        "{}{}{}{}{}",
        "║".bright_cyan(),
        " ".repeat(left_pad),
        status_colored,
        " ".repeat(right_pad),
        "║".bright_cyan()
    ));
    output.push('\n');
    output.push_str(&format!("╠{}╣", "═".repeat(inner_width)).bright_cyan().to_string());
    output.push('\n');

    let rows = [
        ("Satisfaction:", format!("{satisfaction:.6}")),
        ("Evaluations:", count(v.evaluations)),
        ("Vetoes:", count(v.vetoes)),
        ("Algorithm runs:", count(v.runs)),
        ("Optimal solutions:", count(v.optimal_solutions)),
        ("Duration:", format_duration_ms(v.duration_ms.unwrap_or(0))),
    ];
    for (label, value) in rows {
        output.push_str(&format!(
            "{}  {:<20}{:>34}  {}",
            "║".bright_cyan(),
            label,
            value,
            "║".bright_cyan()
        ));
        output.push('\n');
    }

    output.push_str(&format!("╚{}╝", "═".repeat(inner_width)).bright_cyan().to_string());
    output.push('\n');

    output
}

fn format_run_start(v: &EventVisitor) -> String {
    let algorithm = v.algorithm.as_deref().unwrap_or("?");

    format!(
        "{} {} {} run │ budget {}",
        format_elapsed(),
        "▶".bright_blue(),
        algorithm.white().bold(),
        count(v.budget).yellow(),
    )
}

fn format_run_end(v: &EventVisitor) -> String {
    let algorithm = v.algorithm.as_deref().unwrap_or("?");

    format!(
        "{} {} {} done │ {} trials │ {} evaluations │ {} vetoes │ run {}",
        format_elapsed(),
        "◀".bright_blue(),
        algorithm.white().bold(),
        count(v.trials).white(),
        count(v.evaluations).bright_magenta(),
        count(v.vetoes).white(),
        count(v.runs).white(),
    )
}

fn format_new_best(v: &EventVisitor) -> String {
    let algorithm = v.algorithm.as_deref().unwrap_or("?");
    let point = v.point.as_deref().unwrap_or("");

    format!(
        "{} {} New best │ {} │ {} │ {} evaluations │ {}",
        format_elapsed(),
        "★".bright_yellow().bold(),
        format_satisfaction(v.satisfaction.unwrap_or(0.0)),
        algorithm.white().bold(),
        count(v.evaluations).bright_magenta(),
        point.bright_black(),
    )
}

fn format_efficiency(v: &EventVisitor) -> String {
    let algorithm = v.algorithm.as_deref().unwrap_or("?");
    let efficiency = v.efficiency.unwrap_or(0.0);

    format!(
        "{} {} {:<14} │ {:>8} evaluations │ efficiency {} │ at {}",
        format_elapsed(),
        "⚡".bright_cyan(),
        algorithm,
        count(v.evaluations).white(),
        format!("{efficiency:.4}").bright_magenta().bold(),
        count(v.total_evaluations).bright_black(),
    )
}

fn format_evaluation_failed(v: &EventVisitor) -> String {
    let algorithm = v.algorithm.as_deref().unwrap_or("?");
    let reason = v.reason.as_deref().unwrap_or("");

    format!(
        "{} {} Evaluation failed │ {} │ {}",
        format_elapsed(),
        "!".bright_red().bold(),
        algorithm.white(),
        reason.red(),
    )
}

fn format_contract_violation(v: &EventVisitor) -> String {
    let algorithm = v.algorithm.as_deref().unwrap_or("?");
    let reason = v.reason.as_deref().unwrap_or("");

    format!(
        "{} {} Contract violation │ {} │ {}",
        format_elapsed(),
        "✗".bright_red().bold(),
        algorithm.white(),
        reason.bright_red().bold(),
    )
}

fn format_no_algorithm() -> String {
    format!(
        "{} {} No algorithm available",
        format_elapsed(),
        "!".yellow().bold(),
    )
}

fn format_trial(v: &EventVisitor, level: Level) -> String {
    if level != Level::TRACE {
        return String::new();
    }

    let algorithm = v.algorithm.as_deref().unwrap_or("?");
    let icon = if v.vetoed.unwrap_or(false) {
        "✗".bright_red().to_string()
    } else {
        "✓".bright_green().to_string()
    };
    let satisfaction = match v.satisfaction {
        Some(satisfaction) => format!("{satisfaction:.6}"),
        None => "vetoed".to_string(),
    };

    format!(
        "{} {} Trial │ {:<14} │ {}",
        format_elapsed(),
        icon,
        algorithm.bright_black(),
        satisfaction.bright_black()
    )
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}

fn format_satisfaction(satisfaction: f64) -> String {
    let text = format!("{satisfaction:.6}");
    if satisfaction >= 0.9 {
        text.bright_green().to_string()
    } else if satisfaction >= 0.5 {
        text.yellow().to_string()
    } else {
        text.bright_red().to_string()
    }
}
