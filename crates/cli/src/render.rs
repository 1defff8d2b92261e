//! Terminal rendering of task outcomes

use colored::Colorize;
use tabled::{Table, Tabled};
use tally_core::domain::{Task, TaskOutcome};
use tracing::warn;

/// Print one outcome as soon as it arrives
pub fn print_outcome(outcome: &TaskOutcome, json: bool) {
    if json {
        match serde_json::to_string(outcome) {
            Ok(line) => println!("{}", line),
            Err(e) => warn!(error = %e, "Failed to serialize outcome"),
        }
        return;
    }

    match outcome {
        TaskOutcome::Success {
            file_name,
            metric,
            value,
            ..
        } => println!(
            "{} {}  {}{}",
            "✓".green(),
            file_name.bold(),
            metric.result_prefix(),
            value.to_string().green()
        ),
        TaskOutcome::Failure {
            file_name,
            metric,
            kind,
            message,
            ..
        } => println!(
            "{} {}  {}{} ({})",
            "✗".red(),
            file_name.bold(),
            metric.result_prefix(),
            message.red(),
            kind
        ),
    }
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "Metric")]
    metric: &'static str,
    #[tabled(rename = "Result")]
    result: String,
}

/// Print the per-task table once the batch has drained
///
/// Rows follow scheduling order, not completion order.
pub fn print_summary(order: &[Task], outcomes: &[TaskOutcome]) {
    let rows: Vec<SummaryRow> = ordered(order, outcomes)
        .into_iter()
        .map(|o| SummaryRow {
            file: o.path().display().to_string(),
            metric: o.metric().label(),
            result: match o {
                TaskOutcome::Success { value, .. } => value.to_string(),
                TaskOutcome::Failure { kind, .. } => format!("FAILED ({})", kind),
            },
        })
        .collect();

    let failed = outcomes.iter().filter(|o| !o.is_success()).count();

    println!();
    println!("{}", Table::new(rows));
    println!();
    if failed == 0 {
        println!(
            "{}",
            format!("✓ {} task(s) completed", outcomes.len()).green().bold()
        );
    } else {
        println!(
            "{}",
            format!(
                "✗ {} of {} task(s) failed",
                failed,
                outcomes.len()
            )
            .red()
            .bold()
        );
    }
}

/// Outcomes rearranged to match `order`; outcomes without a task come last
fn ordered<'a>(order: &[Task], outcomes: &'a [TaskOutcome]) -> Vec<&'a TaskOutcome> {
    let mut remaining: Vec<&TaskOutcome> = outcomes.iter().collect();
    let mut sorted = Vec::with_capacity(outcomes.len());
    for task in order {
        if let Some(pos) = remaining
            .iter()
            .position(|o| o.path() == task.path.as_path() && o.metric() == task.metric)
        {
            sorted.push(remaining.remove(pos));
        }
    }
    sorted.extend(remaining);
    sorted
}
