use crate::cloud::CloudStatus;
use crate::runner::types::{ItemUpdate, RunEvent, RunSummary, TestState};
use colored::{ColoredString, Colorize};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

/// 终端展示层：消费运行器事件并打印
pub struct TestReporter {
    verbose: bool,
}

impl TestReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// 持续消费事件，直到发送端全部关闭
    pub async fn consume(self, mut rx: UnboundedReceiver<RunEvent>) {
        while let Some(event) = rx.recv().await {
            self.handle(&event);
        }
    }

    pub fn handle(&self, event: &RunEvent) {
        match event {
            RunEvent::Started { run_id, total } => self.print_header(&run_id.to_string(), *total),
            RunEvent::ItemChanged(update) => self.print_item(update),
            RunEvent::Completed(summary) => self.print_summary(summary),
            RunEvent::Aborted { status, alert } => self.print_aborted(*status, *alert),
        }
    }

    /// 打印测试开始
    pub fn print_header(&self, run_id: &str, total: usize) {
        let short_id = run_id.get(..8).unwrap_or(run_id);
        println!("\nRunning {} checks (run {})...\n", total, short_id.bold());
    }

    /// 打印单项状态变化（进行中状态仅在 verbose 模式下显示）
    pub fn print_item(&self, update: &ItemUpdate) {
        if !update.state.is_terminal() && !self.verbose {
            return;
        }
        println!("{}", format_item_line(update));
    }

    pub fn print_aborted(&self, status: CloudStatus, alert: bool) {
        if alert {
            println!(
                " {}: A problem occurred while connecting to the cloud ({}). Please try again later.",
                "Connection issue".red().bold(),
                status
            );
        } else {
            println!(" {} ({})", "Connection handled by the session".dimmed(), status);
        }
        println!();
    }

    /// 打印测试摘要
    pub fn print_summary(&self, summary: &RunSummary) {
        println!("\n{}", "━".repeat(50));
        println!("{}", "Summary".bold());
        println!("{}", "━".repeat(50));

        if summary.failed == 0 {
            println!(
                "  {}: {} passed, {} total",
                "Checks".bold(),
                summary.passed.to_string().green(),
                summary.total
            );
        } else {
            println!(
                "  {}: {} passed, {} failed, {} total",
                "Checks".bold(),
                summary.passed.to_string().green(),
                summary.failed.to_string().red(),
                summary.total
            );
        }

        println!(
            "  {}: {:.3}s",
            "Duration".bold(),
            summary.total_duration.as_secs_f64()
        );
        println!(
            "  {}: {}",
            "Started".bold(),
            summary.started_at.format("%Y-%m-%d %H:%M:%S")
        );
        println!();
    }
}

impl Default for TestReporter {
    fn default() -> Self {
        Self::new(false)
    }
}

fn state_symbol(state: TestState) -> ColoredString {
    match state {
        TestState::Pending => "○".dimmed(),
        TestState::InProgress => "…".yellow(),
        TestState::Failed => "✗".red(),
        TestState::Partial => "◐".yellow(),
        TestState::Succeeded => "✓".green(),
    }
}

/// Seconds floored to a tenth, like `1.2s`.
pub fn format_seconds(duration: Duration) -> String {
    let tenths = (duration.as_secs_f64() * 10.0).floor() / 10.0;
    format!("{:.1}s", tenths)
}

/// `✓ [3] create folder 0.4s (0.5s)`; the value in parentheses is the average.
pub fn format_item_line(update: &ItemUpdate) -> String {
    let timing = if update.duration.is_zero() {
        String::new()
    } else {
        format!(
            " {} ({})",
            format_seconds(update.duration),
            format_seconds(update.average)
        )
    };
    format!(
        " {} [{}] {}{}",
        state_symbol(update.state),
        update.index + 1,
        update.name,
        timing
    )
}
