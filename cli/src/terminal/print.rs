use colored::*;
use hecert_core::dispatcher::{BranchOutcome, DispatchReport};
use tracing::info;

pub const PRINT_TARGET: &str = "hecert::print";
pub const TOTAL_WIDTH: usize = 64;

pub fn print(msg: &str) {
    info!(target: PRINT_TARGET, "{}", msg);
}

pub fn banner() {
    let text: String = format!("⟦ HECERT v{} ⟧", env!("CARGO_PKG_VERSION"));
    let side: usize = TOTAL_WIDTH.saturating_sub(text.chars().count()) / 2;
    let sep: ColoredString = "═".repeat(side).bright_black();

    print(&format!("{}{}{}", sep, text.bright_green().bold(), sep));
}

pub fn header(msg: &str) {
    let formatted: String = format!("⟦ {} ⟧", msg);
    let msg_len: usize = formatted.chars().count();

    let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    let line: ColoredString = format!(
        "{}{}{}",
        "─".repeat(left),
        formatted.to_uppercase().bright_green(),
        "─".repeat(right)
    )
    .bright_black();

    print(&format!("{}", line));
}

pub fn fat_separator() {
    let sep: ColoredString = "═".repeat(TOTAL_WIDTH).bright_black();
    print(&format!("{}", sep));
}

pub fn summary(report: &DispatchReport) {
    header("summary");
    for (i, branch) in report.branches.iter().enumerate() {
        let last: bool = i + 1 == report.branches.len();
        let tree: ColoredString = if last { "└─".bright_black() } else { "├─".bright_black() };
        let outcome: ColoredString = match &branch.outcome {
            BranchOutcome::Submitted => "submitted".green().bold(),
            BranchOutcome::DryRun => "dry run".yellow(),
            BranchOutcome::CommandFailed(_) => "command failed".red().bold(),
            BranchOutcome::SubmissionFailed(_) => "submission failed".red().bold(),
        };
        print(&format!(" {} {:<12}: {}", tree, branch.test, outcome));
    }

    fat_separator();
    let total: usize = report.branches.len();
    let done: ColoredString = format!("{}/{}", report.submitted() + report.dry_runs(), total)
        .bold()
        .green();
    print(&format!("Daily tests complete: {} went through, {} failed", done, report.failed()));
}
