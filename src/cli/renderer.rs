use colored::{control, ColoredString, Colorize};

use crate::core::formatter::{format_amount, format_change, format_money, format_size_gb, pluralize};
use crate::core::models::findings::{SnapshotSummary, VolumeSavings};
use crate::core::models::table::EntityCostTable;
use crate::core::report::OptimizationReport;

/// Render a full optimization report as a colored (or plain) string.
///
/// Layout:
/// ```text
///  Acme Corp (client 12345)
///
///  Costs from Past Three Months
///   Service Items      05-2024    06-2024    07-2024  Monthly % Change
///   EC2 - Direct     1,000.00   1,100.00   1,210.00            +10.00%
///   ...
///
///  Snapshot Information
///   3 snapshots
///   Average Age: 20 days
///   ...
/// ```
pub fn render_report(report: &OptimizationReport, use_color: bool) -> String {
    control::set_override(use_color);

    let mut sections: Vec<Vec<String>> = Vec::new();

    sections.push(vec![format!(" {} (client {})", report.customer, report.client_id)
        .bold()
        .to_string()]);

    let mut services = vec![heading("Costs from Past Three Months")];
    services.extend(render_table(&report.service_costs, "Service Items"));
    sections.push(services);

    let mut ec2 = vec![heading("EC2 NFU Coverage")];
    ec2.extend(render_table(&report.ec2_coverage, "Coverage Type"));
    sections.push(ec2);

    let mut ratio = vec![heading("EC2 On Demand Percentage by NFU")];
    ratio.extend(render_table(&report.on_demand_ratio, ""));
    sections.push(ratio);

    let mut s3 = vec![
        heading("S3 Bucket Costs"),
        format!(
            "  {} {}",
            "Total number of buckets:".cyan(),
            report.s3_bucket_count
        ),
    ];
    if !report.s3_buckets.is_empty() {
        s3.extend(render_table(&report.s3_buckets, "Bucket"));
    }
    sections.push(s3);

    sections.push(render_snapshots(
        report.snapshots.as_ref(),
        report.policy.snapshot_cutoff_year,
    ));

    sections.push(render_volumes(
        "GP2 Volume Information",
        &[
            (
                format!(
                    "Number of attached gp2 volumes under {}:",
                    format_size_gb(report.policy.gp2_size_threshold_gb)
                ),
                report.gp2_savings.count.to_string(),
            ),
            (
                "Monthly savings by converting to gp3:".to_string(),
                format_money(report.gp2_savings.savings_estimate),
            ),
        ],
        "Largest GP2 Volume:",
        &report.gp2_savings,
    ));

    sections.push(render_volumes(
        "Unattached Volume Information",
        &[
            (
                "Number of unattached volumes:".to_string(),
                report.unattached_savings.count.to_string(),
            ),
            (
                "Monthly savings by deleting volumes:".to_string(),
                format_money(report.unattached_savings.savings_estimate),
            ),
        ],
        "Largest Unattached Volume:",
        &report.unattached_savings,
    ));

    sections
        .iter()
        .map(|lines| lines.join("\n"))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn heading(title: &str) -> String {
    format!(" {}", title.bold())
}

/// Render a table with right-aligned numeric columns.
///
/// Widths are computed on plain text before coloring so ANSI codes don't skew alignment.
pub fn render_table(table: &EntityCostTable, label_header: &str) -> Vec<String> {
    let headers = table.columns();
    let body: Vec<(String, Vec<String>, Option<f64>)> = table
        .rows
        .iter()
        .map(|row| {
            let mut cells: Vec<String> = row.values.iter().map(|v| format_amount(*v)).collect();
            cells.push(format_change(row.monthly_change));
            (row.label.clone(), cells, row.monthly_change)
        })
        .collect();

    let label_width = body
        .iter()
        .map(|(label, _, _)| label.chars().count())
        .chain(std::iter::once(label_header.chars().count()))
        .max()
        .unwrap_or(0);
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            body.iter()
                .map(|(_, cells, _)| cells[i].chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut lines = Vec::with_capacity(body.len() + 1);
    let header_cells: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| format!("{:>w$}", h, w = w))
        .collect();
    lines.push(format!(
        "  {}  {}",
        format!("{:<w$}", label_header, w = label_width).cyan(),
        header_cells.join("  ").cyan()
    ));

    for (label, cells, change) in &body {
        let last = cells.len() - 1;
        let rendered: Vec<String> = cells
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (cell, w))| {
                let padded = format!("{:>w$}", cell, w = w);
                if i == last {
                    color_change(*change, &padded).to_string()
                } else {
                    padded
                }
            })
            .collect();
        lines.push(format!(
            "  {:<w$}  {}",
            label,
            rendered.join("  "),
            w = label_width
        ));
    }
    lines
}

/// Cost growth is bad news: red for increases, green for decreases.
fn color_change(change: Option<f64>, text: &str) -> ColoredString {
    match change {
        Some(c) if c > 0.0 => text.red(),
        Some(c) if c < 0.0 => text.green(),
        Some(_) => text.normal(),
        None => text.dimmed(),
    }
}

fn render_snapshots(summary: Option<&SnapshotSummary>, cutoff_year: i32) -> Vec<String> {
    let mut lines = vec![heading("Snapshot Information")];
    let Some(s) = summary else {
        lines.push("  No active snapshots".dimmed().to_string());
        return lines;
    };
    lines.push(format!("  {}", pluralize(s.total, "snapshot")));
    lines.push(format!(
        "  {} {} days",
        "Average Age:".cyan(),
        s.average_age_days
    ));
    let stale = format!(
        "{}% created before {} ({})",
        s.before_cutoff_percent,
        cutoff_year,
        pluralize(s.before_cutoff_count, "snapshot")
    );
    lines.push(format!(
        "  {}",
        if s.before_cutoff_count > 0 {
            stale.yellow()
        } else {
            stale.normal()
        }
    ));
    lines.push(format!(
        "  {} {}",
        "Oldest Snapshot:".cyan(),
        s.oldest_snapshot_date
    ));
    lines.push(format!(
        "  {} {}",
        "Largest Snapshot:".cyan(),
        format_size_gb(s.largest_size_gb)
    ));
    lines
}

fn render_volumes(
    title: &str,
    facts: &[(String, String)],
    largest_label: &str,
    savings: &VolumeSavings,
) -> Vec<String> {
    let mut lines = vec![heading(title)];
    for (label, value) in facts {
        lines.push(format!("  {} {}", label.cyan(), value));
    }
    lines.push(format!(
        "  {} {}",
        largest_label.cyan(),
        format_size_gb(savings.largest_size_gb)
    ));
    lines
}
