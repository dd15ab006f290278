//! Device statistics report with colored console output

use colored::*;
use crate::headless_device::DeviceStats;

/// Multi-line report of `stats`, colored when the terminal allows it
pub fn device_stats_report(stats: &DeviceStats) -> String {
    let mut report = format!("{}\n", "=== Headless Device Report ===".bright_blue().bold());
    report += &format!("  {} {}\n", "Frames:".white().bold(), stats.frames);
    report += &format!("  {} {}\n", "Draw calls:".green(), stats.draw_calls);
    if stats.gizmo_lines > 0 {
        report += &format!("  {} {}\n", "Gizmo lines:".cyan(), stats.gizmo_lines);
    }
    report += &format!(
        "  {} {} created, {} destroyed, {} updated in place\n",
        "Objects:".white().bold(),
        stats.objects_created,
        stats.objects_destroyed,
        stats.objects_updated
    );
    let live = stats.live_objects();
    if live > 0 {
        report += &format!("  {} {}\n", "Live objects:".yellow().bold(), live);
    } else {
        report += &format!("  {}\n", "No live objects".green());
    }
    report += &format!("  {} {}\n", "Bytes uploaded:".bright_black(), stats.bytes_uploaded);
    report += &format!("{}", "==============================".bright_blue().bold());
    report
}

pub fn print_device_stats_report(stats: &DeviceStats) {
    println!("\n{}\n", device_stats_report(stats));
}
