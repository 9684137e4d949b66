//! Output formatting for CLI results

use anyhow::Result;
use colorful::Colorful;

use crate::detection::RecitationReport;

/// Format a report for terminal output
pub fn format_report(report: &RecitationReport, verbose: bool) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "  Sample Rate: {} Hz | Duration: {:.2}s | Profile: {}\n",
        report.sample_rate,
        report.duration_secs,
        report.profile.name()
    ));

    let madd = &report.madd;
    let madd_status = if madd.detected {
        "✓ DETECTED".green().to_string()
    } else {
        "✗ not detected".yellow().to_string()
    };
    output.push_str(&format!("  Madd:   {}\n", madd_status));
    output.push_str(&format!(
        "    Durations: [{}]\n",
        madd.durations
            .iter()
            .map(|d| format!("{:.3}", d))
            .collect::<Vec<_>>()
            .join(", ")
    ));
    if let Some(longest) = madd.longest_duration() {
        output.push_str(&format!("    Longest gap: {:.3}s\n", longest));
    }

    let ghunna = &report.ghunna;
    let ghunna_status = if ghunna.detected {
        "✓ DETECTED".green().to_string()
    } else {
        "✗ not detected".yellow().to_string()
    };
    output.push_str(&format!("  Ghunna: {}\n", ghunna_status));
    output.push_str(&format!(
        "    Variance: {:.2} | Threshold: ({:.2}, {:.2})\n",
        ghunna.variance, ghunna.threshold_band.0, ghunna.threshold_band.1
    ));

    if verbose {
        output.push_str("\n  Technical Details:\n");
        output.push_str(&format!(
            "    Energy frames: {} (frame {} / hop {} samples)\n",
            madd.energy.len(),
            madd.frame_params.frame_length,
            madd.frame_params.hop_length
        ));
        output.push_str(&format!(
            "    Peak height threshold: {:.4} | Peaks: {:?}\n",
            madd.threshold_height, madd.peaks
        ));
        output.push_str(&format!(
            "    Cepstral frames: {} | Mode: {}\n",
            ghunna.frames, ghunna.mode
        ));
    }

    output
}

/// Format reports as JSON: a single object for one report, an array otherwise
pub fn format_json(reports: &[RecitationReport]) -> Result<String> {
    let json = match reports {
        [single] => serde_json::to_string_pretty(single)?,
        _ => serde_json::to_string_pretty(reports)?,
    };
    Ok(json)
}

/// Summary line for a batch run
pub fn format_summary(reports: &[RecitationReport], failures: usize) -> String {
    let madd = reports.iter().filter(|r| r.madd.detected).count();
    let ghunna = reports.iter().filter(|r| r.ghunna.detected).count();
    let clean = reports.iter().filter(|r| !r.any_detected()).count();

    let mut output = format!(
        "\nSummary: {} file(s) analyzed, Madd in {}, Ghunna in {}, neither in {}\n",
        reports.len(),
        madd,
        ghunna,
        clean
    );
    if failures > 0 {
        output.push_str(&format!("  {}\n", format!("{} file(s) failed", failures).red()));
    }
    output
}
