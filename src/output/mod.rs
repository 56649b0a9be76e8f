use crate::controller::{ApplyReport, CurrentProfile};
use colored::Colorize;

/// One name per line, as `list` has always printed them.
pub fn print_names(names: &[String]) {
    for name in names {
        println!("{}", name);
    }
}

pub fn print_names_json(names: &[String]) {
    println!("{}", serde_json::json!(names));
}

/// Confirmations go to stdout, refusals to stderr, in call order.
pub fn print_apply_report(report: &ApplyReport) {
    for outcome in &report.fields {
        match outcome.error_message() {
            None => println!(
                "Successfully set {} to {}",
                outcome.field.name(),
                outcome.value.to_string().green()
            ),
            Some(msg) => eprintln!("{} {}", "!".red(), msg),
        }
    }

    match report.mode_error_message() {
        None => println!("Successfully enable {}", report.mode.to_string().green()),
        Some(msg) => eprintln!("{} {}", "!".red(), msg),
    }

    let failures = report.failure_count();
    if failures > 0 {
        eprintln!(
            "{}",
            format!(
                "{} of {} settings were not applied for profile {}",
                failures,
                report.fields.len() + 1,
                report.profile
            )
            .yellow()
        );
    }
}

pub fn print_apply_json(report: &ApplyReport) {
    let output = serde_json::json!({
        "profile": report.profile,
        "fields": report.fields.iter().map(|f| serde_json::json!({
            "field": f.field,
            "value": f.value,
            "status": f.status,
            "error": f.error_message(),
        })).collect::<Vec<_>>(),
        "mode": report.mode,
        "mode_status": report.mode_status,
        "failures": report.failure_count(),
    });
    println!("{:#}", output);
}

/// Prints only the profile name; live values show up with `--verbose`.
pub fn print_current(current: &CurrentProfile, verbose: bool) {
    println!("{}", current.profile);
    if !verbose {
        return;
    }
    for (field, value) in &current.values {
        eprintln!("  {:<16} {}", field.key().dimmed(), value);
    }
}

pub fn print_current_json(current: &CurrentProfile) {
    let values: serde_json::Map<String, serde_json::Value> = current
        .values
        .iter()
        .map(|(field, value)| (field.key().to_string(), serde_json::json!(value)))
        .collect();
    let output = serde_json::json!({
        "profile": current.profile,
        "system_default": current.is_system_default(),
        "values": values,
    });
    println!("{:#}", output);
}
