// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::ValueEnum;

use chariot_wire::{FunctionInfo, JobState, ListenerInfo, ListenerStatus, LogLine, RuntimeInspection, WireValue};

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Format a millisecond epoch timestamp as relative time (e.g. "5s", "2m", "1h", "3d").
pub fn format_time_ago(epoch_ms: u64) -> String {
    if epoch_ms == 0 {
        return "-".to_string();
    }
    let now_ms = std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH).unwrap_or_default().as_millis() as u64;
    let elapsed_secs = now_ms.saturating_sub(epoch_ms) / 1000;
    match elapsed_secs {
        s if s < 60 => format!("{s}s"),
        s if s < 3600 => format!("{}m", s / 60),
        s if s < 86_400 => format!("{}h", s / 3600),
        s => format!("{}d", s / 86_400),
    }
}

fn wire_value_text(value: &WireValue) -> String {
    match value {
        WireValue::Integer(i) => i.to_string(),
        WireValue::Float(f) => f.to_string(),
        WireValue::Bool(b) => b.to_string(),
        WireValue::String(s) => s.clone(),
        WireValue::Null => "null".to_string(),
        WireValue::Array(_) | WireValue::Map(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

pub fn print_value(value: &WireValue, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => println!("{}", wire_value_text(value)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}

pub fn print_job_status(
    job_id: &str,
    state: JobState,
    value: Option<&WireValue>,
    error: Option<&str>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            println!("{} {:?}", crate::color::muted(job_id), state);
            if let Some(v) = value {
                println!("  = {}", wire_value_text(v));
            }
            if let Some(e) = error {
                println!("  ! {e}");
            }
        }
        OutputFormat::Json => {
            let obj = serde_json::json!({ "job_id": job_id, "state": state, "value": value, "error": error });
            println!("{}", serde_json::to_string_pretty(&obj)?);
        }
    }
    Ok(())
}

pub fn print_log_lines(lines: &[LogLine], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            for line in lines {
                println!("{:>6} {} {}", line.seq, line.level, line.message);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(lines)?),
    }
    Ok(())
}

pub fn print_function_names(names: &[String], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            if names.is_empty() {
                println!("No functions defined");
            } else {
                for name in names {
                    println!("{}", crate::color::literal(name));
                }
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(names)?),
    }
    Ok(())
}

pub fn print_function_detail(name: &str, params: &[String], body_source: &str, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            println!("{}({})", crate::color::header(name), params.join(", "));
            println!("{body_source}");
        }
        OutputFormat::Json => {
            let obj = serde_json::json!({ "name": name, "params": params, "body_source": body_source });
            println!("{}", serde_json::to_string_pretty(&obj)?);
        }
    }
    Ok(())
}

pub fn print_function_list(functions: &[FunctionInfo], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            if functions.is_empty() {
                println!("No functions defined");
            } else {
                for f in functions {
                    println!("{}({})", crate::color::literal(&f.name), f.params.join(", "));
                }
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(functions)?),
    }
    Ok(())
}

pub fn print_listeners(listeners: &[ListenerInfo], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            if listeners.is_empty() {
                println!("No listeners");
            } else {
                let name_width = listeners.iter().map(|l| l.name.len()).max().unwrap_or(0).max("NAME".len());
                println!("{:<name_width$} STATUS    AUTO-START LAST ACTIVE", "NAME");
                for l in listeners {
                    let status = match l.status {
                        ListenerStatus::Running => "running",
                        ListenerStatus::Stopped => "stopped",
                        ListenerStatus::Error => "error",
                    };
                    let last_active = l.last_active_ms.map(format_time_ago).unwrap_or_else(|| "-".to_string());
                    println!(
                        "{:<name_width$} {:<9} {:<10} {}",
                        crate::color::header(&l.name),
                        status,
                        l.auto_start,
                        crate::color::muted(&last_active)
                    );
                    if let Some(err) = &l.error {
                        println!("  ! {err}");
                    }
                }
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(listeners)?),
    }
    Ok(())
}

pub fn print_runtime_inspection(report: &RuntimeInspection, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            println!("variables: {}", report.variable_names.join(", "));
            println!("functions: {}", report.function_names.join(", "));
            println!("host objects: {}", report.host_object_names.join(", "));
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
    }
    Ok(())
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
