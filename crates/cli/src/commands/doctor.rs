use serde::Serialize;
use switchboard_core::catalog::{build_registry, standing_warnings};
use switchboard_core::config::{AppConfig, LoadOptions};

use crate::commands::CommandResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> CommandResult {
    let report = build_report();
    let exit_code = if report.overall_status == CheckStatus::Pass { 0 } else { 1 };

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        })
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_registry());
            checks.push(check_platform_gate(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(DoctorCheck {
                name: "registry_construction",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
            checks.push(DoctorCheck {
                name: "platform_gate",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_registry() -> DoctorCheck {
    match build_registry() {
        Ok(registry) => {
            let orphaned: Vec<String> = standing_warnings()
                .keys()
                .filter(|name| registry.lookup(name).is_none())
                .cloned()
                .collect();
            if orphaned.is_empty() {
                DoctorCheck {
                    name: "registry_construction",
                    status: CheckStatus::Pass,
                    details: format!("{} operations registered and validated", registry.len()),
                }
            } else {
                DoctorCheck {
                    name: "registry_construction",
                    status: CheckStatus::Fail,
                    details: format!(
                        "warning table references unregistered functions: {}",
                        orphaned.join(", ")
                    ),
                }
            }
        }
        Err(error) => DoctorCheck {
            name: "registry_construction",
            status: CheckStatus::Fail,
            details: error.to_string(),
        },
    }
}

fn check_platform_gate(config: &AppConfig) -> DoctorCheck {
    let gate = config.platform_gate();
    let enabled = gate.enabled_platforms();

    if enabled.is_empty() {
        DoctorCheck {
            name: "platform_gate",
            status: CheckStatus::Pass,
            details: "no platform enabled; every dispatch will report the integration as disabled"
                .to_string(),
        }
    } else {
        let names: Vec<&str> = enabled.iter().map(|platform| platform.key()).collect();
        DoctorCheck {
            name: "platform_gate",
            status: CheckStatus::Pass,
            details: format!("enabled platforms: {}", names.join(", ")),
        }
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
