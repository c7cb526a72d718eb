use switchboard_core::catalog::{build_registry, standing_warnings};
use switchboard_core::platform::PlatformId;
use switchboard_core::registry::FunctionSpec;

use crate::commands::CommandResult;

pub fn run(platform_filter: Option<&str>) -> CommandResult {
    let registry = match build_registry() {
        Ok(registry) => registry,
        Err(error) => {
            return CommandResult::failure("catalog", "registry", error.to_string(), 1);
        }
    };

    let platform = match platform_filter {
        None => None,
        Some(raw) => match parse_platform(raw) {
            Some(platform) => Some(platform),
            None => {
                return CommandResult::failure(
                    "catalog",
                    "unknown_platform",
                    format!("unknown platform `{raw}` (expected spaces|catalyst|meraki|webex)"),
                    2,
                );
            }
        },
    };

    let warnings = standing_warnings();
    let mut lines = Vec::new();
    let mut listed = 0usize;

    for spec in registry.all() {
        if platform.is_some_and(|wanted| spec.platform != wanted) {
            continue;
        }
        listed += 1;
        lines.push(render_spec(spec, warnings.contains_key(&spec.name)));
    }

    let scope = platform.map(|p| p.key().to_string()).unwrap_or_else(|| "all platforms".to_string());
    lines.push(format!("{listed} operations registered ({scope})"));

    CommandResult { exit_code: 0, output: lines.join("\n") }
}

fn parse_platform(raw: &str) -> Option<PlatformId> {
    PlatformId::ALL.into_iter().find(|platform| platform.key() == raw.trim().to_lowercase())
}

fn render_spec(spec: &FunctionSpec, has_warning: bool) -> String {
    let required = if spec.required.is_empty() {
        "none".to_string()
    } else {
        spec.required.join(", ")
    };
    let marker = if has_warning { " [advisory]" } else { "" };
    format!(
        "- {} [{}] {} {} (required: {required}){marker}",
        spec.name,
        spec.platform.key(),
        spec.binding.method.as_str(),
        spec.binding.path,
    )
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn full_listing_includes_every_platform() {
        let result = run(None);
        assert_eq!(result.exit_code, 0);
        assert!(result.output.contains("list_all_switches_in_org"));
        assert!(result.output.contains("get_all_catalyst_devices"));
        assert!(result.output.contains("get_floor_image"));
        assert!(result.output.contains("list_meetings"));
    }

    #[test]
    fn platform_filter_restricts_the_listing() {
        let result = run(Some("webex"));
        assert_eq!(result.exit_code, 0);
        assert!(result.output.contains("list_meetings"));
        assert!(!result.output.contains("get_all_catalyst_devices"));
    }

    #[test]
    fn advisory_operations_are_marked() {
        let result = run(Some("meraki"));
        let line = result
            .output
            .lines()
            .find(|line| line.contains("get_all_access_points"))
            .expect("operation listed");
        assert!(line.contains("[advisory]"));
    }

    #[test]
    fn unknown_platform_is_rejected() {
        let result = run(Some("campus"));
        assert_eq!(result.exit_code, 2);
        assert!(result.output.contains("unknown platform"));
    }
}
