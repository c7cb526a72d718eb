use switchboard_core::classify::{ClassificationResult, IntentClassifier};
use switchboard_core::config::{AppConfig, LoadOptions};

pub fn run(message: &str, domain_hint: Option<&str>) -> String {
    let (default_domain, in_domain_only) = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => (config.chat.default_domain, config.chat.in_domain_only),
        Err(error) => return format!("config validation failed: {error}"),
    };

    let classifier = IntentClassifier::new(default_domain.clone(), in_domain_only);
    let classification = classifier.classify(message, domain_hint);

    render(&classification, &default_domain, domain_hint)
}

fn render(
    classification: &ClassificationResult,
    default_domain: &str,
    domain_hint: Option<&str>,
) -> String {
    let mut lines = vec![format!("label: {}", classification.label())];

    match classification {
        ClassificationResult::Event => {
            lines.push("strategy: event retrieval (event check wins over LOB)".to_string());
        }
        ClassificationResult::Lob { domain, matched_keywords } => {
            lines.push(format!("strategy: LOB retrieval ({domain})"));
            lines.push(format!("matched keywords: {}", matched_keywords.join(", ")));
        }
        ClassificationResult::DomainFallback { in_domain_only } => {
            lines.push("strategy: generic domain fallback".to_string());
            lines.push(format!("in_domain_only: {in_domain_only}"));
        }
    }

    let hint = domain_hint.filter(|hint| !hint.trim().is_empty());
    lines.push(match hint {
        Some(hint) => format!("effective domain source: hint ({hint})"),
        None => format!("effective domain source: default ({default_domain})"),
    });

    lines.join("\n")
}
