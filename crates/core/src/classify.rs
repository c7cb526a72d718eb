//! Retrieval-strategy classification.
//!
//! A message is classified into exactly one strategy: event lookup,
//! line-of-business lookup, or the generic domain fallback. Classification
//! is a pure function of the message, the caller's domain hint, and two
//! configuration values fixed at startup; it performs no I/O and never
//! fails.

/// Static per-domain keyword tables. Matching is lower-cased substring
/// matching, not tokenized: "cows" matches inside "cowsay". That looseness
/// is intentional, observed behavior.
const LOB_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "lob-agriculture",
        &[
            "crop rotation", "crop", "irrigation", "harvest", "livestock", "cows", "dairy",
            "greenhouse", "soil", "tractor", "silo",
        ],
    ),
    (
        "lob-healthcare",
        &[
            "patient", "clinic", "hospital", "ward", "nurse", "infusion", "telemetry unit",
            "hipaa", "operating room",
        ],
    ),
    (
        "lob-retail",
        &["store", "pos", "checkout", "aisle", "footfall", "shopper", "storefront", "kiosk"],
    ),
    (
        "lob-education",
        &["campus", "classroom", "student", "lecture", "dorm", "exam", "faculty"],
    ),
    (
        "lob-manufacturing",
        &["factory", "assembly line", "plant floor", "scada", "plc", "conveyor", "robot cell"],
    ),
    (
        "lob-hospitality",
        &["hotel", "guest room", "lobby", "concierge", "banquet", "housekeeping", "front desk"],
    ),
];

pub fn known_lob_domains() -> Vec<&'static str> {
    LOB_KEYWORDS.iter().map(|(domain, _)| *domain).collect()
}

pub fn lob_keywords(domain: &str) -> Option<&'static [&'static str]> {
    LOB_KEYWORDS
        .iter()
        .find(|(candidate, _)| *candidate == domain)
        .map(|(_, keywords)| *keywords)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClassificationResult {
    /// The message contains "event" (case-insensitive). Wins over LOB.
    Event,
    /// The effective domain is a known LOB key and at least one of its
    /// keywords occurs in the message.
    Lob { domain: String, matched_keywords: Vec<String> },
    /// Neither of the above. The flag comes verbatim from configuration,
    /// not from the query.
    DomainFallback { in_domain_only: bool },
}

impl ClassificationResult {
    /// The label surfaced in the chat response: "event", the LOB domain
    /// key, or "general".
    pub fn label(&self) -> &str {
        match self {
            Self::Event => "event",
            Self::Lob { domain, .. } => domain,
            Self::DomainFallback { .. } => "general",
        }
    }
}

#[derive(Clone, Debug)]
pub struct IntentClassifier {
    default_domain: String,
    in_domain_only: bool,
}

impl IntentClassifier {
    pub fn new(default_domain: impl Into<String>, in_domain_only: bool) -> Self {
        Self { default_domain: default_domain.into(), in_domain_only }
    }

    /// Classify one message. The event check has priority over LOB; an
    /// explicit non-empty hint overrides the configured default domain.
    pub fn classify(
        &self,
        message: &str,
        explicit_domain_hint: Option<&str>,
    ) -> ClassificationResult {
        let lowered = message.to_lowercase();

        if lowered.contains("event") {
            return ClassificationResult::Event;
        }

        let effective_domain = explicit_domain_hint
            .map(str::trim)
            .filter(|hint| !hint.is_empty())
            .unwrap_or(&self.default_domain);

        if let Some(keywords) = lob_keywords(effective_domain) {
            let matched_keywords: Vec<String> = keywords
                .iter()
                .filter(|keyword| lowered.contains(*keyword))
                .map(|keyword| (*keyword).to_string())
                .collect();
            if !matched_keywords.is_empty() {
                return ClassificationResult::Lob {
                    domain: effective_domain.to_string(),
                    matched_keywords,
                };
            }
        }

        ClassificationResult::DomainFallback { in_domain_only: self.in_domain_only }
    }
}
