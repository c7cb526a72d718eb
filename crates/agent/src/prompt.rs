//! Phase-1 prompt assembly.
//!
//! One of three system templates is selected from the classification, the
//! user's question is embedded in a fixed template, and a synthesized
//! platform-routing guidance message is prepended whenever the message
//! mentions a device platform by name. Guidance is advisory text for the
//! model; the dispatcher never enforces it.

use switchboard_core::classify::ClassificationResult;
use switchboard_core::platform::{PlatformGate, PlatformId};

use crate::llm::ChatMessage;
use crate::retrieval::RetrievedDocs;

const EVENT_SYSTEM_PROMPT: &str = "You are a network operations assistant answering questions \
about scheduled events at the venue. Prefer the retrieved event context below; call a catalog \
function only when live platform data is required.";

const LOB_SYSTEM_PROMPT: &str = "You are a network operations assistant for the {domain} line \
of business. Ground your answer in the retrieved context below and in the catalog functions \
when live platform data is needed.";

const GENERAL_SYSTEM_PROMPT: &str = "You are a network operations assistant. Answer from the \
retrieved documentation context below, or call one catalog function when the question needs \
live data from a network platform.";

const IN_DOMAIN_ONLY_SUFFIX: &str = " Answer strictly from the provided context; if the context \
does not cover the question, say so instead of guessing.";

const USER_TEMPLATE: &str = "Answer the following question from the user:\n\n{message}";

pub struct PromptBuilder;

impl PromptBuilder {
    /// Assemble the ordered phase-1 message sequence:
    /// `[routing guidance?, system template, user message]`.
    pub fn build(
        classification: &ClassificationResult,
        docs: &RetrievedDocs,
        platform_mentions: &[PlatformId],
        gate: &PlatformGate,
        message: &str,
    ) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(3);

        if let Some(guidance) = routing_guidance(platform_mentions, gate) {
            messages.push(ChatMessage::system(guidance));
        }

        messages.push(ChatMessage::system(system_prompt(classification, docs)));
        messages.push(ChatMessage::user(USER_TEMPLATE.replace("{message}", message)));
        messages
    }
}

fn system_prompt(classification: &ClassificationResult, docs: &RetrievedDocs) -> String {
    let template = match classification {
        ClassificationResult::Event => EVENT_SYSTEM_PROMPT.to_string(),
        ClassificationResult::Lob { domain, .. } => LOB_SYSTEM_PROMPT.replace("{domain}", domain),
        ClassificationResult::DomainFallback { in_domain_only } => {
            let mut prompt = GENERAL_SYSTEM_PROMPT.to_string();
            if *in_domain_only {
                prompt.push_str(IN_DOMAIN_ONLY_SUFFIX);
            }
            prompt
        }
    };

    if docs.is_empty() {
        template
    } else {
        format!("{template}\n\nContext:\n{}", docs.render())
    }
}

/// The four routing-guidance cases, crossing device-platform mentions with
/// gate state. Mentions of other platforms carry no guidance.
fn routing_guidance(mentions: &[PlatformId], gate: &PlatformGate) -> Option<String> {
    let device_platforms = [PlatformId::Meraki, PlatformId::Catalyst];
    let mentioned: Vec<PlatformId> = device_platforms
        .into_iter()
        .filter(|platform| mentions.contains(platform))
        .collect();

    if !mentioned.is_empty() {
        let lines: Vec<String> = mentioned
            .iter()
            .map(|platform| {
                if gate.is_enabled(*platform) {
                    format!(
                        "The user asked about {platform}; use only {platform} functions for \
                         device questions."
                    )
                } else {
                    format!(
                        "The user asked about {platform}, but the {platform} integration is \
                         disabled; fall back to documentation context and report the \
                         integration as unavailable."
                    )
                }
            })
            .collect();
        return Some(lines.join(" "));
    }

    let meraki = gate.is_enabled(PlatformId::Meraki);
    let catalyst = gate.is_enabled(PlatformId::Catalyst);
    if meraki && catalyst {
        return Some(
            "Either Meraki or Catalyst Center functions may be used to answer device questions."
                .to_string(),
        );
    }
    if !meraki && !catalyst {
        return Some(
            "No device platform integration is enabled; answer from the provided documentation \
             context only."
                .to_string(),
        );
    }

    None
}

#[cfg(test)]
mod tests {
    use switchboard_core::classify::ClassificationResult;
    use switchboard_core::platform::{PlatformGate, PlatformId};

    use super::PromptBuilder;
    use crate::llm::ChatRole;
    use crate::retrieval::{DomainSnippet, EventSnippet, RetrievedDocs};

    fn no_docs() -> RetrievedDocs {
        RetrievedDocs::Domain(Vec::new())
    }

    #[test]
    fn guidance_precedes_the_selected_system_prompt() {
        let messages = PromptBuilder::build(
            &ClassificationResult::Event,
            &no_docs(),
            &[PlatformId::Meraki],
            &PlatformGate::all_enabled(),
            "list meraki events",
        );

        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].role, ChatRole::System);
        assert!(messages[0].content.contains("use only Meraki functions"));
        assert!(messages[1].content.starts_with("You are a network operations assistant"));
        assert_eq!(messages[2].role, ChatRole::User);
        assert!(messages[2].content.contains("list meraki events"));
    }

    #[test]
    fn mentioned_but_disabled_platform_gets_fallback_guidance() {
        let gate = PlatformGate::new(false, true, false, false);
        let messages = PromptBuilder::build(
            &ClassificationResult::DomainFallback { in_domain_only: false },
            &no_docs(),
            &[PlatformId::Meraki],
            &gate,
            "show meraki switches",
        );

        assert!(messages[0].content.contains("Meraki integration is disabled"));
        assert!(messages[0].content.contains("report the integration as unavailable"));
    }

    #[test]
    fn no_mention_with_both_device_platforms_enabled_allows_either() {
        let messages = PromptBuilder::build(
            &ClassificationResult::DomainFallback { in_domain_only: false },
            &no_docs(),
            &[],
            &PlatformGate::all_enabled(),
            "how many switches do we have",
        );

        assert!(messages[0].content.contains("Either Meraki or Catalyst Center"));
    }

    #[test]
    fn no_mention_with_no_device_platform_enabled_restricts_to_docs() {
        let messages = PromptBuilder::build(
            &ClassificationResult::DomainFallback { in_domain_only: false },
            &no_docs(),
            &[],
            &PlatformGate::all_disabled(),
            "how many switches do we have",
        );

        assert!(messages[0].content.contains("No device platform integration is enabled"));
    }

    #[test]
    fn single_enabled_platform_without_mention_emits_no_guidance() {
        let gate = PlatformGate::new(false, false, true, false);
        let messages = PromptBuilder::build(
            &ClassificationResult::DomainFallback { in_domain_only: false },
            &no_docs(),
            &[],
            &gate,
            "how many switches do we have",
        );

        // Only the four defined guidance cases produce a message.
        assert_eq!(messages.len(), 2);
        assert!(messages[0].content.starts_with("You are a network operations assistant"));
    }

    #[test]
    fn lob_template_names_the_domain() {
        let classification = ClassificationResult::Lob {
            domain: "lob-agriculture".to_string(),
            matched_keywords: vec!["crop".to_string()],
        };
        let messages = PromptBuilder::build(
            &classification,
            &no_docs(),
            &[],
            &PlatformGate::all_disabled(),
            "crop sensors",
        );

        let system = messages.iter().find(|m| m.content.contains("line of business"));
        assert!(system.expect("lob template selected").content.contains("lob-agriculture"));
    }

    #[test]
    fn in_domain_only_fallback_restricts_the_answer() {
        let messages = PromptBuilder::build(
            &ClassificationResult::DomainFallback { in_domain_only: true },
            &no_docs(),
            &[],
            &PlatformGate::all_enabled(),
            "anything",
        );

        assert!(messages[1].content.contains("strictly from the provided context"));
    }

    #[test]
    fn retrieved_context_is_embedded_in_ranking_order() {
        let docs = RetrievedDocs::Event(vec![
            EventSnippet { content: "keynote at 9am".to_string(), additional_info: None },
            EventSnippet { content: "expo floor opens at 10".to_string(), additional_info: None },
        ]);
        let messages = PromptBuilder::build(
            &ClassificationResult::Event,
            &docs,
            &[],
            &PlatformGate::all_enabled(),
            "what events are on",
        );

        let system = &messages[1].content;
        let keynote = system.find("keynote").expect("first snippet embedded");
        let expo = system.find("expo floor").expect("second snippet embedded");
        assert!(keynote < expo);
    }

    #[test]
    fn non_empty_docs_always_render_a_context_block() {
        let messages = PromptBuilder::build(
            &ClassificationResult::DomainFallback { in_domain_only: false },
            &RetrievedDocs::Domain(vec![DomainSnippet {
                content: String::new(),
                platform: None,
            }]),
            &[],
            &PlatformGate::all_enabled(),
            "q",
        );
        // A non-empty docs list still renders, even with empty content.
        assert!(messages[1].content.contains("Context:"));
    }
}
