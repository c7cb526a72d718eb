use serde::{Deserialize, Serialize};

/// The four backend platforms a registered operation can belong to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformId {
    /// Enterprise location service (floor maps, occupancy, history exports).
    Spaces,
    /// SDN/fabric controller (device inventory, health, topology).
    Catalyst,
    /// Cloud-managed network platform (organizations, networks, devices).
    Meraki,
    /// Meetings platform (meetings, participants, recordings, workspaces).
    Webex,
}

impl PlatformId {
    pub const ALL: [PlatformId; 4] =
        [PlatformId::Spaces, PlatformId::Catalyst, PlatformId::Meraki, PlatformId::Webex];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Spaces => "spaces",
            Self::Catalyst => "catalyst",
            Self::Meraki => "meraki",
            Self::Webex => "webex",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Spaces => "Spaces",
            Self::Catalyst => "Catalyst Center",
            Self::Meraki => "Meraki",
            Self::Webex => "Webex",
        }
    }
}

impl std::fmt::Display for PlatformId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Per-platform enablement, derived once from configuration at startup and
/// immutable for the process lifetime. A disabled platform never raises;
/// dispatch against it produces a `Failure` envelope instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlatformGate {
    spaces: bool,
    catalyst: bool,
    meraki: bool,
    webex: bool,
}

impl PlatformGate {
    pub fn new(spaces: bool, catalyst: bool, meraki: bool, webex: bool) -> Self {
        Self { spaces, catalyst, meraki, webex }
    }

    pub fn all_enabled() -> Self {
        Self::new(true, true, true, true)
    }

    pub fn all_disabled() -> Self {
        Self::new(false, false, false, false)
    }

    pub fn is_enabled(&self, platform: PlatformId) -> bool {
        match platform {
            PlatformId::Spaces => self.spaces,
            PlatformId::Catalyst => self.catalyst,
            PlatformId::Meraki => self.meraki,
            PlatformId::Webex => self.webex,
        }
    }

    pub fn enabled_platforms(&self) -> Vec<PlatformId> {
        PlatformId::ALL.into_iter().filter(|platform| self.is_enabled(*platform)).collect()
    }
}

/// Platform names detected in a raw chat message by literal substring.
///
/// Detection is advisory input to the prompt builder's routing guidance and
/// to documentation retrieval; nothing downstream enforces it.
pub fn detect_platform_mentions(message: &str) -> Vec<PlatformId> {
    let lowered = message.to_lowercase();
    let mut mentions = Vec::new();

    if lowered.contains("meraki") {
        mentions.push(PlatformId::Meraki);
    }
    if lowered.contains("catalyst") || lowered.contains("dna center") || lowered.contains("dnac") {
        mentions.push(PlatformId::Catalyst);
    }
    if lowered.contains("spaces") {
        mentions.push(PlatformId::Spaces);
    }
    if lowered.contains("webex") {
        mentions.push(PlatformId::Webex);
    }

    mentions
}

#[cfg(test)]
mod tests {
    use super::{detect_platform_mentions, PlatformGate, PlatformId};

    #[test]
    fn gate_reports_each_platform_independently() {
        let gate = PlatformGate::new(true, false, true, false);
        assert!(gate.is_enabled(PlatformId::Spaces));
        assert!(!gate.is_enabled(PlatformId::Catalyst));
        assert!(gate.is_enabled(PlatformId::Meraki));
        assert!(!gate.is_enabled(PlatformId::Webex));
        assert_eq!(gate.enabled_platforms(), vec![PlatformId::Spaces, PlatformId::Meraki]);
    }

    #[test]
    fn mentions_are_detected_case_insensitively() {
        let mentions = detect_platform_mentions("Compare the Meraki org with DNA Center inventory");
        assert_eq!(mentions, vec![PlatformId::Meraki, PlatformId::Catalyst]);
    }

    #[test]
    fn no_mentions_for_plain_questions() {
        assert!(detect_platform_mentions("how many clients are on the guest network").is_empty());
    }
}
