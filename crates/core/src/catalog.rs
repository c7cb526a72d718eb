//! Data-driven operation catalog.
//!
//! One row per callable operation; rows are compiled into the validated
//! [`FunctionRegistry`] at startup. Platform membership is a property of the
//! row, not of any dispatch path, and the standing per-function advisory
//! table lives alongside the rows as an immutable map.

use std::collections::HashMap;

use crate::platform::PlatformId;
use crate::registry::{
    FunctionRegistry, FunctionSpec, ParamKind, ParamSpec, RegistryError, RestBinding, RestMethod,
};

use ParamKind::{Boolean, Number, String as Str};
use PlatformId::{Catalyst, Meraki, Spaces, Webex};
use RestMethod::Get;

fn op(
    platform: PlatformId,
    name: &str,
    description: &str,
    method: RestMethod,
    path: &str,
    params: &[(&str, ParamKind, &str)],
    required: &[&str],
) -> FunctionSpec {
    FunctionSpec {
        name: name.to_string(),
        description: description.to_string(),
        platform,
        binding: RestBinding { method, path: path.to_string() },
        parameters: params
            .iter()
            .map(|(param_name, kind, param_description)| ParamSpec {
                name: (*param_name).to_string(),
                kind: *kind,
                description: (*param_description).to_string(),
            })
            .collect(),
        required: required.iter().map(|param| (*param).to_string()).collect(),
        binary_payload: false,
    }
}

fn binary_op(
    platform: PlatformId,
    name: &str,
    description: &str,
    path: &str,
    params: &[(&str, ParamKind, &str)],
    required: &[&str],
) -> FunctionSpec {
    let mut spec = op(platform, name, description, Get, path, params, required);
    spec.parameters.push(ParamSpec {
        name: "save_path".to_string(),
        kind: Str,
        description: "Optional local file path; when present the raw payload is saved there"
            .to_string(),
    });
    spec.binary_payload = true;
    spec
}

const ORG: (&str, ParamKind, &str) =
    ("organization_id", Str, "Organization id; defaults to the configured organization");
const NETWORK: (&str, ParamKind, &str) = ("network_id", Str, "Network id");
const SERIAL: (&str, ParamKind, &str) = ("serial", Str, "Device serial number");
const TIMESPAN: (&str, ParamKind, &str) =
    ("timespan", Number, "Lookback window in seconds for the report");
const DEVICE_ID: (&str, ParamKind, &str) = ("device_id", Str, "Controller device uuid");

fn meraki_ops() -> Vec<FunctionSpec> {
    vec![
        op(Meraki, "get_all_organizations", "List every organization the API key can see", Get,
            "/api/v1/organizations", &[], &[]),
        op(Meraki, "get_organization", "Get one organization's details", Get,
            "/api/v1/organizations/{organization_id}", &[ORG], &[]),
        op(Meraki, "get_networks_in_org", "List all networks in an organization", Get,
            "/api/v1/organizations/{organization_id}/networks", &[ORG], &[]),
        op(Meraki, "get_network", "Get one network's details", Get,
            "/api/v1/networks/{network_id}", &[NETWORK], &["network_id"]),
        op(Meraki, "get_all_devices_in_org", "List every device in an organization", Get,
            "/api/v1/organizations/{organization_id}/devices", &[ORG], &[]),
        op(Meraki, "list_all_switches_in_org", "List all switches in an organization", Get,
            "/api/v1/organizations/{organization_id}/devices?productTypes=switch", &[ORG], &[]),
        op(Meraki, "get_all_access_points", "List all wireless access points in an organization",
            Get, "/api/v1/organizations/{organization_id}/devices?productTypes=wireless",
            &[ORG], &[]),
        op(Meraki, "get_device", "Get one device by serial number", Get,
            "/api/v1/devices/{serial}", &[SERIAL], &["serial"]),
        op(Meraki, "get_device_statuses", "List status of every device in an organization", Get,
            "/api/v1/organizations/{organization_id}/devices/statuses", &[ORG], &[]),
        op(Meraki, "get_org_inventory", "List the organization's device inventory", Get,
            "/api/v1/organizations/{organization_id}/inventoryDevices", &[ORG], &[]),
        op(Meraki, "get_org_admins", "List the organization's dashboard administrators", Get,
            "/api/v1/organizations/{organization_id}/admins", &[ORG], &[]),
        op(Meraki, "get_org_license_overview", "Summarize the organization's license state", Get,
            "/api/v1/organizations/{organization_id}/licenses/overview", &[ORG], &[]),
        op(Meraki, "get_org_uplinks_statuses", "List uplink status for every appliance", Get,
            "/api/v1/organizations/{organization_id}/uplinks/statuses", &[ORG], &[]),
        op(Meraki, "get_org_api_requests", "List recent dashboard API requests", Get,
            "/api/v1/organizations/{organization_id}/apiRequests", &[ORG, TIMESPAN], &[]),
        op(Meraki, "get_network_clients", "List clients seen on a network", Get,
            "/api/v1/networks/{network_id}/clients", &[NETWORK, TIMESPAN], &["network_id"]),
        op(Meraki, "get_client_details", "Get one client on a network", Get,
            "/api/v1/networks/{network_id}/clients/{client_id}",
            &[NETWORK, ("client_id", Str, "Client id or MAC address")],
            &["network_id", "client_id"]),
        op(Meraki, "get_client_usage", "Get a client's usage history", Get,
            "/api/v1/networks/{network_id}/clients/{client_id}/usageHistory",
            &[NETWORK, ("client_id", Str, "Client id or MAC address")],
            &["network_id", "client_id"]),
        op(Meraki, "get_network_traffic", "Get traffic analysis for a network", Get,
            "/api/v1/networks/{network_id}/traffic", &[NETWORK, TIMESPAN], &["network_id"]),
        op(Meraki, "get_network_events", "List recent events on a network", Get,
            "/api/v1/networks/{network_id}/events",
            &[NETWORK, ("product_type", Str, "Filter events to one product type")],
            &["network_id"]),
        op(Meraki, "get_network_alerts_history", "List alert history for a network", Get,
            "/api/v1/networks/{network_id}/alerts/history", &[NETWORK], &["network_id"]),
        op(Meraki, "get_firmware_upgrades", "Get firmware upgrade state for a network", Get,
            "/api/v1/networks/{network_id}/firmwareUpgrades", &[NETWORK], &["network_id"]),
        op(Meraki, "get_ssids", "List wireless SSIDs configured on a network", Get,
            "/api/v1/networks/{network_id}/wireless/ssids", &[NETWORK], &["network_id"]),
        op(Meraki, "get_ssid_details", "Get one SSID by number", Get,
            "/api/v1/networks/{network_id}/wireless/ssids/{number}",
            &[NETWORK, ("number", Number, "SSID number")], &["network_id", "number"]),
        op(Meraki, "get_wireless_connection_stats", "Aggregate wireless connection stats", Get,
            "/api/v1/networks/{network_id}/wireless/connectionStats", &[NETWORK, TIMESPAN],
            &["network_id"]),
        op(Meraki, "get_wireless_latency_stats", "Aggregate wireless latency stats", Get,
            "/api/v1/networks/{network_id}/wireless/latencyStats", &[NETWORK, TIMESPAN],
            &["network_id"]),
        op(Meraki, "get_switch_ports", "List a switch's port configuration", Get,
            "/api/v1/devices/{serial}/switch/ports", &[SERIAL], &["serial"]),
        op(Meraki, "get_switch_port_statuses", "List live status of a switch's ports", Get,
            "/api/v1/devices/{serial}/switch/ports/statuses", &[SERIAL, TIMESPAN], &["serial"]),
        op(Meraki, "get_switch_routing_interfaces", "List a switch's layer-3 interfaces", Get,
            "/api/v1/devices/{serial}/switch/routing/interfaces", &[SERIAL], &["serial"]),
        op(Meraki, "get_vlans", "List appliance VLANs on a network", Get,
            "/api/v1/networks/{network_id}/appliance/vlans", &[NETWORK], &["network_id"]),
        op(Meraki, "get_appliance_vpn_statuses", "List site-to-site VPN status per appliance",
            Get, "/api/v1/organizations/{organization_id}/appliance/vpn/statuses", &[ORG], &[]),
        op(Meraki, "get_security_events", "List security events for an organization", Get,
            "/api/v1/organizations/{organization_id}/appliance/security/events",
            &[ORG, TIMESPAN], &[]),
    ]
}

fn catalyst_ops() -> Vec<FunctionSpec> {
    vec![
        op(Catalyst, "get_all_catalyst_devices", "List every device known to the controller",
            Get, "/dna/intent/api/v1/network-device", &[], &[]),
        op(Catalyst, "get_catalyst_device_by_id", "Get one device by uuid", Get,
            "/dna/intent/api/v1/network-device/{device_id}", &[DEVICE_ID], &["device_id"]),
        op(Catalyst, "get_catalyst_device_by_ip", "Find a device by management IP address", Get,
            "/dna/intent/api/v1/network-device/ip-address/{ip_address}",
            &[("ip_address", Str, "Management IP address")], &["ip_address"]),
        op(Catalyst, "get_catalyst_device_count", "Count devices known to the controller", Get,
            "/dna/intent/api/v1/network-device/count", &[], &[]),
        op(Catalyst, "get_catalyst_device_config", "Get a device's running configuration", Get,
            "/dna/intent/api/v1/network-device/{device_id}/config", &[DEVICE_ID], &["device_id"]),
        op(Catalyst, "get_catalyst_device_vlans", "List VLANs present on a device", Get,
            "/dna/intent/api/v1/network-device/{device_id}/vlan", &[DEVICE_ID], &["device_id"]),
        op(Catalyst, "get_catalyst_device_interfaces", "List interfaces of a device", Get,
            "/dna/intent/api/v1/interface/network-device/{device_id}", &[DEVICE_ID],
            &["device_id"]),
        op(Catalyst, "get_catalyst_modules", "List hardware modules of a device", Get,
            "/dna/intent/api/v1/network-device/module", &[DEVICE_ID], &["device_id"]),
        op(Catalyst, "get_catalyst_device_health", "Device health scores across the fabric", Get,
            "/dna/intent/api/v1/device-health",
            &[("device_role", Str, "Filter by device role"),
              ("health", Str, "Filter by health bucket (poor, fair, good)")],
            &[]),
        op(Catalyst, "get_catalyst_client_health", "Aggregated client health scores", Get,
            "/dna/intent/api/v1/client-health", &[], &[]),
        op(Catalyst, "get_catalyst_client_detail", "Detail and health for one client", Get,
            "/dna/intent/api/v1/client-detail",
            &[("mac_address", Str, "Client MAC address")], &["mac_address"]),
        op(Catalyst, "get_catalyst_sites", "List sites in the site hierarchy", Get,
            "/dna/intent/api/v1/site", &[("site_type", Str, "Filter by area, building, or floor")],
            &[]),
        op(Catalyst, "get_catalyst_site_health", "Health summary per site", Get,
            "/dna/intent/api/v1/site-health", &[], &[]),
        op(Catalyst, "get_catalyst_site_membership", "Devices assigned to a site", Get,
            "/dna/intent/api/v1/membership/{site_id}", &[("site_id", Str, "Site uuid")],
            &["site_id"]),
        op(Catalyst, "get_catalyst_topology", "Physical topology graph", Get,
            "/dna/intent/api/v1/topology/physical-topology", &[], &[]),
        op(Catalyst, "get_catalyst_l3_topology", "Layer-3 topology for a routing protocol", Get,
            "/dna/intent/api/v1/topology/l3/{topology_type}",
            &[("topology_type", Str, "Routing protocol (ospf, isis, static)")],
            &["topology_type"]),
        op(Catalyst, "get_catalyst_vlan_topology", "Layer-2 topology for a VLAN", Get,
            "/dna/intent/api/v1/topology/l2/{vlan_id}", &[("vlan_id", Str, "VLAN id")],
            &["vlan_id"]),
        op(Catalyst, "get_catalyst_network_health", "Overall network health rollup", Get,
            "/dna/intent/api/v1/network-health", &[], &[]),
        op(Catalyst, "get_catalyst_issues", "Open issues reported by assurance", Get,
            "/dna/intent/api/v1/issues",
            &[("priority", Str, "Filter by priority (P1..P4)"),
              ("issue_status", Str, "Filter by status (ACTIVE, RESOLVED, IGNORED)")],
            &[]),
        op(Catalyst, "get_catalyst_events", "Assurance event log", Get,
            "/dna/intent/api/v1/events", &[("tags", Str, "Event tag filter")], &[]),
        op(Catalyst, "get_catalyst_wireless_profiles", "List wireless profiles", Get,
            "/dna/intent/api/v1/wireless/profile", &[], &[]),
        op(Catalyst, "get_catalyst_templates", "List configuration templates", Get,
            "/dna/intent/api/v1/template-programmer/template", &[], &[]),
        op(Catalyst, "get_catalyst_tags", "List device tags", Get,
            "/dna/intent/api/v1/tag", &[("name", Str, "Filter by tag name")], &[]),
    ]
}

fn spaces_ops() -> Vec<FunctionSpec> {
    vec![
        op(Spaces, "get_location_tree", "Full location hierarchy of the account", Get,
            "/api/location/v1/tree", &[], &[]),
        op(Spaces, "get_location_details", "Get one node of the location hierarchy", Get,
            "/api/location/v1/locations/{location_id}",
            &[("location_id", Str, "Location node id")], &["location_id"]),
        op(Spaces, "get_floor_details", "Get one floor's metadata and dimensions", Get,
            "/api/location/v1/floors/{floor_id}", &[("floor_id", Str, "Floor id")],
            &["floor_id"]),
        binary_op(Spaces, "get_floor_image", "Download the floor-plan image for a floor",
            "/api/location/v1/floors/{floor_id}/image", &[("floor_id", Str, "Floor id")],
            &["floor_id"]),
        op(Spaces, "get_occupancy_count", "Current occupancy count for a location", Get,
            "/api/occupancy/v1/count", &[("location_id", Str, "Location node id")],
            &["location_id"]),
        op(Spaces, "get_occupancy_trend", "Occupancy trend series for a location", Get,
            "/api/occupancy/v1/trend",
            &[("location_id", Str, "Location node id"),
              ("interval", Str, "Bucket interval (hourly, daily)")],
            &["location_id"]),
        op(Spaces, "get_active_clients_count", "Count of currently located devices", Get,
            "/api/location/v1/clients/count", &[("location_id", Str, "Location node id")], &[]),
        op(Spaces, "get_client_location", "Latest located position of one device", Get,
            "/api/location/v1/clients/{mac_address}",
            &[("mac_address", Str, "Client MAC address")], &["mac_address"]),
        op(Spaces, "get_client_location_history", "Location history of one device", Get,
            "/api/location/v1/clients/{mac_address}/history",
            &[("mac_address", Str, "Client MAC address"),
              ("start_time", Str, "ISO-8601 range start"),
              ("end_time", Str, "ISO-8601 range end")],
            &["mac_address"]),
        binary_op(Spaces, "export_location_history", "Bulk export of location history records",
            "/api/history/v1/records",
            &[("location_id", Str, "Location node id"),
              ("start_time", Str, "ISO-8601 range start"),
              ("end_time", Str, "ISO-8601 range end")],
            &["location_id"]),
        op(Spaces, "get_presence_insights", "Presence analytics for a site", Get,
            "/api/presence/v1/insights",
            &[("site_id", Str, "Presence site id"),
              ("start_date", Str, "Range start date (YYYY-MM-DD)"),
              ("end_date", Str, "Range end date (YYYY-MM-DD)")],
            &["site_id"]),
        op(Spaces, "get_visitor_dwell_time", "Dwell-time distribution for a site", Get,
            "/api/presence/v1/dwell", &[("site_id", Str, "Presence site id")], &["site_id"]),
        op(Spaces, "get_device_count_by_floor", "Located device count on one floor", Get,
            "/api/location/v1/floors/{floor_id}/devices/count",
            &[("floor_id", Str, "Floor id")], &["floor_id"]),
    ]
}

fn webex_ops() -> Vec<FunctionSpec> {
    vec![
        op(Webex, "list_meetings", "List meetings in a time window", Get, "/v1/meetings",
            &[("from_time", Str, "ISO-8601 window start"),
              ("to_time", Str, "ISO-8601 window end")],
            &[]),
        op(Webex, "get_meeting", "Get one meeting's details", Get, "/v1/meetings/{meeting_id}",
            &[("meeting_id", Str, "Meeting id")], &["meeting_id"]),
        op(Webex, "list_meeting_participants", "List participants of a meeting", Get,
            "/v1/meetingParticipants", &[("meeting_id", Str, "Meeting id")], &["meeting_id"]),
        op(Webex, "get_meeting_qualities", "Media quality metrics for a meeting", Get,
            "/v1/meeting/qualities", &[("meeting_id", Str, "Meeting id")], &["meeting_id"]),
        op(Webex, "list_recordings", "List recordings in a time window", Get, "/v1/recordings",
            &[("from_time", Str, "ISO-8601 window start"),
              ("to_time", Str, "ISO-8601 window end")],
            &[]),
        op(Webex, "get_recording", "Get one recording's details", Get,
            "/v1/recordings/{recording_id}", &[("recording_id", Str, "Recording id")],
            &["recording_id"]),
        op(Webex, "list_rooms", "List rooms visible to the account", Get, "/v1/rooms",
            &[("room_type", Str, "Filter: direct or group")], &[]),
        op(Webex, "get_room_details", "Get one room's details", Get, "/v1/rooms/{room_id}",
            &[("room_id", Str, "Room id")], &["room_id"]),
        op(Webex, "list_workspaces", "List workspaces, optionally by location", Get,
            "/v1/workspaces", &[("workspace_location_id", Str, "Workspace location id")], &[]),
        op(Webex, "get_workspace", "Get one workspace's details", Get,
            "/v1/workspaces/{workspace_id}", &[("workspace_id", Str, "Workspace id")],
            &["workspace_id"]),
        op(Webex, "list_webex_devices", "List registered collaboration devices", Get,
            "/v1/devices", &[("display_name", Str, "Filter by device display name")], &[]),
        op(Webex, "get_webex_device", "Get one collaboration device", Get,
            "/v1/devices/{webex_device_id}", &[("webex_device_id", Str, "Device id")],
            &["webex_device_id"]),
        op(Webex, "list_people", "Look up people by email or display name", Get, "/v1/people",
            &[("email", Str, "Exact email to match"),
              ("display_name", Str, "Display-name prefix to match"),
              ("calling_data", Boolean, "Include calling data in the response")],
            &[]),
        op(Webex, "get_person_details", "Get one person's details", Get,
            "/v1/people/{person_id}", &[("person_id", Str, "Person id")], &["person_id"]),
    ]
}

/// Build and validate the full registry. Called once at startup; a
/// [`RegistryError`] here is fatal.
pub fn build_registry() -> Result<FunctionRegistry, RegistryError> {
    let mut specs = Vec::new();
    specs.extend(meraki_ops());
    specs.extend(catalyst_ops());
    specs.extend(spaces_ops());
    specs.extend(webex_ops());
    FunctionRegistry::from_specs(specs)
}

/// Standing per-function advisory strings, attached to the dispatch envelope
/// by lookup regardless of outcome. Loaded once alongside the registry and
/// never mutated.
pub fn standing_warnings() -> HashMap<String, String> {
    HashMap::from([(
        "get_all_access_points".to_string(),
        "Fetching every access point in the organization can take a long time and produce a \
         very large response. Narrow the question to one network when possible."
            .to_string(),
    )])
}

#[cfg(test)]
mod tests {
    use super::{build_registry, standing_warnings};
    use crate::platform::PlatformId;

    #[test]
    fn catalog_builds_into_a_valid_registry() {
        let registry = build_registry().expect("catalog must satisfy registry invariants");
        assert!(registry.len() > 75, "catalog should span a substantial operation set");
    }

    #[test]
    fn every_platform_contributes_operations() {
        let registry = build_registry().expect("catalog builds");
        for platform in PlatformId::ALL {
            assert!(
                registry.all().iter().any(|spec| spec.platform == platform),
                "no operations registered for {platform}"
            );
        }
    }

    #[test]
    fn required_params_are_always_declared() {
        let registry = build_registry().expect("catalog builds");
        for spec in registry.all() {
            for required in &spec.required {
                assert!(
                    spec.has_parameter(required),
                    "{}: required `{required}` missing from properties",
                    spec.name
                );
            }
        }
    }

    #[test]
    fn binary_operations_accept_the_save_path_side_channel() {
        let registry = build_registry().expect("catalog builds");
        let binary: Vec<_> =
            registry.all().iter().filter(|spec| spec.binary_payload).collect();
        assert!(!binary.is_empty(), "catalog should include binary-payload operations");
        for spec in binary {
            assert!(spec.has_parameter("save_path"), "{} lacks save_path", spec.name);
        }
    }

    #[test]
    fn warning_table_only_references_registered_functions() {
        let registry = build_registry().expect("catalog builds");
        for name in standing_warnings().keys() {
            assert!(registry.lookup(name).is_some(), "warning for unregistered `{name}`");
        }
    }

    #[test]
    fn org_scoped_cloud_operations_do_not_require_an_explicit_org() {
        // The adapter fills the configured default organization, so the model
        // can call these with an empty argument map.
        let registry = build_registry().expect("catalog builds");
        let spec = registry.lookup("list_all_switches_in_org").expect("registered");
        assert!(spec.required.is_empty());
        assert!(spec.has_parameter("organization_id"));
    }
}
