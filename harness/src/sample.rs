use serde::{Deserialize, Serialize};

/// Serial number prefix shared by every generated record; the round-trip
/// check re-queries by it.
pub const SAMPLE_SERIAL_PREFIX: &str = "SIV-2024";

/// One configuration item written during the data round-trip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SampleRecord {
    pub name: String,
    pub short_description: String,
    pub serial_number: String,
    pub family: String,
    pub state: String,
    pub system_version: String,
    pub kernel_version: String,
    pub equipment_number: String,
    pub bus_amount: u32,
    pub amount_control_panels: u32,
    pub install_status: u32,
}

#[allow(clippy::too_many_arguments)]
fn record(
    name: &str,
    short_description: &str,
    serial: &str,
    state: &str,
    system_version: &str,
    kernel_version: &str,
    equipment_number: &str,
    bus_amount: u32,
    amount_control_panels: u32,
    install_status: u32,
) -> SampleRecord {
    SampleRecord {
        name: name.to_string(),
        short_description: short_description.to_string(),
        serial_number: format!("{}-{}", SAMPLE_SERIAL_PREFIX, serial),
        family: "Siveillance".to_string(),
        state: state.to_string(),
        system_version: system_version.to_string(),
        kernel_version: kernel_version.to_string(),
        equipment_number: equipment_number.to_string(),
        bus_amount,
        amount_control_panels,
        install_status,
    }
}

pub fn generate_sample_data() -> Vec<SampleRecord> {
    vec![
        record(
            "Main Building Perimeter",
            "Primary intrusion detection for main building",
            "001",
            "Operational",
            "2.3.12.2033",
            "5.44.3",
            "EQ-MB-001",
            4,
            2,
            1,
        ),
        record(
            "Warehouse Zone A",
            "Intrusion monitoring for warehouse zone A",
            "002",
            "Operational",
            "2.3.12.2033",
            "5.44.3",
            "EQ-WH-A01",
            2,
            1,
            1,
        ),
        record(
            "Executive Floor Security",
            "High-security intrusion for executive offices",
            "003",
            "Operational",
            "2.4.1.2055",
            "5.45.1",
            "EQ-EX-001",
            3,
            2,
            1,
        ),
        record(
            "Data Center Vault",
            "Intrusion detection for data center",
            "004",
            "Operational",
            "2.4.1.2055",
            "5.45.1",
            "EQ-DC-001",
            6,
            3,
            1,
        ),
        // install_status 6 = "In Stock"
        record(
            "Loading Dock East",
            "Monitoring eastern loading dock area",
            "005",
            "Unknown",
            "2.3.10.2010",
            "5.43.8",
            "EQ-LD-E01",
            2,
            1,
            6,
        ),
    ]
}
