//! Registry payloads.
//!
//! Field names follow the Reg-RWS XML schema; see
//! https://www.arin.net/resources/manage/regrws/payloads/ for the reference.

use std::fmt;
use std::str::FromStr;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// A payload the registry serves at a fixed route under a fixed root element.
pub trait Resource: DeserializeOwned + Serialize {
    /// Root element name of the payload.
    const ROOT: &'static str;

    /// API route the resource lives under.
    const ROUTE: &'static str;

    /// Human-readable resource kind.
    const KIND: &'static str;
}

/// A numbered line of a multi-line text block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    #[serde(rename = "@number", default)]
    pub number: String,

    #[serde(rename = "$text", default)]
    pub text: String,
}

/// Ordered text lines (street address, comments).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lines {
    #[serde(rename = "line", default)]
    pub lines: Vec<Line>,
}

impl Lines {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|line| line.text.as_str())
    }
}

/// ISO 3166-1 country reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub code2: String,

    #[serde(default)]
    pub code3: String,

    #[serde(default)]
    pub e164: String,
}

/// Customer record (reassignment recipient).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "customer", rename_all = "camelCase")]
pub struct Customer {
    #[serde(rename = "@xmlns", default, skip_serializing_if = "Option::is_none")]
    pub xmlns: Option<String>,

    #[serde(default)]
    pub customer_name: String,

    #[serde(rename = "iso3166-1", default)]
    pub country: Country,

    #[serde(default)]
    pub handle: String,

    #[serde(default)]
    pub street_address: Lines,

    #[serde(default)]
    pub city: String,

    /// ISO 3166-2 region code.
    #[serde(rename = "iso3166-2", default)]
    pub region: String,

    #[serde(default)]
    pub postal_code: String,

    #[serde(default)]
    pub comment: Lines,

    #[serde(default)]
    pub parent_org_handle: String,

    #[serde(default)]
    pub registration_date: String,

    #[serde(default)]
    pub private_customer: bool,
}

impl Resource for Customer {
    const ROOT: &'static str = "customer";
    const ROUTE: &'static str = "rest/customer";
    const KIND: &'static str = "Customer";
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Handle: {}", self.handle)?;
        write!(f, "Name: {}", self.customer_name)?;
        for line in self.street_address.iter() {
            write!(f, "\nAddress: {}", line)?;
        }
        let locality = [self.city.as_str(), self.region.as_str(), self.postal_code.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if !locality.is_empty() {
            write!(f, "\nCity: {}", locality)?;
        }
        if !self.country.code2.is_empty() {
            write!(f, "\nCountry: {}", self.country.code2)?;
        }
        Ok(())
    }
}

/// Network type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetType {
    Reallocation,
    AfrinicAllocated,
    ApnicAllocated,
    ArinAllocated,
    ArinEarlyReservation,
    DirectAllocation,
    DirectAssignment,
    AfrinicTransferred,
    IanaReserved,
    IanaSpecialUse,
    LacnicAllocated,
    LacnicTransferred,
    ApnicEarlyReservation,
    ApnicEarlyRegistration,
    RipeNccAllocated,
    RipeAllocated,
    RipeEarlyReservation,
    RipeNccTransferred,
    Reassigned,
}

impl NetType {
    pub const ALL: [NetType; 19] = [
        NetType::Reallocation,
        NetType::AfrinicAllocated,
        NetType::ApnicAllocated,
        NetType::ArinAllocated,
        NetType::ArinEarlyReservation,
        NetType::DirectAllocation,
        NetType::DirectAssignment,
        NetType::AfrinicTransferred,
        NetType::IanaReserved,
        NetType::IanaSpecialUse,
        NetType::LacnicAllocated,
        NetType::LacnicTransferred,
        NetType::ApnicEarlyReservation,
        NetType::ApnicEarlyRegistration,
        NetType::RipeNccAllocated,
        NetType::RipeAllocated,
        NetType::RipeEarlyReservation,
        NetType::RipeNccTransferred,
        NetType::Reassigned,
    ];

    /// Wire code.
    pub fn code(self) -> &'static str {
        match self {
            NetType::Reallocation => "A",
            NetType::AfrinicAllocated => "AF",
            NetType::ApnicAllocated => "AP",
            NetType::ArinAllocated => "AR",
            NetType::ArinEarlyReservation => "AV",
            NetType::DirectAllocation => "DA",
            NetType::DirectAssignment => "DS",
            NetType::AfrinicTransferred => "FX",
            NetType::IanaReserved => "IR",
            NetType::IanaSpecialUse => "IU",
            NetType::LacnicAllocated => "LN",
            NetType::LacnicTransferred => "LX",
            NetType::ApnicEarlyReservation => "PV",
            NetType::ApnicEarlyRegistration => "PX",
            NetType::RipeNccAllocated => "RD",
            NetType::RipeAllocated => "RN",
            NetType::RipeEarlyReservation => "RV",
            NetType::RipeNccTransferred => "RX",
            NetType::Reassigned => "S",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            NetType::Reallocation => "Reallocation",
            NetType::AfrinicAllocated => "AFRINIC allocated",
            NetType::ApnicAllocated => "APNIC allocated",
            NetType::ArinAllocated => "ARIN allocated",
            NetType::ArinEarlyReservation => "ARIN early reservation",
            NetType::DirectAllocation => "Direct Allocation",
            NetType::DirectAssignment => "Direct Assignment",
            NetType::AfrinicTransferred => "AFRINIC transferred",
            NetType::IanaReserved => "IANA reserved",
            NetType::IanaSpecialUse => "IANA special use",
            NetType::LacnicAllocated => "LACNIC allocated",
            NetType::LacnicTransferred => "LACNIC transferred",
            NetType::ApnicEarlyReservation => "APNIC early reservation",
            NetType::ApnicEarlyRegistration => "APNIC early registration",
            NetType::RipeNccAllocated => "RIPE NCC allocated",
            NetType::RipeAllocated => "RIPE allocated",
            NetType::RipeEarlyReservation => "RIPE early reservation",
            NetType::RipeNccTransferred => "RIPE NCC Transferred",
            NetType::Reassigned => "Reassigned",
        }
    }
}

impl FromStr for NetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NetType::ALL
            .into_iter()
            .find(|t| t.code() == s)
            .ok_or_else(|| format!("unknown net type code: {s}"))
    }
}

impl fmt::Display for NetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Address range inside a network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetBlock {
    /// Raw type code, kept verbatim so unknown codes survive a round trip.
    #[serde(rename = "type", default)]
    pub type_code: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub start_address: String,

    #[serde(default)]
    pub end_address: String,

    #[serde(default)]
    pub cidr_length: u8,
}

impl NetBlock {
    /// Parsed type code, `None` when the registry sent a code we don't know.
    pub fn net_type(&self) -> Option<NetType> {
        self.type_code.parse().ok()
    }

    pub fn is_reassigned(&self) -> bool {
        self.net_type() == Some(NetType::Reassigned)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetBlocks {
    #[serde(rename = "netBlock", default)]
    pub blocks: Vec<NetBlock>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginAses {
    #[serde(rename = "originAS", default)]
    pub origin_as: Vec<String>,
}

/// Point-of-contact reference attached to a network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PocLinkRef {
    #[serde(rename = "@description", default)]
    pub description: String,

    #[serde(rename = "@function", default)]
    pub function: String,

    #[serde(rename = "@handle", default)]
    pub handle: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PocLinks {
    #[serde(rename = "pocLinkRef", default)]
    pub links: Vec<PocLinkRef>,
}

/// Network record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "net", rename_all = "camelCase")]
pub struct Network {
    #[serde(rename = "@xmlns", default, skip_serializing_if = "Option::is_none")]
    pub xmlns: Option<String>,

    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub comment: Lines,

    #[serde(default)]
    pub registration_date: String,

    #[serde(default)]
    pub org_handle: String,

    #[serde(default)]
    pub handle: String,

    #[serde(default)]
    pub net_blocks: NetBlocks,

    /// Set only when the network is reassigned to a customer.
    #[serde(default)]
    pub customer_handle: String,

    #[serde(default)]
    pub parent_net_handle: String,

    #[serde(default)]
    pub net_name: String,

    #[serde(rename = "originASes", default)]
    pub origin_ases: OriginAses,

    #[serde(default)]
    pub poc_links: PocLinks,
}

impl Network {
    pub fn blocks(&self) -> &[NetBlock] {
        &self.net_blocks.blocks
    }

    /// Customer the network is reassigned to, if any.
    pub fn customer(&self) -> Option<&str> {
        let handle = self.customer_handle.trim();
        (!handle.is_empty()).then_some(handle)
    }

    /// Customer that may be deleted along with this network: the network
    /// names a customer and its first block is a reassignment.
    pub fn cascade_customer(&self) -> Option<&str> {
        let first = self.blocks().first()?;
        if first.is_reassigned() {
            self.customer()
        } else {
            None
        }
    }
}

impl Resource for Network {
    const ROOT: &'static str = "net";
    const ROUTE: &'static str = "rest/net";
    const KIND: &'static str = "Network";
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.handle)?;
        if !self.net_name.is_empty() {
            write!(f, " {}", self.net_name)?;
        }
        for block in self.blocks() {
            write!(
                f,
                "\n\t{}: {}-{} [/{}]",
                block.description, block.start_address, block.end_address, block.cidr_length
            )?;
        }
        Ok(())
    }
}

/// Registry error envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename = "error", rename_all = "camelCase")]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub additional_info: AdditionalInfo,

    #[serde(default)]
    pub code: String,

    #[serde(default)]
    pub components: Components,

    #[serde(default)]
    pub message: String,
}

impl ErrorEnvelope {
    pub const ROOT: &'static str = "error";

    /// Extra lines worth showing under the main message.
    pub fn details(&self) -> Vec<String> {
        let info = self.additional_info.messages.iter().cloned();
        let components = self.components.components.iter().map(|c| {
            if c.name.is_empty() {
                c.message.clone()
            } else {
                format!("{}: {}", c.name, c.message)
            }
        });
        info.chain(components).filter(|line| !line.is_empty()).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AdditionalInfo {
    #[serde(rename = "message", default)]
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Components {
    #[serde(rename = "component", default)]
    pub components: Vec<Component>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Component {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub message: String,
}
