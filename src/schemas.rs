//! Wire types for the annotation backend and the IOC enrichment endpoint.
//!
//! `Sentence`/`Mapping` mirror `GET /api/sentences/`; `IocDetails` and its
//! nested pulse/validation shapes mirror `GET /api/IOCDetails/`. Unknown
//! fields are ignored everywhere since the backend adds columns freely.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::deserializers::{
    de_i64_forgiving, de_option_f64_forgiving, de_option_u64_forgiving, de_string_list,
};

/// One annotated sentence of a report.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Sentence {
    pub id: i64,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub disposition: Option<String>,
    #[serde(default)]
    pub mappings: Vec<Mapping>,
}

/// An attack-technique association attached to a sentence. Opaque to the
/// viewer beyond being enumerable and renderable.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Mapping {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub attack_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de_option_f64_forgiving")]
    pub confidence: Option<f64>,
}

/// Discriminant the enrichment endpoint returns for one indicator lookup.
/// Selects both the title color and the body rendering branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "i8")]
pub enum ResponseCode {
    /// -1: lookup errored upstream; presented as malicious.
    LookupError,
    /// 0: known clean, no supporting records.
    Clean,
    /// 1: malicious, with threat-intel pulses attached.
    Malicious,
    /// 2: unknown / inconclusive.
    Inconclusive,
    /// 3: validated clean, with validation records attached.
    Validated,
}

impl From<i64> for ResponseCode {
    fn from(code: i64) -> Self {
        match code {
            -1 => ResponseCode::LookupError,
            0 => ResponseCode::Clean,
            1 => ResponseCode::Malicious,
            3 => ResponseCode::Validated,
            // 2 and anything off the known set: the original UI fell through
            // every branch for unrecognized codes, which is the inconclusive
            // presentation
            _ => ResponseCode::Inconclusive,
        }
    }
}

impl From<ResponseCode> for i8 {
    fn from(code: ResponseCode) -> Self {
        match code {
            ResponseCode::LookupError => -1,
            ResponseCode::Clean => 0,
            ResponseCode::Malicious => 1,
            ResponseCode::Inconclusive => 2,
            ResponseCode::Validated => 3,
        }
    }
}

impl ResponseCode {
    /// Title color for the offcanvas header: red for -1/1, green for 0/3,
    /// orange for 2.
    pub fn title_color(&self) -> TitleColor {
        match self {
            ResponseCode::LookupError | ResponseCode::Malicious => TitleColor::Red,
            ResponseCode::Clean | ResponseCode::Validated => TitleColor::Green,
            ResponseCode::Inconclusive => TitleColor::Orange,
        }
    }
}

fn de_response_code<'de, D>(deserializer: D) -> Result<ResponseCode, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(ResponseCode::from(de_i64_forgiving(deserializer)?))
}

/// Classification color for the panel title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TitleColor {
    Red,
    Green,
    Orange,
}

impl TitleColor {
    pub fn css(&self) -> &'static str {
        match self {
            TitleColor::Red => "red",
            TitleColor::Green => "green",
            TitleColor::Orange => "orange",
        }
    }
}

/// Enrichment result for one `(value, type)` indicator pair.
#[derive(Debug, Clone, Deserialize)]
pub struct IocDetails {
    #[serde(deserialize_with = "de_response_code")]
    pub response_code: ResponseCode,
    #[serde(default)]
    pub info: String,
    #[serde(default)]
    pub result: Option<IocResult>,
    #[serde(default)]
    pub validations: Vec<Validation>,
}

impl IocDetails {
    /// Pulses attached to a code-1 result; empty for every other code.
    pub fn pulses(&self) -> &[Pulse] {
        self.result
            .as_ref()
            .and_then(|r| r.pulse_info.as_ref())
            .map(|p| p.pulses.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IocResult {
    #[serde(default)]
    pub pulse_info: Option<PulseInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PulseInfo {
    #[serde(default)]
    pub pulses: Vec<Pulse>,
    #[serde(default, deserialize_with = "de_option_u64_forgiving")]
    pub count: Option<u64>,
}

/// One threat-intel pulse. Collections default to empty; the feed omits them
/// freely.
#[derive(Debug, Clone, Deserialize)]
pub struct Pulse {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default, deserialize_with = "de_string_list")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub modified: Option<String>,
    #[serde(default, deserialize_with = "de_string_list")]
    pub references: Vec<String>,
    #[serde(default)]
    pub indicator_type_counts: BTreeMap<String, u64>,
    #[serde(default, deserialize_with = "de_string_list")]
    pub malware_families: Vec<String>,
    #[serde(default, deserialize_with = "de_string_list")]
    pub attack_ids: Vec<String>,
    #[serde(default, deserialize_with = "de_string_list")]
    pub targeted_countries: Vec<String>,
}

/// One whitelist/validation record attached to a code-3 result.
#[derive(Debug, Clone, Deserialize)]
pub struct Validation {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub source: String,
}
