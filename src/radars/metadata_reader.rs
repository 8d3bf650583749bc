use std::io::Read;

use serde::{Deserialize, Deserializer};

use crate::birdflow_errors::BirdFlowError;
use crate::constants::RadarId;

/// One radar record from the metadata document.
///
/// The feed writes ids either as numbers or strings depending on the dataset
/// vintage; both are normalized to a string id here.
#[derive(Debug, Clone, Deserialize)]
pub struct RadarSpec {
    #[serde(deserialize_with = "deserialize_radar_id")]
    pub id: RadarId,

    /// `[lon, lat]` in degrees
    pub coordinates: [f64; 2],
}

/// Top-level shape of the radar metadata document: `{"radars": [...]}`.
#[derive(Debug, Deserialize)]
pub struct RadarMetadata {
    pub radars: Vec<RadarSpec>,
}

impl RadarMetadata {
    /// Read the metadata document from a JSON source.
    pub fn from_json<R: Read>(reader: R) -> Result<Self, BirdFlowError> {
        Ok(serde_json::from_reader(reader)?)
    }
}

fn deserialize_radar_id<'de, D>(deserializer: D) -> Result<RadarId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdRepr {
        Num(i64),
        Str(String),
    }

    Ok(match IdRepr::deserialize(deserializer)? {
        IdRepr::Num(n) => n.to_string(),
        IdRepr::Str(s) => s,
    })
}
