//! Software RAID array model

use serde::{Deserialize, Deserializer, Serialize};

/// RAID levels the management API knows how to assemble.
pub const SUPPORTED_RAID_LEVELS: [u8; 6] = [0, 1, 4, 5, 6, 10];

/// MD RAID array as reported by the inventory query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RaidArrayInfo {
    /// Device path (e.g., "/dev/md0")
    pub path: String,

    /// RAID level; the wire may carry it as `1`, `"1"` or `"raid1"`
    #[serde(deserialize_with = "deserialize_level")]
    pub level: u8,

    /// Array size in bytes
    #[serde(default, alias = "size")]
    pub size_bytes: u64,

    /// Array state ("active", "clean", "degraded", ...)
    #[serde(default)]
    pub state: String,

    /// Member device paths
    #[serde(default)]
    pub devices: Vec<String>,
}

impl RaidArrayInfo {
    pub fn is_degraded(&self) -> bool {
        self.state.to_ascii_lowercase().contains("degraded")
    }

    pub fn level_name(&self) -> String {
        format!("RAID{}", self.level)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LevelRepr {
    Number(u8),
    Text(String),
}

fn deserialize_level<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    match LevelRepr::deserialize(deserializer)? {
        LevelRepr::Number(level) => Ok(level),
        LevelRepr::Text(text) => {
            let lowered = text.trim().to_ascii_lowercase();
            let digits = lowered.strip_prefix("raid").unwrap_or(&lowered);
            digits
                .parse()
                .map_err(|_| serde::de::Error::custom(format!("invalid RAID level: {text}")))
        }
    }
}
