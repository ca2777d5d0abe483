use serde::{Deserialize, Deserializer, Serialize};

use super::count_value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopUser {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// `GET /stats/brief`：轮播用的汇总快照
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BriefStats {
    #[serde(default, deserialize_with = "count_value")]
    pub total_users: u64,
    #[serde(default, deserialize_with = "count_value")]
    pub total_sponsorships: u64,
    #[serde(default)]
    pub top_sponsored: Option<TopUser>,
    #[serde(default)]
    pub top_sponsoring: Option<TopUser>,
}

/// 图表用的一组 (标签, 数量)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Breakdown {
    pub entries: Vec<(String, u64)>,
}

const LABEL_KEYS: &[&str] = &["label", "name", "gender", "type", "location"];
const COUNT_KEYS: &[&str] = &["count", "value", "total"];

impl Breakdown {
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, n)| n).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn from_value(value: serde_json::Value) -> Result<Self, String> {
        use serde_json::Value;

        let as_count = |v: &Value| v.as_u64().or_else(|| v.as_f64().map(|f| f.max(0.0) as u64));

        let entries = match value {
            // {"Male": 10, "Female": 3}
            Value::Object(map) => map
                .iter()
                .filter_map(|(k, v)| as_count(v).map(|n| (k.clone(), n)))
                .collect(),
            // [{"gender": "Male", "count": 10}, ...]
            Value::Array(items) => items
                .iter()
                .filter_map(|item| {
                    let obj = item.as_object()?;
                    let label = LABEL_KEYS.iter().find_map(|k| obj.get(*k)).map(|v| {
                        match v {
                            Value::String(s) => super::user::display_text(Some(s)),
                            Value::Null => super::user::display_text(None),
                            other => other.to_string(),
                        }
                    })?;
                    let count = COUNT_KEYS.iter().find_map(|k| obj.get(*k).and_then(as_count))?;
                    Some((label, count))
                })
                .collect(),
            Value::Null => Vec::new(),
            other => return Err(format!("unsupported breakdown payload: {other}")),
        };
        Ok(Self { entries })
    }
}

impl<'de> Deserialize<'de> for Breakdown {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(serde::de::Error::custom)
    }
}
