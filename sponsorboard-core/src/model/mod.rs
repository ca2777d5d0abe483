pub mod profile;
pub mod stats;
pub mod user;

use serde::{Deserialize, Deserializer};

/// 计数字段：后端有时直接返回数字，有时返回 `{"count": n}`（数据库行原样序列化）
pub(crate) fn count_value<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Plain(u64),
        Row { count: u64 },
        Missing(Option<()>),
    }

    Ok(match Count::deserialize(deserializer)? {
        Count::Plain(n) | Count::Row { count: n } => n,
        Count::Missing(_) => 0,
    })
}
