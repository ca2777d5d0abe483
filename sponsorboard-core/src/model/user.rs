use serde::{Deserialize, Serialize};

/// 排行榜中的一行用户统计
///
/// 后端字段可能为 null，全部按 `Option` 接收，展示时再做归一化。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRow {
    /// 缺失时该行仍可展示，但无法打开详情
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub hireable: Option<bool>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub profile_url: Option<String>,
    #[serde(default)]
    pub followers: Option<i64>,
    #[serde(default)]
    pub following: Option<i64>,
    #[serde(default)]
    pub public_repos: Option<i64>,
    #[serde(default)]
    pub public_gists: Option<i64>,
    #[serde(default)]
    pub total_sponsors: Option<i64>,
    #[serde(default)]
    pub total_sponsoring: Option<i64>,
    #[serde(default)]
    pub min_sponsor_cost: Option<f64>,
    #[serde(default)]
    pub estimated_earnings: Option<f64>,
}

/// `GET /users` 响应
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsersPage {
    #[serde(default)]
    pub users: Vec<UserRow>,
    #[serde(default)]
    pub total: u64,
}

const NONE_TEXT: &str = "None";

/// 展示用文本归一化：null → "None"，"Organization" → "Org"
pub fn display_text(value: Option<&str>) -> String {
    match value {
        None => NONE_TEXT.to_string(),
        Some("Organization") => "Org".to_string(),
        Some(s) => s.to_string(),
    }
}

fn display_count(value: Option<i64>) -> String {
    value.map_or_else(|| NONE_TEXT.to_string(), |n| n.to_string())
}

impl UserRow {
    /// 按列 key 取展示文本（列 key 见 `columns::COLUMNS`）
    pub fn display(&self, key: &str) -> String {
        match key {
            "username" => display_text(self.username.as_deref()),
            "name" => display_text(self.name.as_deref()),
            "type" => display_text(self.kind.as_deref()),
            "gender" => display_text(self.gender.as_deref()),
            "location" => display_text(self.location.as_deref()),
            "followers" => display_count(self.followers),
            "following" => display_count(self.following),
            "public_repos" => display_count(self.public_repos),
            "total_sponsors" => display_count(self.total_sponsors),
            "total_sponsoring" => display_count(self.total_sponsoring),
            "estimated_earnings" => match self.estimated_earnings {
                Some(v) => format!("${}+ USD/mo", v.round() as i64),
                None => NONE_TEXT.to_string(),
            },
            _ => String::new(),
        }
    }

    /// 标题用名称：优先 name，没有则用 username
    pub fn title(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(self.username.as_deref())
            .unwrap_or("")
    }
}
