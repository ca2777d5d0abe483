use serde::{Deserialize, Serialize};

/// 单年活跃度
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityData {
    #[serde(default)]
    pub commits: u64,
    #[serde(default)]
    pub issues: u64,
    #[serde(default)]
    pub pull_requests: u64,
    #[serde(default)]
    pub reviews: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YearlyActivity {
    pub year: i32,
    #[serde(default)]
    pub activity_data: ActivityData,
}

/// `GET /user/:id` 响应：用户资料 + 活跃度 + 赞助统计的合并对象
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub profile_url: Option<String>,
    #[serde(default)]
    pub twitter_username: Option<String>,
    #[serde(default)]
    pub followers: Option<i64>,
    #[serde(default)]
    pub following: Option<i64>,
    #[serde(default)]
    pub total_commits: Option<u64>,
    #[serde(default)]
    pub total_issues: Option<u64>,
    #[serde(default)]
    pub total_pull_requests: Option<u64>,
    #[serde(default)]
    pub total_reviews: Option<u64>,
    #[serde(default)]
    pub total_sponsors: Option<i64>,
    #[serde(default)]
    pub total_sponsoring: Option<i64>,
    #[serde(default)]
    pub yearly_activity_data: Vec<YearlyActivity>,
}

impl UserProfile {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(self.username.as_deref())
            .unwrap_or("")
    }

    /// 按年份升序排列的活跃度（API 按新到旧返回）
    pub fn activity_by_year(&self) -> Vec<&YearlyActivity> {
        let mut years: Vec<&YearlyActivity> = self.yearly_activity_data.iter().collect();
        years.sort_by_key(|y| y.year);
        years
    }
}

/// 缺失的统计数字显示为 N/A
pub fn or_na<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
}
