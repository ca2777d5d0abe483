use std::future::Future;

use anyhow::Result;
use serde::Serialize;

use super::client::SponsorClient;
use crate::model::{
    profile::UserProfile,
    stats::{BriefStats, Breakdown},
    user::UsersPage,
};

// — 查询参数结构 —

/// `GET /users` 的查询参数；筛选值需要重复 key，所以用有序键值对
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UsersQuery(pub Vec<(String, String)>);

impl UsersQuery {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

// — 数据源抽象 —

/// 排行榜数据源，同步器只依赖这一个接口
pub trait UserSource: Clone + Send + Sync + 'static {
    fn fetch_users(&self, query: &UsersQuery) -> impl Future<Output = Result<UsersPage>> + Send;
}

/// 轮播汇总数据源
pub trait StatsSource: Clone + Send + Sync + 'static {
    fn fetch_brief_stats(&self) -> impl Future<Output = Result<BriefStats>> + Send;
}

impl SponsorClient {
    // — 排行榜 —

    pub async fn users(&self, query: &UsersQuery) -> Result<UsersPage> {
        self.get_with_query("/users", query).await
    }

    /// 去重后的地区列表，作为 location 列的筛选项
    pub async fn locations(&self) -> Result<Vec<String>> {
        self.get("/users/location").await
    }

    pub async fn brief_stats(&self) -> Result<BriefStats> {
        self.get("/stats/brief").await
    }

    // — 用户 —

    pub async fn user_profile(&self, id: i64) -> Result<UserProfile> {
        self.get(&format!("/user/{id}")).await
    }

    // — 统计 —

    pub async fn user_stats(&self) -> Result<Breakdown> {
        self.get("/user-stats").await
    }

    pub async fn gender_stats(&self) -> Result<Breakdown> {
        self.get("/gender-stats").await
    }

    pub async fn sponsorship_stats(&self) -> Result<Breakdown> {
        self.get("/user-sponsorship-stats").await
    }
}

impl UserSource for SponsorClient {
    fn fetch_users(&self, query: &UsersQuery) -> impl Future<Output = Result<UsersPage>> + Send {
        self.users(query)
    }
}

impl StatsSource for SponsorClient {
    fn fetch_brief_stats(&self) -> impl Future<Output = Result<BriefStats>> + Send {
        self.brief_stats()
    }
}
