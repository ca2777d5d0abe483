//! 排行榜查询的值类型：分页、筛选、排序、搜索词，以及它们组成的快照。

pub mod store;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::endpoints::UsersQuery;

/// UI 允许的每页条数
pub const PAGE_SIZE_OPTIONS: [u32; 4] = [10, 20, 50, 100];
pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    /// page 最小为 1；不在允许集合内的 page_size 退回默认值
    pub fn new(page: u32, page_size: u32) -> Self {
        let page_size = if PAGE_SIZE_OPTIONS.contains(&page_size) {
            page_size
        } else {
            DEFAULT_PAGE_SIZE
        };
        Self {
            page: page.max(1),
            page_size,
        }
    }

    /// 下一个可选的每页条数（循环）
    pub fn next_page_size(&self) -> u32 {
        let idx = PAGE_SIZE_OPTIONS
            .iter()
            .position(|s| *s == self.page_size)
            .unwrap_or(0);
        PAGE_SIZE_OPTIONS[(idx + 1) % PAGE_SIZE_OPTIONS.len()]
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascend,
    Descend,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Ascend => "ascend",
            SortOrder::Descend => "descend",
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortOrder::Ascend => "▲",
            SortOrder::Descend => "▼",
        }
    }
}

/// 列 key → 允许值集合。空集合等同于未筛选，不会被保存。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet(BTreeMap<String, BTreeSet<String>>);

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<I, S>(&mut self, key: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let key = key.into();
        let values: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            self.0.remove(&key);
        } else {
            self.0.insert(key, values);
        }
    }

    pub fn with<I, S>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(key, values);
        self
    }

    pub fn remove(&mut self, key: &str) {
        self.0.remove(key);
    }

    pub fn get(&self, key: &str) -> Option<&BTreeSet<String>> {
        self.0.get(key)
    }

    pub fn is_active(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeSet<String>)> {
        self.0.iter()
    }
}

/// 多列排序。每个 key 至多一项，保留加入顺序（决定显示哪个箭头优先）。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortSet(Vec<(String, SortOrder)>);

impl SortSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已存在的 key 原位更新方向，否则追加到末尾
    pub fn set(&mut self, key: impl Into<String>, order: SortOrder) {
        let key = key.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = order,
            None => self.0.push((key, order)),
        }
    }

    pub fn with(mut self, key: impl Into<String>, order: SortOrder) -> Self {
        self.set(key, order);
        self
    }

    pub fn remove(&mut self, key: &str) {
        self.0.retain(|(k, _)| k != key);
    }

    pub fn get(&self, key: &str) -> Option<SortOrder> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, o)| *o)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, SortOrder)> {
        self.0.iter().map(|(k, o)| (k.as_str(), *o))
    }
}

/// 某一时刻的完整查询；四个分量按值相等即快照相等
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuerySnapshot {
    pub page: PageRequest,
    pub filters: FilterSet,
    pub sorters: SortSet,
    pub search: String,
}

impl QuerySnapshot {
    /// 除分页外的查询“形状”是否不同
    pub fn shape_differs(&self, other: &QuerySnapshot) -> bool {
        self.filters != other.filters || self.sorters != other.sorters || self.search != other.search
    }

    /// 构造 `GET /users` 的查询参数，顺序：分页、搜索、筛选、排序
    pub fn to_query(&self) -> UsersQuery {
        let mut pairs = vec![
            ("page".to_string(), self.page.page.to_string()),
            ("per_page".to_string(), self.page.page_size.to_string()),
        ];

        if !self.search.is_empty() {
            pairs.push(("search".to_string(), self.search.clone()));
        }

        for (key, values) in self.filters.iter() {
            for value in values {
                pairs.push((key.clone(), value.clone()));
            }
        }

        for (field, order) in self.sorters.iter() {
            pairs.push(("sortField".to_string(), field.to_string()));
            pairs.push(("sortOrder".to_string(), order.as_str().to_string()));
        }

        UsersQuery(pairs)
    }

    /// URL 编码后的查询串，用于状态栏和日志
    pub fn to_query_string(&self) -> String {
        let query = self.to_query();
        reqwest::Url::parse("http://localhost/")
            .map(|mut url| {
                url.query_pairs_mut()
                    .extend_pairs(query.0.iter().map(|(k, v)| (k.as_str(), v.as_str())));
                url.query().unwrap_or_default().to_string()
            })
            .unwrap_or_default()
    }
}

impl fmt::Display for QuerySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut pairs: Vec<(String, String)>) -> Vec<(String, String)> {
        pairs.sort();
        pairs
    }

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn snapshot_builds_expected_parameters() {
        let snapshot = QuerySnapshot {
            page: PageRequest::new(2, 20),
            filters: FilterSet::new().with("type", ["User"]),
            sorters: SortSet::new().with("followers", SortOrder::Descend),
            search: "neo".to_string(),
        };

        let expected = pairs(&[
            ("page", "2"),
            ("per_page", "20"),
            ("search", "neo"),
            ("type", "User"),
            ("sortField", "followers"),
            ("sortOrder", "descend"),
        ]);
        assert_eq!(sorted(snapshot.to_query().0), sorted(expected));
    }

    #[test]
    fn empty_parts_are_omitted() {
        let snapshot = QuerySnapshot::default();
        assert_eq!(snapshot.to_query().0, pairs(&[("page", "1"), ("per_page", "10")]));
        assert_eq!(snapshot.to_query_string(), "page=1&per_page=10");
    }

    #[test]
    fn filter_values_repeat_the_key() {
        let snapshot = QuerySnapshot {
            filters: FilterSet::new()
                .with("gender", ["Male", "Other"])
                .with("location", Vec::<String>::new()),
            ..Default::default()
        };
        let query = snapshot.to_query().0;
        let genders: Vec<&str> = query
            .iter()
            .filter(|(k, _)| k == "gender")
            .map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(genders, vec!["Male", "Other"]);
        assert!(!query.iter().any(|(k, _)| k == "location"));
    }

    #[test]
    fn multi_sort_keeps_field_order_pairs() {
        let snapshot = QuerySnapshot {
            sorters: SortSet::new()
                .with("estimated_earnings", SortOrder::Descend)
                .with("followers", SortOrder::Ascend),
            ..Default::default()
        };
        let tail: Vec<(String, String)> = snapshot.to_query().0.into_iter().skip(2).collect();
        assert_eq!(
            tail,
            pairs(&[
                ("sortField", "estimated_earnings"),
                ("sortOrder", "descend"),
                ("sortField", "followers"),
                ("sortOrder", "ascend"),
            ])
        );
    }

    #[test]
    fn query_string_is_url_encoded() {
        let snapshot = QuerySnapshot {
            search: "jane doe&co".to_string(),
            ..Default::default()
        };
        assert_eq!(
            snapshot.to_query_string(),
            "page=1&per_page=10&search=jane+doe%26co"
        );
    }

    #[test]
    fn page_request_is_clamped() {
        assert_eq!(PageRequest::new(0, 20), PageRequest { page: 1, page_size: 20 });
        assert_eq!(PageRequest::new(3, 7).page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(PageRequest::new(1, 100).next_page_size(), 10);
        assert_eq!(PageRequest::new(1, 20).next_page_size(), 50);
    }

    #[test]
    fn sort_set_updates_in_place() {
        let mut sorters = SortSet::new()
            .with("followers", SortOrder::Descend)
            .with("name", SortOrder::Ascend);
        sorters.set("followers", SortOrder::Ascend);
        let keys: Vec<&str> = sorters.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["followers", "name"]);
        assert_eq!(sorters.get("followers"), Some(SortOrder::Ascend));
        sorters.remove("followers");
        assert_eq!(sorters.get("followers"), None);
    }
}
