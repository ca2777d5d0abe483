//! 排行榜列定义。筛选和排序都按这张表统一处理，不再逐列手写。

/// 列的筛选来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnFilter {
    None,
    /// 固定选项
    Static(&'static [&'static str]),
    /// 运行时从 API 获取（地区）
    Dynamic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// 同时作为筛选参数名和排序字段名
    pub key: &'static str,
    pub label: &'static str,
    pub width: u16,
    pub sortable: bool,
    pub filter: ColumnFilter,
}

impl ColumnDescriptor {
    pub fn filterable(&self) -> bool {
        self.filter != ColumnFilter::None
    }
}

pub const COLUMNS: &[ColumnDescriptor] = &[
    ColumnDescriptor {
        key: "username",
        label: "Username",
        width: 16,
        sortable: true,
        filter: ColumnFilter::None,
    },
    ColumnDescriptor {
        key: "name",
        label: "Name",
        width: 16,
        sortable: true,
        filter: ColumnFilter::None,
    },
    ColumnDescriptor {
        key: "type",
        label: "Type",
        width: 6,
        sortable: false,
        filter: ColumnFilter::Static(&["User", "Organization"]),
    },
    ColumnDescriptor {
        key: "gender",
        label: "Gender",
        width: 8,
        sortable: false,
        filter: ColumnFilter::Static(&["Male", "Female", "Other", "Unknown"]),
    },
    ColumnDescriptor {
        key: "location",
        label: "Location",
        width: 14,
        sortable: false,
        filter: ColumnFilter::Dynamic,
    },
    ColumnDescriptor {
        key: "followers",
        label: "Followers",
        width: 10,
        sortable: true,
        filter: ColumnFilter::None,
    },
    ColumnDescriptor {
        key: "following",
        label: "Following",
        width: 10,
        sortable: true,
        filter: ColumnFilter::None,
    },
    ColumnDescriptor {
        key: "public_repos",
        label: "Repos",
        width: 7,
        sortable: true,
        filter: ColumnFilter::None,
    },
    ColumnDescriptor {
        key: "total_sponsors",
        label: "Sponsors",
        width: 9,
        sortable: true,
        filter: ColumnFilter::None,
    },
    ColumnDescriptor {
        key: "total_sponsoring",
        label: "Sponsoring",
        width: 11,
        sortable: true,
        filter: ColumnFilter::None,
    },
    ColumnDescriptor {
        key: "estimated_earnings",
        label: "Earnings (Est.)",
        width: 16,
        sortable: true,
        filter: ColumnFilter::None,
    },
];

pub fn column(key: &str) -> Option<&'static ColumnDescriptor> {
    COLUMNS.iter().find(|c| c.key == key)
}

/// 一个筛选选项，text 用于显示，value 用于请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    pub text: String,
    pub value: String,
}

impl FilterOption {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            text: value.clone(),
            value,
        }
    }
}

/// 列的可选筛选项；动态列使用调用方提供的地区列表
pub fn filter_options(column: &ColumnDescriptor, locations: &[FilterOption]) -> Vec<FilterOption> {
    match column.filter {
        ColumnFilter::None => Vec::new(),
        ColumnFilter::Static(values) => values.iter().copied().map(FilterOption::new).collect(),
        ColumnFilter::Dynamic => locations.to_vec(),
    }
}
