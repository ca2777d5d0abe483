use super::{FilterSet, PageRequest, QuerySnapshot, SortOrder, SortSet};

/// 排行榜查询状态的唯一来源
///
/// 纯状态，不发起任何请求。由 `QuerySynchronizer::reconcile` 读取并派发请求。
/// 搜索词分两份：`search_term` 是输入框里的原始内容，`settled_search` 是防抖后的值，
/// 只有后者进入快照。
#[derive(Debug, Clone, Default)]
pub struct QueryStateStore {
    page: PageRequest,
    filters: FilterSet,
    sorters: SortSet,
    search_term: String,
    settled_search: String,
}

impl QueryStateStore {
    pub fn new(page_size: u32) -> Self {
        Self {
            page: PageRequest::new(1, page_size),
            ..Default::default()
        }
    }

    pub fn page(&self) -> PageRequest {
        self.page
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn sorters(&self) -> &SortSet {
        &self.sorters
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn settled_search(&self) -> &str {
        &self.settled_search
    }

    /// 替换分页，不会自行重置到第 1 页
    pub fn set_page(&mut self, page: u32, page_size: u32) {
        self.page = PageRequest::new(page, page_size);
    }

    pub fn reset_page(&mut self) {
        self.page.page = 1;
    }

    /// 整体替换筛选条件，并回到第 1 页
    pub fn set_filters(&mut self, filters: FilterSet) {
        self.filters = filters;
        self.reset_page();
    }

    /// 整体替换排序条件，并回到第 1 页
    pub fn set_sorters(&mut self, sorters: SortSet) {
        self.sorters = sorters;
        self.reset_page();
    }

    /// 只更新原始输入；翻页重置由防抖值落定后的 reconcile 负责
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// 记录防抖后落定的搜索词
    pub fn settle_search(&mut self, term: impl Into<String>) {
        self.settled_search = term.into();
    }

    /// 清空筛选、排序和搜索，回到第 1 页
    pub fn clear_all(&mut self) {
        self.filters = FilterSet::new();
        self.sorters = SortSet::new();
        self.search_term.clear();
        self.settled_search.clear();
        self.reset_page();
    }

    /// 单列排序切换：无 → 降序 → 升序 → 无
    pub fn toggle_sort(&mut self, key: &str) {
        let mut sorters = self.sorters.clone();
        match sorters.get(key) {
            None => sorters.set(key, SortOrder::Descend),
            Some(SortOrder::Descend) => sorters.set(key, SortOrder::Ascend),
            Some(SortOrder::Ascend) => sorters.remove(key),
        }
        self.set_sorters(sorters);
    }

    /// 替换单列筛选值，空集合表示取消该列筛选
    pub fn set_column_filter<I, S>(&mut self, key: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut filters = self.filters.clone();
        filters.insert(key, values);
        self.set_filters(filters);
    }

    pub fn snapshot(&self) -> QuerySnapshot {
        QuerySnapshot {
            page: self.page,
            filters: self.filters.clone(),
            sorters: self.sorters.clone(),
            search: self.settled_search.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_page_keeps_page() {
        let mut store = QueryStateStore::new(10);
        store.set_page(4, 50);
        assert_eq!(store.page(), PageRequest::new(4, 50));
    }

    #[test]
    fn filters_and_sorters_reset_page() {
        let mut store = QueryStateStore::new(20);
        store.set_page(5, 20);
        store.set_filters(FilterSet::new().with("gender", ["Female"]));
        assert_eq!(store.page().page, 1);
        assert_eq!(store.page().page_size, 20);

        store.set_page(3, 20);
        store.set_sorters(SortSet::new().with("followers", SortOrder::Ascend));
        assert_eq!(store.page().page, 1);
    }

    #[test]
    fn filters_replace_rather_than_merge() {
        let mut store = QueryStateStore::default();
        store.set_filters(FilterSet::new().with("gender", ["Male"]));
        store.set_filters(FilterSet::new().with("type", ["User"]));
        assert!(!store.filters().is_active("gender"));
        assert!(store.filters().is_active("type"));
    }

    #[test]
    fn raw_search_does_not_reach_snapshot() {
        let mut store = QueryStateStore::default();
        store.set_page(3, 10);
        store.set_search_term("ali");
        assert_eq!(store.snapshot().search, "");
        assert_eq!(store.page().page, 3);

        store.settle_search("ali");
        assert_eq!(store.snapshot().search, "ali");
    }

    #[test]
    fn toggle_sort_cycles_directions() {
        let mut store = QueryStateStore::default();
        store.toggle_sort("followers");
        assert_eq!(store.sorters().get("followers"), Some(SortOrder::Descend));
        store.toggle_sort("followers");
        assert_eq!(store.sorters().get("followers"), Some(SortOrder::Ascend));
        store.toggle_sort("followers");
        assert!(store.sorters().is_empty());
    }

    #[test]
    fn clear_all_resets_everything() {
        let mut store = QueryStateStore::new(50);
        store.set_column_filter("type", ["User"]);
        store.toggle_sort("name");
        store.set_search_term("x");
        store.settle_search("x");
        store.set_page(7, 50);

        store.clear_all();

        let snapshot = store.snapshot();
        assert!(snapshot.filters.is_empty());
        assert!(snapshot.sorters.is_empty());
        assert_eq!(snapshot.search, "");
        assert_eq!(store.search_term(), "");
        assert_eq!(snapshot.page, PageRequest::new(1, 50));
    }
}
