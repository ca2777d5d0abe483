//! 把查询状态翻译成恰好一个“当前”请求，并只应用最新请求的响应。
//!
//! 所有状态都在调用方的单一事件循环里修改：请求在后台任务中执行，
//! 结果通过 mpsc 送回，由调用方交给 [`QuerySynchronizer::apply`]。
//! 每次派发分配单调递增的 [`RequestId`]，应用时与最新 id 比较，
//! 过期的响应直接丢弃，不会覆盖更新的结果，也不会改动 loading。

use std::fmt;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::endpoints::UserSource;
use crate::model::user::{UserRow, UsersPage};
use crate::query::QuerySnapshot;
use crate::query::store::QueryStateStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 后台请求的结果，带着派发时的 id 和快照
#[derive(Debug)]
pub struct FetchOutcome {
    pub id: RequestId,
    pub snapshot: QuerySnapshot,
    pub result: Result<UsersPage>,
}

/// 最新一次请求所处的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    Idle,
    Requesting(RequestId),
    Applied(RequestId),
    Failed(RequestId),
}

/// 单个响应的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Applied,
    /// 已有更新的请求，响应被丢弃
    Superseded,
    Failed,
}

pub struct QuerySynchronizer<S: UserSource> {
    source: S,
    tx: mpsc::UnboundedSender<FetchOutcome>,
    next_id: u64,
    latest: Option<RequestId>,
    /// 最近一次派发的快照，用来判断状态是否变化
    dispatched: Option<QuerySnapshot>,
    /// 当前 rows/total 所对应的快照
    applied: Option<QuerySnapshot>,
    rows: Vec<UserRow>,
    total: u64,
    loading: bool,
    phase: FetchPhase,
    last_error: Option<String>,
}

impl<S: UserSource> QuerySynchronizer<S> {
    pub fn new(source: S, tx: mpsc::UnboundedSender<FetchOutcome>) -> Self {
        Self {
            source,
            tx,
            next_id: 0,
            latest: None,
            dispatched: None,
            applied: None,
            rows: Vec::new(),
            total: 0,
            loading: false,
            phase: FetchPhase::Idle,
            last_error: None,
        }
    }

    // — 状态读取 —

    pub fn rows(&self) -> &[UserRow] {
        &self.rows
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn phase(&self) -> FetchPhase {
        self.phase
    }

    pub fn latest_request(&self) -> Option<RequestId> {
        self.latest
    }

    pub fn dispatched(&self) -> Option<&QuerySnapshot> {
        self.dispatched.as_ref()
    }

    pub fn applied(&self) -> Option<&QuerySnapshot> {
        self.applied.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// 按已派发请求的 page_size 计算总页数，至少为 1
    pub fn page_count(&self) -> u32 {
        let page_size = self
            .dispatched
            .as_ref()
            .map_or(crate::query::DEFAULT_PAGE_SIZE, |s| s.page.page_size)
            .max(1) as u64;
        self.total.div_ceil(page_size).max(1) as u32
    }

    // — 触发 —

    /// 对比状态与上次派发的快照，按规则至多派发一次请求
    ///
    /// - 首次调用（挂载）直接请求
    /// - 筛选、排序或落定搜索词变化：页码不是 1 时先回到第 1 页，然后请求一次
    /// - 仅分页变化：按当前快照请求
    /// - 无变化：不请求
    pub fn reconcile(&mut self, store: &mut QueryStateStore) -> Option<RequestId> {
        let current = store.snapshot();
        let Some(prev) = self.dispatched.as_ref() else {
            return Some(self.dispatch(current));
        };

        let shape_changed = current.shape_differs(prev);
        let page_changed = current.page != prev.page;
        if !shape_changed && !page_changed {
            return None;
        }

        if shape_changed && store.page().page != 1 {
            store.reset_page();
        }
        Some(self.dispatch(store.snapshot()))
    }

    /// 无条件重新请求当前快照
    pub fn refresh(&mut self, store: &QueryStateStore) -> RequestId {
        self.dispatch(store.snapshot())
    }

    fn dispatch(&mut self, snapshot: QuerySnapshot) -> RequestId {
        self.next_id += 1;
        let id = RequestId(self.next_id);
        self.latest = Some(id);
        self.loading = true;
        self.phase = FetchPhase::Requesting(id);
        self.dispatched = Some(snapshot.clone());

        let query = snapshot.to_query();
        debug!(request = %id, query = %snapshot, "dispatch users fetch");

        let source = self.source.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = source.fetch_users(&query).await;
            // 接收端已关闭说明视图已销毁，结果无处可去
            let _ = tx.send(FetchOutcome {
                id,
                snapshot,
                result,
            });
        });
        id
    }

    // — 应用结果 —

    pub fn apply(&mut self, outcome: FetchOutcome) -> FetchStatus {
        if self.latest != Some(outcome.id) {
            debug!(request = %outcome.id, latest = ?self.latest, "drop superseded response");
            return FetchStatus::Superseded;
        }

        self.loading = false;
        match outcome.result {
            Ok(page) => {
                debug!(
                    request = %outcome.id,
                    rows = page.users.len(),
                    total = page.total,
                    "apply users page"
                );
                self.rows = page.users;
                self.total = page.total;
                self.applied = Some(outcome.snapshot);
                self.phase = FetchPhase::Applied(outcome.id);
                self.last_error = None;
                FetchStatus::Applied
            }
            Err(e) => {
                warn!(request = %outcome.id, error = %e, "users fetch failed");
                self.phase = FetchPhase::Failed(outcome.id);
                self.last_error = Some(e.to_string());
                FetchStatus::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::UsersQuery;
    use crate::query::{FilterSet, SortOrder, SortSet};
    use std::future::Future;
    use std::sync::{Arc, Mutex};

    /// 立即返回、只记录请求的数据源
    #[derive(Clone, Default)]
    struct RecordingSource {
        calls: Arc<Mutex<Vec<UsersQuery>>>,
    }

    impl UserSource for RecordingSource {
        fn fetch_users(
            &self,
            query: &UsersQuery,
        ) -> impl Future<Output = Result<UsersPage>> + Send {
            self.calls.lock().unwrap().push(query.clone());
            async { Ok(UsersPage::default()) }
        }
    }

    fn setup() -> (
        QuerySynchronizer<RecordingSource>,
        mpsc::UnboundedReceiver<FetchOutcome>,
        QueryStateStore,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let sync = QuerySynchronizer::new(RecordingSource::default(), tx);
        (sync, rx, QueryStateStore::new(10))
    }

    #[tokio::test]
    async fn first_reconcile_dispatches() {
        let (mut sync, _rx, mut store) = setup();
        assert_eq!(sync.phase(), FetchPhase::Idle);
        let id = sync.reconcile(&mut store).unwrap();
        assert!(sync.loading());
        assert_eq!(sync.phase(), FetchPhase::Requesting(id));
        assert_eq!(sync.reconcile(&mut store), None);
    }

    #[tokio::test]
    async fn search_settle_resets_page_with_one_dispatch() {
        let (mut sync, _rx, mut store) = setup();
        store.set_page(4, 10);
        sync.reconcile(&mut store);

        store.set_search_term("neo");
        assert_eq!(sync.reconcile(&mut store), None, "raw term must not fetch");

        store.settle_search("neo");
        let first = sync.reconcile(&mut store);
        assert!(first.is_some());
        assert_eq!(store.page().page, 1);
        assert_eq!(sync.dispatched().unwrap().page.page, 1);
        assert_eq!(sync.dispatched().unwrap().search, "neo");
        assert_eq!(sync.reconcile(&mut store), None);
    }

    #[tokio::test]
    async fn page_change_alone_dispatches() {
        let (mut sync, _rx, mut store) = setup();
        sync.reconcile(&mut store);
        store.set_page(2, 10);
        let id = sync.reconcile(&mut store);
        assert!(id.is_some());
        assert_eq!(sync.dispatched().unwrap().page.page, 2);

        store.set_page(2, 50);
        assert!(sync.reconcile(&mut store).is_some());
        assert_eq!(sync.dispatched().unwrap().page.page_size, 50);
    }

    #[tokio::test]
    async fn filter_and_sort_bursts_settle_on_latest_snapshot() {
        let (mut sync, _rx, mut store) = setup();
        sync.reconcile(&mut store);
        store.set_page(6, 10);
        sync.reconcile(&mut store);

        store.set_column_filter("gender", ["Female"]);
        sync.reconcile(&mut store);
        store.toggle_sort("followers");
        store.set_column_filter("type", ["User"]);
        sync.reconcile(&mut store);
        store.toggle_sort("followers");
        sync.reconcile(&mut store);

        let expected = store.snapshot();
        assert_eq!(expected.page.page, 1);
        assert_eq!(sync.dispatched(), Some(&expected));
        assert_eq!(
            expected.filters,
            FilterSet::new()
                .with("gender", ["Female"])
                .with("type", ["User"])
        );
        assert_eq!(
            expected.sorters,
            SortSet::new().with("followers", SortOrder::Ascend)
        );
    }

    #[tokio::test]
    async fn clear_all_dispatches_exactly_once() {
        let (mut sync, _rx, mut store) = setup();
        store.set_column_filter("type", ["User"]);
        store.toggle_sort("name");
        store.settle_search("x");
        store.set_page(3, 10);
        sync.reconcile(&mut store);
        let before = sync.latest_request();

        store.clear_all();
        let id = sync.reconcile(&mut store);
        assert!(id.is_some() && id != before);
        assert_eq!(sync.reconcile(&mut store), None);

        let snapshot = sync.dispatched().unwrap();
        assert!(snapshot.filters.is_empty() && snapshot.sorters.is_empty());
        assert_eq!(snapshot.search, "");
        assert_eq!(snapshot.page.page, 1);
    }

    #[tokio::test]
    async fn page_count_rounds_up() {
        let (mut sync, mut rx, mut store) = setup();
        store.set_page(1, 20);
        sync.reconcile(&mut store);
        let mut outcome = rx.recv().await.unwrap();
        outcome.result = Ok(UsersPage {
            users: vec![],
            total: 41,
        });
        assert_eq!(sync.apply(outcome), FetchStatus::Applied);
        assert_eq!(sync.page_count(), 3);
    }
}
