//! 响应乱序到达时，只有最新请求的结果会被应用。

use std::future::Future;
use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use sponsorboard_core::model::user::{UserRow, UsersPage};
use sponsorboard_core::{
    FetchOutcome, FetchPhase, FetchStatus, QueryStateStore, QuerySynchronizer, UserSource,
    UsersQuery,
};
use tokio::sync::{mpsc, oneshot};

struct Pending {
    query: UsersQuery,
    reply: oneshot::Sender<Result<UsersPage>>,
}

/// 每个请求都挂起，直到测试显式回复
#[derive(Clone, Default)]
struct GatedSource {
    pending: Arc<Mutex<Vec<Option<Pending>>>>,
}

impl GatedSource {
    fn len(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    fn query(&self, index: usize) -> UsersQuery {
        self.pending.lock().unwrap()[index]
            .as_ref()
            .map(|p| p.query.clone())
            .unwrap()
    }

    fn reply(&self, index: usize, result: Result<UsersPage>) {
        let pending = self.pending.lock().unwrap()[index].take().unwrap();
        let _ = pending.reply.send(result);
    }
}

impl UserSource for GatedSource {
    fn fetch_users(&self, query: &UsersQuery) -> impl Future<Output = Result<UsersPage>> + Send {
        let (reply, rx) = oneshot::channel();
        self.pending.lock().unwrap().push(Some(Pending {
            query: query.clone(),
            reply,
        }));
        async move { rx.await.unwrap_or_else(|_| Err(anyhow!("request dropped"))) }
    }
}

fn page_of(names: &[&str], total: u64) -> UsersPage {
    UsersPage {
        users: names
            .iter()
            .enumerate()
            .map(|(i, n)| UserRow {
                id: Some(i as i64),
                username: Some(n.to_string()),
                ..Default::default()
            })
            .collect(),
        total,
    }
}

fn usernames(sync: &QuerySynchronizer<GatedSource>) -> Vec<String> {
    sync.rows()
        .iter()
        .map(|r| r.username.clone().unwrap_or_default())
        .collect()
}

/// 让已派发的后台任务跑起来，直到数据源收到 `n` 个请求
async fn wait_for_requests(source: &GatedSource, n: usize) {
    for _ in 0..100 {
        if source.len() >= n {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("expected {n} requests, saw {}", source.len());
}

struct Harness {
    source: GatedSource,
    sync: QuerySynchronizer<GatedSource>,
    rx: mpsc::UnboundedReceiver<FetchOutcome>,
    store: QueryStateStore,
}

fn harness() -> Harness {
    let source = GatedSource::default();
    let (tx, rx) = mpsc::unbounded_channel();
    Harness {
        sync: QuerySynchronizer::new(source.clone(), tx),
        source,
        rx,
        store: QueryStateStore::new(10),
    }
}

#[tokio::test]
async fn late_response_for_older_request_is_discarded() {
    let Harness {
        source,
        mut sync,
        mut rx,
        mut store,
    } = harness();

    // A：初始请求
    let a = sync.reconcile(&mut store).unwrap();
    // B：在 A 返回前修改筛选
    store.set_column_filter("type", ["User"]);
    let b = sync.reconcile(&mut store).unwrap();
    assert!(b > a);
    wait_for_requests(&source, 2).await;
    assert_eq!(source.query(1).get("type"), Some("User"));

    // B 先返回
    source.reply(1, Ok(page_of(&["bob"], 1)));
    let outcome = rx.recv().await.unwrap();
    assert_eq!(outcome.id, b);
    assert_eq!(sync.apply(outcome), FetchStatus::Applied);
    assert_eq!(usernames(&sync), vec!["bob"]);
    assert!(!sync.loading());

    // A 后返回，必须被丢弃
    source.reply(0, Ok(page_of(&["alice", "carol"], 2)));
    let outcome = rx.recv().await.unwrap();
    assert_eq!(outcome.id, a);
    assert_eq!(sync.apply(outcome), FetchStatus::Superseded);
    assert_eq!(usernames(&sync), vec!["bob"]);
    assert_eq!(sync.total(), 1);
    assert_eq!(sync.phase(), FetchPhase::Applied(b));
    assert_eq!(sync.applied().unwrap().filters, store.snapshot().filters);
}

#[tokio::test]
async fn superseded_response_does_not_clear_loading() {
    let Harness {
        source,
        mut sync,
        mut rx,
        mut store,
    } = harness();

    sync.reconcile(&mut store).unwrap();
    store.set_page(2, 10);
    let newer = sync.reconcile(&mut store).unwrap();
    wait_for_requests(&source, 2).await;

    source.reply(0, Ok(page_of(&["stale"], 30)));
    let outcome = rx.recv().await.unwrap();
    assert_eq!(sync.apply(outcome), FetchStatus::Superseded);
    assert!(sync.loading());
    assert_eq!(sync.phase(), FetchPhase::Requesting(newer));
    assert!(sync.rows().is_empty());

    source.reply(1, Ok(page_of(&["fresh"], 30)));
    let outcome = rx.recv().await.unwrap();
    assert_eq!(sync.apply(outcome), FetchStatus::Applied);
    assert!(!sync.loading());
    assert_eq!(usernames(&sync), vec!["fresh"]);
}

#[tokio::test]
async fn failed_fetch_keeps_previous_page() {
    let Harness {
        source,
        mut sync,
        mut rx,
        mut store,
    } = harness();

    sync.reconcile(&mut store).unwrap();
    wait_for_requests(&source, 1).await;
    source.reply(0, Ok(page_of(&["ann", "ben"], 42)));
    let outcome = rx.recv().await.unwrap();
    sync.apply(outcome);

    store.set_page(3, 10);
    let failing = sync.reconcile(&mut store).unwrap();
    assert!(sync.loading());
    wait_for_requests(&source, 2).await;
    source.reply(1, Err(anyhow!("HTTP 500")));
    let outcome = rx.recv().await.unwrap();

    assert_eq!(sync.apply(outcome), FetchStatus::Failed);
    assert!(!sync.loading());
    assert_eq!(sync.phase(), FetchPhase::Failed(failing));
    assert_eq!(usernames(&sync), vec!["ann", "ben"]);
    assert_eq!(sync.total(), 42);
    assert_eq!(sync.last_error(), Some("HTTP 500"));
}

#[tokio::test]
async fn each_trigger_issues_one_request() {
    let Harness {
        source,
        mut sync,
        rx: _rx,
        mut store,
    } = harness();

    sync.reconcile(&mut store);
    store.set_page(5, 10);
    sync.reconcile(&mut store);
    // 筛选变化会把页码拉回 1，整个过程只发一次请求
    store.set_column_filter("gender", ["Male", "Other"]);
    sync.reconcile(&mut store);
    sync.reconcile(&mut store);
    wait_for_requests(&source, 3).await;
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    assert_eq!(source.len(), 3);

    let last = source.query(2);
    assert_eq!(last.get("page"), Some("1"));
    let genders: Vec<&str> = last
        .0
        .iter()
        .filter(|(k, _)| k == "gender")
        .map(|(_, v)| v.as_str())
        .collect();
    assert_eq!(genders, vec!["Male", "Other"]);
}
