use sponsorboard_core::StatsPoller;
use sponsorboard_core::columns::{FilterOption, filter_options};
use sponsorboard_core::model::profile::UserProfile;

use crate::ui::filter_popup::FilterPopup;
use crate::ui::log_view::LogLevel;
use crate::ui::profile::ProfileState;
use crate::ui::statistics::StatKind;

use super::{App, AppMessage, DataPayload, InputMode, View};

impl App {
    // — 查询同步 —

    /// 查询状态有变化时派发请求（每次变化至多一次）
    pub(crate) fn sync_query(&mut self) {
        if let Some(id) = self.sync.reconcile(&mut self.store) {
            tracing::debug!(request = %id, query = %self.store.snapshot(), "users requested");
        }
    }

    /// 手动刷新当前页
    pub(crate) fn refresh(&mut self) {
        self.sync.refresh(&self.store);
        if matches!(self.view, View::Statistics) {
            self.load_statistics();
        }
    }

    pub(crate) fn start_poller(&mut self) {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        self.poller = Some(StatsPoller::spawn(
            self.client.clone(),
            self.settings.stats_interval(),
            tx,
        ));
        let msg_tx = self.msg_tx.clone();
        tokio::spawn(async move {
            while let Some(stats) = rx.recv().await {
                if msg_tx.send(AppMessage::BriefStats(stats)).is_err() {
                    break;
                }
            }
        });
    }

    // — 分页 —

    pub(crate) fn next_page(&mut self) {
        let page = self.store.page();
        if page.page < self.sync.page_count() {
            self.store.set_page(page.page + 1, page.page_size);
        }
    }

    pub(crate) fn prev_page(&mut self) {
        let page = self.store.page();
        if page.page > 1 {
            self.store.set_page(page.page - 1, page.page_size);
        }
    }

    /// 切换每页条数；当前页超出新的总页数时落到最后一页
    pub(crate) fn cycle_page_size(&mut self) {
        let page = self.store.page();
        let next = page.next_page_size();
        let last = self.sync.total().div_ceil(next as u64).max(1) as u32;
        self.store.set_page(page.page.min(last), next);
        self.logs
            .push(LogLevel::Info, format!("Page size set to {next}"));
    }

    // — 排序 / 筛选 / 搜索 —

    pub(crate) fn toggle_sort(&mut self) {
        let column = self.board.focused_column();
        if column.sortable {
            self.store.toggle_sort(column.key);
        }
    }

    pub(crate) fn open_filter(&mut self) {
        let column = self.board.focused_column();
        if !column.filterable() {
            return;
        }
        let options = filter_options(column, &self.locations);
        if options.is_empty() {
            self.logs.push(
                LogLevel::Warn,
                format!("No filter options for {}", column.label),
            );
            return;
        }
        self.filter_popup = Some(FilterPopup::open(
            column,
            options,
            self.store.filters().get(column.key),
        ));
        self.input_mode = InputMode::Filter;
    }

    pub(crate) fn apply_filter(&mut self) {
        if let Some(popup) = self.filter_popup.take() {
            self.store
                .set_column_filter(popup.column.key, popup.selection());
        }
        self.input_mode = InputMode::Normal;
    }

    pub(crate) fn cancel_filter(&mut self) {
        self.filter_popup = None;
        self.input_mode = InputMode::Normal;
    }

    /// 清空筛选、排序与搜索
    pub(crate) fn clear_all(&mut self) {
        self.debouncer.cancel();
        self.search.cursor = 0;
        self.store.clear_all();
    }

    // — 数据加载 —

    pub(crate) fn load_locations(&self) {
        let tx = self.msg_tx.clone();
        let client = self.client.clone();
        tokio::spawn(async move {
            match client.locations().await {
                Ok(list) => {
                    let _ = tx.send(AppMessage::DataLoaded(DataPayload::Locations(list)));
                }
                Err(e) => {
                    let _ = tx.send(AppMessage::Error(format!("Failed to load locations: {e}")));
                }
            }
        });
    }

    pub(crate) fn set_locations(&mut self, list: Vec<String>) {
        self.locations = list
            .into_iter()
            .filter(|l| !l.trim().is_empty())
            .map(FilterOption::new)
            .collect();
    }

    /// 打开选中行的用户详情
    pub(crate) fn open_profile(&mut self) {
        let Some(row) = self.sync.rows().get(self.board.selected_row) else {
            return;
        };
        let Some(id) = row.id else {
            let name = row.title().to_string();
            self.logs
                .push(LogLevel::Warn, format!("No profile available for {name}"));
            return;
        };
        self.view = View::Profile(ProfileState::new(id, row.title().to_string()));

        let tx = self.msg_tx.clone();
        let client = self.client.clone();
        tokio::spawn(async move {
            let result = client.user_profile(id).await.map_err(|e| e.to_string());
            let _ = tx.send(AppMessage::DataLoaded(DataPayload::Profile { id, result }));
        });
    }

    /// 详情响应只应用到仍在查看的同一用户
    pub(crate) fn apply_profile(
        &mut self,
        id: i64,
        result: std::result::Result<UserProfile, String>,
    ) {
        let View::Profile(state) = &mut self.view else {
            return;
        };
        if state.id != id {
            return;
        }
        state.loading = false;
        match result {
            Ok(profile) => state.profile = Some(profile),
            Err(e) => {
                state.failed = true;
                self.logs
                    .push(LogLevel::Error, format!("Failed to load user {id}: {e}"));
            }
        }
    }

    pub(crate) fn load_statistics(&mut self) {
        self.stats.begin_loading();
        for kind in StatKind::ALL {
            let tx = self.msg_tx.clone();
            let client = self.client.clone();
            tokio::spawn(async move {
                let result = match kind {
                    StatKind::Users => client.user_stats().await,
                    StatKind::Gender => client.gender_stats().await,
                    StatKind::Sponsorship => client.sponsorship_stats().await,
                };
                let _ = tx.send(AppMessage::DataLoaded(DataPayload::Breakdown(
                    kind,
                    result.map_err(|e| e.to_string()),
                )));
            });
        }
    }

    pub(crate) fn toggle_statistics(&mut self) {
        match self.view {
            View::Statistics => self.view = View::Leaderboard,
            _ => {
                self.view = View::Statistics;
                self.load_statistics();
            }
        }
    }

    /// 在浏览器中打开 GitHub 主页
    pub(crate) fn open_in_browser(&mut self) {
        let url = match &self.view {
            View::Profile(state) => state.profile_url().map(str::to_string),
            _ => self
                .sync
                .rows()
                .get(self.board.selected_row)
                .and_then(|row| row.profile_url.clone()),
        };
        let Some(url) = url else {
            self.logs
                .push(LogLevel::Warn, "No profile URL for this user".to_string());
            return;
        };
        if let Err(e) = open::that(&url) {
            self.logs
                .push(LogLevel::Error, format!("Failed to open {url}: {e}"));
        }
    }
}
