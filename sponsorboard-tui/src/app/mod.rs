mod actions;
mod event;
mod render;

const UI_TICK_MS: u64 = 250;

use std::io;

use anyhow::Result;
use crossterm::{
    event::Event,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use sponsorboard_core::columns::FilterOption;
use sponsorboard_core::model::{profile::UserProfile, stats::BriefStats, stats::Breakdown};
use sponsorboard_core::{
    Debouncer, FetchOutcome, PollHandle, QueryStateStore, QuerySynchronizer, SponsorClient,
};
use tokio::sync::mpsc;

use crate::config::settings::Settings;
use crate::ui::filter_popup::FilterPopup;
use crate::ui::leaderboard::BoardState;
use crate::ui::log_view::LogStore;
use crate::ui::profile::ProfileState;
use crate::ui::search_bar::SearchInput;
use crate::ui::statistics::{StatKind, StatisticsData};

/// 异步消息，从后台任务发送到主循环
pub enum AppMessage {
    /// 终端事件（由持久后台线程读取）
    TermEvent(Event),
    /// UI 定时 tick（加载动画、轮播）
    Tick,
    /// 搜索词防抖后落定
    SearchSettled(String),
    /// 排行榜请求完成（可能已过期，由同步器判断）
    UsersFetched(FetchOutcome),
    /// 轮询到的汇总数据
    BriefStats(BriefStats),
    /// API 数据加载完成
    DataLoaded(DataPayload),
    /// 错误通知
    Error(String),
}

/// 后台加载的数据
pub enum DataPayload {
    Locations(Vec<String>),
    Profile {
        id: i64,
        result: std::result::Result<UserProfile, String>,
    },
    Breakdown(StatKind, std::result::Result<Breakdown, String>),
}

/// 当前页面
pub enum View {
    Leaderboard,
    Profile(ProfileState),
    Statistics,
}

/// 输入模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Filter,
}

pub struct App {
    pub running: bool,
    pub settings: Settings,
    pub client: SponsorClient,
    pub store: QueryStateStore,
    pub sync: QuerySynchronizer<SponsorClient>,
    pub debouncer: Debouncer<String>,
    pub poller: Option<PollHandle>,
    pub brief: Option<BriefStats>,
    pub locations: Vec<FilterOption>,
    pub view: View,
    pub input_mode: InputMode,
    pub board: BoardState,
    pub search: SearchInput,
    pub filter_popup: Option<FilterPopup>,
    pub stats: StatisticsData,
    pub show_help: bool,
    pub show_logs: bool,
    pub logs: LogStore,
    pub tick: u16,
    pub msg_tx: mpsc::UnboundedSender<AppMessage>,
    msg_rx: mpsc::UnboundedReceiver<AppMessage>,
}

/// 把子系统的结果通道转成 AppMessage
fn forward<T: Send + 'static>(
    mut rx: mpsc::UnboundedReceiver<T>,
    tx: mpsc::UnboundedSender<AppMessage>,
    wrap: fn(T) -> AppMessage,
) {
    tokio::spawn(async move {
        while let Some(value) = rx.recv().await {
            if tx.send(wrap(value)).is_err() {
                break;
            }
        }
    });
}

impl App {
    pub async fn new() -> Result<Self> {
        Self::with_settings(Settings::load()?)
    }

    /// 需要在 tokio runtime 内调用（会启动消息转发任务）
    pub fn with_settings(settings: Settings) -> Result<Self> {
        let client = SponsorClient::new(Some(settings.api.base_url.as_str()))?;
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();

        let (users_tx, users_rx) = mpsc::unbounded_channel();
        forward(users_rx, msg_tx.clone(), AppMessage::UsersFetched);
        let (search_tx, search_rx) = mpsc::unbounded_channel();
        forward(search_rx, msg_tx.clone(), AppMessage::SearchSettled);

        let sync = QuerySynchronizer::new(client.clone(), users_tx);
        let debouncer = Debouncer::new(settings.debounce(), search_tx)
            .with_leading_edge(settings.search.leading_edge);
        let store = QueryStateStore::new(settings.leaderboard.page_size);

        tracing::info!(base_url = client.base_url(), "sponsorboard starting");

        Ok(Self {
            running: true,
            settings,
            client,
            store,
            sync,
            debouncer,
            poller: None,
            brief: None,
            locations: Vec::new(),
            view: View::Leaderboard,
            input_mode: InputMode::Normal,
            board: BoardState::default(),
            search: SearchInput::default(),
            filter_popup: None,
            stats: StatisticsData::default(),
            show_help: false,
            show_logs: false,
            logs: LogStore::new(),
            tick: 0,
            msg_tx,
            msg_rx,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal).await;

        // 离开页面：停止轮询和挂起的防抖
        if let Some(poller) = self.poller.take() {
            poller.cancel();
        }
        self.debouncer.cancel();

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    async fn main_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<()> {
        // 启动持久的事件读取线程，避免 select! + spawn_blocking 丢事件
        let event_tx = self.msg_tx.clone();
        std::thread::spawn(move || {
            while let Ok(ev) = crossterm::event::read() {
                if event_tx.send(AppMessage::TermEvent(ev)).is_err() {
                    break;
                }
            }
        });

        let tick_tx = self.msg_tx.clone();
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(std::time::Duration::from_millis(UI_TICK_MS));
            loop {
                interval.tick().await;
                if tick_tx.send(AppMessage::Tick).is_err() {
                    break;
                }
            }
        });

        // 挂载：首次请求、地区筛选项、汇总轮询
        self.sync_query();
        self.load_locations();
        self.start_poller();

        while self.running {
            terminal.draw(|f| self.render(f))?;

            // 等待至少一条消息
            if let Some(msg) = self.msg_rx.recv().await {
                self.handle_message(msg);
            }
            // 批量处理所有已积压的消息，避免每条消息都触发一次 draw
            while let Ok(msg) = self.msg_rx.try_recv() {
                self.handle_message(msg);
            }
            // 一批消息处理完后再比较查询状态，同一批内的多次修改只产生一次请求
            self.sync_query();
        }
        Ok(())
    }
}
