use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use sponsorboard_core::FetchStatus;

use crate::ui::log_view::LogLevel;

use super::{App, AppMessage, DataPayload, InputMode, View};

impl App {
    pub(crate) fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Ctrl+C 在任何模式下都退出
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                self.running = false;
                return;
            }

            // 帮助浮层打开时，只响应关闭操作
            if self.show_help {
                if matches!(
                    key.code,
                    KeyCode::Char('q') | KeyCode::Char('?') | KeyCode::Esc
                ) {
                    self.show_help = false;
                }
                return;
            }

            // 日志浮层打开时，只响应滚动和关闭
            if self.show_logs {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Char('!') | KeyCode::Esc => {
                        self.show_logs = false;
                    }
                    KeyCode::Char('j') | KeyCode::Down => self.logs.scroll_down(),
                    KeyCode::Char('k') | KeyCode::Up => self.logs.scroll_up(),
                    _ => {}
                }
                return;
            }

            match self.input_mode {
                InputMode::Normal => self.handle_normal_key(key),
                InputMode::Search => self.handle_search_key(key),
                InputMode::Filter => self.handle_filter_key(key),
            }
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        // 全局
        match key.code {
            KeyCode::Char('q') => {
                self.running = false;
                return;
            }
            KeyCode::Char('?') => {
                self.show_help = true;
                return;
            }
            KeyCode::Char('!') => {
                self.show_logs = true;
                self.logs.mark_read();
                return;
            }
            KeyCode::Tab => {
                self.toggle_statistics();
                return;
            }
            _ => {}
        }

        match self.view {
            View::Leaderboard => self.handle_leaderboard_key(key),
            View::Profile(_) => match key.code {
                KeyCode::Esc | KeyCode::Char('h') | KeyCode::Left | KeyCode::Backspace => {
                    self.view = View::Leaderboard;
                }
                KeyCode::Char('o') => self.open_in_browser(),
                _ => {}
            },
            View::Statistics => match key.code {
                KeyCode::Esc => self.view = View::Leaderboard,
                KeyCode::Char('r') => self.load_statistics(),
                _ => {}
            },
        }
    }

    fn handle_leaderboard_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.board.row_down(self.sync.rows().len()),
            KeyCode::Char('k') | KeyCode::Up => self.board.row_up(),
            KeyCode::Char('h') | KeyCode::Left => self.board.col_left(),
            KeyCode::Char('l') | KeyCode::Right => self.board.col_right(),
            KeyCode::Char('g') => self.board.selected_row = 0,
            KeyCode::Char('G') => {
                self.board.selected_row = self.sync.rows().len().saturating_sub(1);
            }
            KeyCode::Char('s') => self.toggle_sort(),
            KeyCode::Char('f') => self.open_filter(),
            KeyCode::Char('/') => {
                self.search.begin(&self.store);
                self.input_mode = InputMode::Search;
            }
            KeyCode::Char(']') | KeyCode::PageDown => self.next_page(),
            KeyCode::Char('[') | KeyCode::PageUp => self.prev_page(),
            KeyCode::Char('z') => self.cycle_page_size(),
            KeyCode::Char('x') => self.clear_all(),
            KeyCode::Char('r') => self.refresh(),
            KeyCode::Enter => self.open_profile(),
            KeyCode::Char('o') => self.open_in_browser(),
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.search.editing = false;
                self.input_mode = InputMode::Normal;
            }
            // 回车跳过防抖立即生效
            KeyCode::Enter => {
                self.debouncer.flush(self.store.search_term().to_string());
                self.search.editing = false;
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Backspace => {
                if let Some(term) = self.search.backspace(&mut self.store) {
                    self.debouncer.push(term);
                }
            }
            KeyCode::Left => self.search.move_left(),
            KeyCode::Right => self.search.move_right(&self.store),
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                let term = self.search.clear(&mut self.store);
                self.debouncer.push(term);
            }
            KeyCode::Char(c) => {
                let term = self.search.insert(&mut self.store, c);
                self.debouncer.push(term);
            }
            _ => {}
        }
    }

    fn handle_filter_key(&mut self, key: KeyEvent) {
        let Some(popup) = self.filter_popup.as_mut() else {
            self.input_mode = InputMode::Normal;
            return;
        };
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => popup.down(),
            KeyCode::Char('k') | KeyCode::Up => popup.up(),
            KeyCode::Char(' ') => popup.toggle(),
            KeyCode::Char('c') => popup.clear(),
            KeyCode::Enter => self.apply_filter(),
            KeyCode::Esc => self.cancel_filter(),
            _ => {}
        }
    }

    pub(crate) fn handle_message(&mut self, msg: AppMessage) {
        match msg {
            AppMessage::TermEvent(ev) => self.handle_event(ev),
            AppMessage::Tick => {
                self.tick = self.tick.wrapping_add(1);
            }
            // 输入框已变化（如清空全部）时丢弃在途的落定值
            AppMessage::SearchSettled(term) => {
                if term == self.store.search_term() {
                    self.store.settle_search(term);
                }
            }
            AppMessage::UsersFetched(outcome) => {
                let id = outcome.id;
                match self.sync.apply(outcome) {
                    FetchStatus::Applied => self.board.clamp(self.sync.rows().len()),
                    FetchStatus::Failed => {
                        let err = self.sync.last_error().unwrap_or("unknown error");
                        let message = format!("Failed to load users ({id}): {err}");
                        self.logs.push(LogLevel::Error, message);
                    }
                    FetchStatus::Superseded => {}
                }
            }
            AppMessage::BriefStats(stats) => {
                self.brief = Some(stats);
            }
            AppMessage::DataLoaded(payload) => match payload {
                DataPayload::Locations(list) => self.set_locations(list),
                DataPayload::Profile { id, result } => self.apply_profile(id, result),
                DataPayload::Breakdown(kind, result) => match result {
                    Ok(data) => self.stats.set(kind, data),
                    Err(e) => {
                        self.stats.fail(kind);
                        self.logs
                            .push(LogLevel::Error, format!("Failed to load {}: {e}", kind.title()));
                    }
                },
            },
            AppMessage::Error(msg) => {
                self.logs.push(LogLevel::Error, msg);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::Settings;

    fn press(app: &mut App, code: KeyCode) {
        app.handle_event(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    fn test_app() -> App {
        App::with_settings(Settings::default()).unwrap()
    }

    #[tokio::test]
    async fn typing_only_changes_raw_term_until_enter() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.input_mode, InputMode::Search);
        for c in "neo".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        assert_eq!(app.store.search_term(), "neo");
        assert_eq!(app.store.settled_search(), "");

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::Normal);

        drain_until_settled(&mut app).await;
        assert_eq!(app.store.settled_search(), "neo");
    }

    /// 处理消息直到一次搜索落定被处理
    async fn drain_until_settled(app: &mut App) {
        loop {
            match app.msg_rx.recv().await {
                Some(msg @ AppMessage::SearchSettled(_)) => {
                    app.handle_message(msg);
                    break;
                }
                Some(_) => continue,
                None => panic!("channel closed"),
            }
        }
    }

    #[tokio::test]
    async fn clear_all_wins_over_in_flight_settle() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('/'));
        for c in "neo".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        // 回车已发出 "neo"，落定消息尚在途中时清空全部
        press(&mut app, KeyCode::Char('x'));

        drain_until_settled(&mut app).await;
        assert_eq!(app.store.search_term(), "");
        assert_eq!(app.store.settled_search(), "");
        assert_eq!(app.store.snapshot().search, "");
    }

    #[tokio::test]
    async fn settle_for_an_outdated_term_is_ignored() {
        let mut app = test_app();
        app.store.set_search_term("neo");
        app.handle_message(AppMessage::SearchSettled("ne".to_string()));
        assert_eq!(app.store.settled_search(), "");

        app.handle_message(AppMessage::SearchSettled("neo".to_string()));
        assert_eq!(app.store.settled_search(), "neo");
    }

    #[tokio::test]
    async fn applying_a_filter_resets_to_first_page() {
        let mut app = test_app();
        app.store.set_page(3, 10);
        // 聚焦 type 列
        app.board.selected_col = 2;
        press(&mut app, KeyCode::Char('f'));
        assert_eq!(app.input_mode, InputMode::Filter);
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.store.filters().is_active("type"));
        assert_eq!(app.store.page().page, 1);
    }

    #[tokio::test]
    async fn help_overlay_swallows_keys() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        press(&mut app, KeyCode::Char('s'));
        assert!(app.store.sorters().is_empty());
        press(&mut app, KeyCode::Esc);
        assert!(!app.show_help);
    }

    #[tokio::test]
    async fn ctrl_c_quits_from_search() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('/'));
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        app.handle_event(Event::Key(key));
        assert!(!app.running);
    }
}
