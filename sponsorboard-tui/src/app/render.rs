use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use sponsorboard_core::model::stats::BriefStats;
use unicode_width::UnicodeWidthStr;

use crate::ui::format::{group_thousands, spinner, truncate_with_dots};
use crate::ui::leaderboard::BoardView;
use crate::ui::theme::Theme;

use super::{App, InputMode, View};

/// 每条轮播停留的 tick 数（约 3 秒）
const CAROUSEL_TICKS: u16 = 12;

/// 轮播条目：总用户数、总赞助数、最受赞助者、最活跃赞助者
fn carousel_items(stats: &BriefStats) -> Vec<String> {
    let mut items = vec![
        format!(" {} users ", group_thousands(stats.total_users)),
        format!(" {} sponsorships ", group_thousands(stats.total_sponsorships)),
    ];
    let top = [
        ("most sponsored", &stats.top_sponsored),
        ("top sponsor", &stats.top_sponsoring),
    ];
    for (label, user) in top {
        if let Some(name) = user.as_ref().and_then(|u| u.username.as_deref()) {
            items.push(format!(" {label} @{name} "));
        }
    }
    items
}

impl App {
    pub(crate) fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(frame.area());

        self.render_header(frame, chunks[0]);

        match &self.view {
            View::Leaderboard => self.render_leaderboard(frame, chunks[1]),
            View::Profile(state) => crate::ui::profile::render(frame, chunks[1], state, self.tick),
            View::Statistics => {
                crate::ui::statistics::render(frame, chunks[1], &self.stats, self.tick)
            }
        }

        self.render_status(frame, chunks[2]);

        if let (InputMode::Filter, Some(popup)) = (self.input_mode, self.filter_popup.as_ref()) {
            crate::ui::filter_popup::render(frame, frame.area(), popup);
        }

        if self.show_logs {
            crate::ui::log_view::render(frame, frame.area(), &self.logs);
        }

        if self.show_help {
            crate::ui::help::render(frame, frame.area());
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let title = match self.view {
            View::Leaderboard => "Leaderboard",
            View::Profile(_) => "User",
            View::Statistics => "Statistics",
        };
        let left = Line::from(vec![
            Span::styled("  SPONSORBOARD", Theme::title()),
            Span::styled(format!("  {title}"), Theme::secondary()),
        ]);

        // 右侧色块段
        let mut right_spans: Vec<Span> = Vec::new();

        if self.logs.unread_count > 0 {
            right_spans.push(Span::styled(
                format!(" ! {} ", self.logs.unread_count),
                Style::default().fg(Color::White).bg(Color::Red),
            ));
        }

        if let Some(stats) = &self.brief {
            let items = carousel_items(stats);
            let current = (self.tick / CAROUSEL_TICKS) as usize % items.len();
            for (i, item) in items.into_iter().enumerate() {
                let style = if i == current {
                    Theme::badge_accent()
                } else {
                    Theme::badge()
                };
                right_spans.push(Span::styled(item, style));
            }
        }

        let time_str = chrono::Local::now().format(" %H:%M ").to_string();
        right_spans.push(Span::styled(time_str, Theme::badge()));

        let right_width: u16 = right_spans
            .iter()
            .map(|s| s.content.width() as u16)
            .sum();

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(1), Constraint::Length(right_width)])
            .split(area);

        frame.render_widget(Paragraph::new(left), cols[0]);
        frame.render_widget(
            Paragraph::new(Line::from(right_spans)).alignment(Alignment::Right),
            cols[1],
        );
    }

    fn render_leaderboard(&self, frame: &mut Frame, area: Rect) {
        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(3)])
            .split(area);

        crate::ui::search_bar::render(
            frame,
            parts[0],
            &self.search,
            &self.store,
            self.debouncer.is_pending(),
        );

        let view = BoardView {
            rows: self.sync.rows(),
            store: &self.store,
            state: &self.board,
            loading: self.sync.loading(),
            tick: self.tick,
        };
        crate::ui::leaderboard::render(frame, parts[1], &view);
    }

    /// 底部状态行：分页信息 + 当前请求参数
    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let page = self.store.page();
        let total = self.sync.total();

        let mut left = vec![Span::styled(
            format!(
                "  Page {}/{} · {} users · {}/page",
                page.page,
                self.sync.page_count(),
                group_thousands(total),
                page.page_size,
            ),
            Theme::secondary(),
        )];
        if self.sync.loading() {
            left.push(Span::styled(format!("  {}", spinner(self.tick)), Theme::active()));
        }
        let left = Line::from(left);
        let left_width = left.width() as u16;

        let query = match self.sync.applied() {
            Some(snapshot) => snapshot.to_query_string(),
            None => String::new(),
        };
        let right_width = area.width.saturating_sub(left_width + 2);
        let right = Span::styled(
            format!("{} ", truncate_with_dots(&query, right_width.saturating_sub(1) as usize)),
            Theme::secondary(),
        );

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(left_width), Constraint::Min(1)])
            .split(area);
        frame.render_widget(Paragraph::new(left), cols[0]);
        frame.render_widget(
            Paragraph::new(Line::from(right)).alignment(Alignment::Right),
            cols[1],
        );
    }
}
