use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
};
use sponsorboard_core::model::stats::Breakdown;

use super::format::{group_thousands, spinner};
use super::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatKind {
    Users,
    Gender,
    Sponsorship,
}

impl StatKind {
    pub const ALL: [StatKind; 3] = [StatKind::Users, StatKind::Gender, StatKind::Sponsorship];

    pub fn title(self) -> &'static str {
        match self {
            StatKind::Users => "Users by Type",
            StatKind::Gender => "Users by Gender",
            StatKind::Sponsorship => "Sponsorships",
        }
    }
}

#[derive(Debug, Default)]
pub struct Slot {
    pub data: Option<Breakdown>,
    pub loading: bool,
    pub failed: bool,
}

/// 统计页：三张分布图，各自独立加载
#[derive(Debug, Default)]
pub struct StatisticsData {
    pub users: Slot,
    pub gender: Slot,
    pub sponsorship: Slot,
}

impl StatisticsData {
    pub fn slot(&self, kind: StatKind) -> &Slot {
        match kind {
            StatKind::Users => &self.users,
            StatKind::Gender => &self.gender,
            StatKind::Sponsorship => &self.sponsorship,
        }
    }

    pub fn slot_mut(&mut self, kind: StatKind) -> &mut Slot {
        match kind {
            StatKind::Users => &mut self.users,
            StatKind::Gender => &mut self.gender,
            StatKind::Sponsorship => &mut self.sponsorship,
        }
    }

    pub fn begin_loading(&mut self) {
        for kind in StatKind::ALL {
            let slot = self.slot_mut(kind);
            slot.loading = true;
            slot.failed = false;
        }
    }

    pub fn set(&mut self, kind: StatKind, data: Breakdown) {
        let slot = self.slot_mut(kind);
        slot.data = Some(data);
        slot.loading = false;
        slot.failed = false;
    }

    pub fn fail(&mut self, kind: StatKind) {
        let slot = self.slot_mut(kind);
        slot.loading = false;
        slot.failed = true;
    }
}

/// 百分比，保留一位小数
fn share(count: u64, total: u64) -> String {
    if total == 0 {
        return "0.0%".into();
    }
    format!("{:.1}%", count as f64 * 100.0 / total as f64)
}

fn chart(data: &Breakdown) -> BarChart<'static> {
    let bars: Vec<Bar> = data
        .entries
        .iter()
        .enumerate()
        .map(|(i, (label, count))| {
            Bar::default()
                .label(Line::from(label.clone()))
                .value(*count)
                .text_value(group_thousands(*count))
                .style(Style::default().fg(Theme::chart_color(i)))
                .value_style(Style::default().fg(Color::Black).bg(Theme::chart_color(i)))
        })
        .collect();
    BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(9)
        .bar_gap(2)
}

fn legend(data: &Breakdown) -> Vec<Line<'static>> {
    let total = data.total();
    let mut lines: Vec<Line> = data
        .entries
        .iter()
        .enumerate()
        .map(|(i, (label, count))| {
            Line::from(vec![
                Span::styled(" ■ ", Style::default().fg(Theme::chart_color(i))),
                Span::raw(format!("{label:<14}")),
                Span::styled(format!("{:>10}", group_thousands(*count)), Theme::title()),
                Span::styled(format!("  {:>6}", share(*count, total)), Theme::secondary()),
            ])
        })
        .collect();
    lines.push(Line::from(vec![
        Span::styled(format!("   {:<14}", "Total"), Theme::secondary()),
        Span::styled(format!("{:>10}", group_thousands(total)), Theme::title()),
    ]));
    lines
}

fn render_slot(frame: &mut Frame, area: Rect, kind: StatKind, slot: &Slot, tick: u16) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(format!(" {} ", kind.title()), Theme::title()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let message = match &slot.data {
        Some(data) if !data.is_empty() => None,
        Some(_) => Some(Span::styled("  No data", Theme::secondary())),
        None if slot.failed => Some(Span::styled("  Failed to load", Theme::error())),
        None => Some(Span::styled(format!("  Loading {}", spinner(tick)), Theme::secondary())),
    };
    if let Some(message) = message {
        frame.render_widget(Paragraph::new(vec![Line::from(""), Line::from(message)]), inner);
        return;
    }
    let Some(data) = slot.data.as_ref() else {
        return;
    };

    let legend_height = (data.entries.len() as u16 + 1).min(inner.height / 2);
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(legend_height)])
        .split(inner);
    frame.render_widget(chart(data), parts[0]);
    frame.render_widget(Paragraph::new(legend(data)), parts[1]);
}

pub fn render(frame: &mut Frame, area: Rect, stats: &StatisticsData, tick: u16) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);
    for (i, kind) in StatKind::ALL.into_iter().enumerate() {
        render_slot(frame, cols[i], kind, stats.slot(kind), tick);
    }
}
