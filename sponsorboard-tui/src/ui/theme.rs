use ratatui::style::{Color, Modifier, Style};

pub struct Theme;

/// 图表调色板：与用户页活跃度配色一致（紫、粉、青、蓝）
const CHART_COLORS: &[Color] = &[
    Color::Magenta,
    Color::LightRed,
    Color::Cyan,
    Color::LightBlue,
    Color::Green,
    Color::Yellow,
];

impl Theme {
    pub fn highlight() -> Style {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    }

    pub fn secondary() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn active() -> Style {
        Style::default().fg(Color::Cyan)
    }

    pub fn error() -> Style {
        Style::default().fg(Color::Red)
    }

    pub fn normal() -> Style {
        Style::default()
    }

    pub fn title() -> Style {
        Style::default().add_modifier(Modifier::BOLD)
    }

    pub fn selected_row() -> Style {
        Style::default().bg(Color::DarkGray)
    }

    pub fn header_cell() -> Style {
        Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD)
    }

    /// 当前聚焦的列头
    pub fn focused_header() -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }

    /// 已启用筛选/排序的标记
    pub fn indicator() -> Style {
        Style::default().fg(Color::Yellow)
    }

    pub fn earnings() -> Style {
        Style::default().add_modifier(Modifier::BOLD)
    }

    /// 头部统计色块
    pub fn badge() -> Style {
        Style::default().fg(Color::Black).bg(Color::DarkGray)
    }

    pub fn badge_accent() -> Style {
        Style::default().fg(Color::Black).bg(Color::Cyan)
    }

    pub fn chart_color(index: usize) -> Color {
        CHART_COLORS[index % CHART_COLORS.len()]
    }
}
