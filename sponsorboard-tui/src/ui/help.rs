use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::theme::Theme;

/// 按键帮助面板定义
const HELP_SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Global",
        &[
            ("q / Ctrl+C", "Quit"),
            ("Tab", "Leaderboard / Statistics"),
            ("?", "This help"),
            ("!", "Logs"),
        ],
    ),
    (
        "Leaderboard",
        &[
            ("j / k", "Row down / up"),
            ("h / l", "Column left / right"),
            ("s", "Cycle sort on column"),
            ("f", "Filter column"),
            ("/", "Search"),
            ("] / [", "Next / Prev page"),
            ("z", "Cycle page size"),
            ("x", "Clear all"),
            ("r", "Refresh"),
            ("Enter", "Open profile"),
            ("o", "Open on GitHub"),
        ],
    ),
    (
        "Search",
        &[
            ("Enter", "Search now"),
            ("Ctrl+U", "Clear input"),
            ("Esc", "Leave input"),
        ],
    ),
    (
        "Filter",
        &[
            ("Space", "Toggle option"),
            ("Enter", "Apply"),
            ("c", "Clear column"),
            ("Esc", "Cancel"),
        ],
    ),
    (
        "Profile",
        &[("Esc / h", "Back"), ("o", "Open on GitHub")],
    ),
    ("Statistics", &[("r", "Reload"), ("Esc / Tab", "Back")]),
];

/// 渲染悬浮帮助面板（居中覆盖）
pub fn render(frame: &mut Frame, area: Rect) {
    let content_width = 44u16;
    let content_height = count_lines() as u16 + 2;

    let panel_w = content_width.min(area.width.saturating_sub(4));
    let panel_h = content_height.min(area.height.saturating_sub(2));

    let x = area.x + (area.width.saturating_sub(panel_w)) / 2;
    let y = area.y + (area.height.saturating_sub(panel_h)) / 2;
    let panel_area = Rect::new(x, y, panel_w, panel_h);

    frame.render_widget(Clear, panel_area);

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(""));

    for (section_name, bindings) in HELP_SECTIONS {
        lines.push(Line::from(Span::styled(
            format!("  {section_name}"),
            Style::default().add_modifier(Modifier::BOLD),
        )));

        for (key, desc) in *bindings {
            lines.push(Line::from(vec![
                Span::styled(format!("  {key:<14}"), Theme::active()),
                Span::raw(*desc),
            ]));
        }

        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        "       Press ? or Esc to close",
        Theme::secondary(),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(" Key Bindings ", Theme::title()));

    frame.render_widget(Paragraph::new(lines).block(block), panel_area);
}

fn count_lines() -> usize {
    let mut n = 1; // 顶部留白
    for (_, bindings) in HELP_SECTIONS {
        n += 1 + bindings.len() + 1;
    }
    n + 1
}
