use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};
use sponsorboard_core::QueryStateStore;
use sponsorboard_core::columns::{COLUMNS, ColumnDescriptor};
use sponsorboard_core::model::user::UserRow;

use super::format::{spinner, truncate_with_dots};
use super::theme::Theme;

/// 表格光标：选中行 + 聚焦列（筛选/排序作用于聚焦列）
#[derive(Debug, Default)]
pub struct BoardState {
    pub selected_row: usize,
    pub selected_col: usize,
}

impl BoardState {
    pub fn focused_column(&self) -> &'static ColumnDescriptor {
        &COLUMNS[self.selected_col.min(COLUMNS.len() - 1)]
    }

    pub fn col_left(&mut self) {
        self.selected_col = self.selected_col.saturating_sub(1);
    }

    pub fn col_right(&mut self) {
        if self.selected_col + 1 < COLUMNS.len() {
            self.selected_col += 1;
        }
    }

    pub fn row_down(&mut self, len: usize) {
        if self.selected_row + 1 < len {
            self.selected_row += 1;
        }
    }

    pub fn row_up(&mut self) {
        self.selected_row = self.selected_row.saturating_sub(1);
    }

    /// 新数据到达后把光标限制在范围内
    pub fn clamp(&mut self, len: usize) {
        self.selected_row = self.selected_row.min(len.saturating_sub(1));
    }
}

/// 列头文字：标签 + 排序箭头（多列排序时带优先级）+ 筛选标记
pub fn header_label(column: &ColumnDescriptor, store: &QueryStateStore) -> String {
    let mut label = column.label.to_string();
    let sorters = store.sorters();
    if let Some((priority, (_, order))) = sorters
        .iter()
        .enumerate()
        .find(|(_, (k, _))| *k == column.key)
    {
        label.push(' ');
        label.push_str(order.arrow());
        if sorters.iter().count() > 1 {
            label.push_str(&(priority + 1).to_string());
        }
    }
    if store.filters().is_active(column.key) {
        label.push_str(" *");
    }
    label
}

pub struct BoardView<'a> {
    pub rows: &'a [UserRow],
    pub store: &'a QueryStateStore,
    pub state: &'a BoardState,
    pub loading: bool,
    pub tick: u16,
}

pub fn render(frame: &mut Frame, area: Rect, view: &BoardView) {
    let header = Row::new(COLUMNS.iter().enumerate().map(|(i, col)| {
        let style = if i == view.state.selected_col {
            Theme::focused_header()
        } else if view.store.sorters().get(col.key).is_some()
            || view.store.filters().is_active(col.key)
        {
            Theme::indicator()
        } else {
            Theme::header_cell()
        };
        Cell::from(truncate_with_dots(
            &header_label(col, view.store),
            col.width as usize,
        ))
        .style(style)
    }));

    let rows = view.rows.iter().map(|user| {
        Row::new(COLUMNS.iter().map(|col| {
            let text = truncate_with_dots(&user.display(col.key), col.width as usize);
            let style = if col.key == "estimated_earnings" {
                Theme::earnings()
            } else {
                Theme::normal()
            };
            Cell::from(text).style(style)
        }))
    });

    let widths: Vec<Constraint> = COLUMNS.iter().map(|c| Constraint::Length(c.width)).collect();

    let title = if view.loading {
        format!(" Leaderboard {} ", spinner(view.tick))
    } else {
        " Leaderboard ".to_string()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(title, Theme::title()));

    if view.rows.is_empty() {
        let text = if view.loading { "  Loading…" } else { "  No users" };
        let paragraph = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(text, Theme::secondary())),
        ])
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .row_highlight_style(Theme::selected_row())
        .block(block);

    let mut state = TableState::default();
    state.select(Some(view.state.selected_row));
    frame.render_stateful_widget(table, area, &mut state);
}
