use std::collections::BTreeSet;

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
};
use sponsorboard_core::columns::{ColumnDescriptor, FilterOption};

use super::theme::Theme;

/// 单列筛选弹层：勾选若干值，回车后整体替换该列的筛选
pub struct FilterPopup {
    pub column: &'static ColumnDescriptor,
    pub options: Vec<FilterOption>,
    pub checked: BTreeSet<String>,
    pub cursor: usize,
}

impl FilterPopup {
    pub fn open(
        column: &'static ColumnDescriptor,
        options: Vec<FilterOption>,
        current: Option<&BTreeSet<String>>,
    ) -> Self {
        Self {
            column,
            options,
            checked: current.cloned().unwrap_or_default(),
            cursor: 0,
        }
    }

    pub fn toggle(&mut self) {
        if let Some(option) = self.options.get(self.cursor) {
            if !self.checked.remove(&option.value) {
                self.checked.insert(option.value.clone());
            }
        }
    }

    pub fn down(&mut self) {
        if self.cursor + 1 < self.options.len() {
            self.cursor += 1;
        }
    }

    pub fn up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn clear(&mut self) {
        self.checked.clear();
    }

    pub fn selection(&self) -> Vec<String> {
        self.checked.iter().cloned().collect()
    }
}

pub fn render(frame: &mut Frame, area: Rect, popup: &FilterPopup) {
    let panel_w = 36u16.min(area.width.saturating_sub(4));
    let panel_h = (popup.options.len() as u16 + 3)
        .max(5)
        .min(area.height.saturating_sub(4));

    let x = area.x + (area.width.saturating_sub(panel_w)) / 2;
    let y = area.y + (area.height.saturating_sub(panel_h)) / 2;
    let panel_area = Rect::new(x, y, panel_w, panel_h);

    frame.render_widget(Clear, panel_area);

    let items: Vec<ListItem> = if popup.options.is_empty() {
        vec![ListItem::new(Span::styled("  no options", Theme::secondary()))]
    } else {
        popup
            .options
            .iter()
            .map(|opt| {
                let mark = if popup.checked.contains(&opt.value) {
                    "[x] "
                } else {
                    "[ ] "
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!(" {mark}"), Theme::active()),
                    Span::raw(opt.text.clone()),
                ]))
            })
            .collect()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" Filter: {} ", popup.column.label),
            Theme::title(),
        ))
        .title_bottom(Span::styled(
            " Space toggle · Enter apply · c clear ",
            Theme::secondary(),
        ));

    let list = List::new(items)
        .block(block)
        .highlight_style(Theme::selected_row());

    let mut state = ListState::default();
    if !popup.options.is_empty() {
        state.select(Some(popup.cursor));
    }
    frame.render_stateful_widget(list, panel_area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use sponsorboard_core::columns::{column, filter_options};

    #[test]
    fn toggling_builds_selection() {
        let gender = column("gender").unwrap();
        let mut popup = FilterPopup::open(gender, filter_options(gender, &[]), None);

        popup.toggle();
        popup.down();
        popup.down();
        popup.toggle();
        assert_eq!(popup.selection(), vec!["Male", "Other"]);

        popup.up();
        popup.up();
        popup.toggle();
        assert_eq!(popup.selection(), vec!["Other"]);
    }

    #[test]
    fn opens_with_current_values_checked() {
        let kind = column("type").unwrap();
        let current: BTreeSet<String> = ["User".to_string()].into();
        let mut popup = FilterPopup::open(kind, filter_options(kind, &[]), Some(&current));
        assert_eq!(popup.selection(), vec!["User"]);
        popup.clear();
        assert!(popup.selection().is_empty());
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let kind = column("type").unwrap();
        let mut popup = FilterPopup::open(kind, filter_options(kind, &[]), None);
        for _ in 0..5 {
            popup.down();
        }
        assert_eq!(popup.cursor, 1);
        for _ in 0..5 {
            popup.up();
        }
        assert_eq!(popup.cursor, 0);
    }
}
