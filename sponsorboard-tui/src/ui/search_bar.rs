use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};
use sponsorboard_core::QueryStateStore;
use unicode_width::UnicodeWidthStr;

use super::theme::Theme;

/// 搜索框的编辑状态；文本本身存放在 `QueryStateStore` 的原始搜索词中
#[derive(Debug, Default)]
pub struct SearchInput {
    /// 光标位置（字符下标）
    pub cursor: usize,
    pub editing: bool,
}

fn byte_index(text: &str, char_pos: usize) -> usize {
    text.char_indices()
        .nth(char_pos)
        .map_or(text.len(), |(i, _)| i)
}

impl SearchInput {
    pub fn begin(&mut self, store: &QueryStateStore) {
        self.editing = true;
        self.cursor = store.search_term().chars().count();
    }

    /// 插入字符，返回新的原始搜索词
    pub fn insert(&mut self, store: &mut QueryStateStore, c: char) -> String {
        let mut term = store.search_term().to_string();
        term.insert(byte_index(&term, self.cursor), c);
        self.cursor += 1;
        store.set_search_term(term.clone());
        term
    }

    /// 删除光标前一个字符；没有可删内容时返回 None
    pub fn backspace(&mut self, store: &mut QueryStateStore) -> Option<String> {
        if self.cursor == 0 {
            return None;
        }
        let mut term = store.search_term().to_string();
        self.cursor -= 1;
        term.remove(byte_index(&term, self.cursor));
        store.set_search_term(term.clone());
        Some(term)
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self, store: &QueryStateStore) {
        self.cursor = (self.cursor + 1).min(store.search_term().chars().count());
    }

    /// 清空输入，返回空字符串供防抖
    pub fn clear(&mut self, store: &mut QueryStateStore) -> String {
        self.cursor = 0;
        store.set_search_term(String::new());
        String::new()
    }
}

pub fn render(
    frame: &mut Frame,
    area: Rect,
    input: &SearchInput,
    store: &QueryStateStore,
    pending: bool,
) {
    let term = store.search_term();
    let prompt = " Search: ";

    let mut spans = vec![Span::styled(
        prompt,
        if input.editing {
            Theme::highlight()
        } else {
            Theme::secondary()
        },
    )];

    if term.is_empty() && !input.editing {
        spans.push(Span::styled("name or username (/)", Theme::secondary()));
    } else {
        spans.push(Span::styled(term, Theme::normal()));
    }

    if pending {
        spans.push(Span::styled("  …", Theme::secondary()));
    } else if !store.settled_search().is_empty() {
        spans.push(Span::styled(
            format!("  [{}]", store.settled_search()),
            Theme::indicator(),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);

    if input.editing {
        let before: String = term.chars().take(input.cursor).collect();
        let x = area.x + (prompt.width() + before.width()) as u16;
        frame.set_cursor_position((x.min(area.right().saturating_sub(1)), area.y));
    }
}
