use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// 按显示宽度截断文本，超出时末尾加 ".."
pub(crate) fn truncate_with_dots(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    let content_width = max_width.saturating_sub(2);
    let mut result = String::new();
    let mut width = 0;
    for c in text.chars() {
        let cw = c.width().unwrap_or(0);
        if width + cw > content_width {
            break;
        }
        result.push(c);
        width += cw;
    }
    result.push_str("..");
    result
}

/// 千分位分隔：1234567 → "1,234,567"
pub(crate) fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// 加载指示器帧
pub(crate) fn spinner(tick: u16) -> &'static str {
    const FRAMES: [&str; 4] = ["|", "/", "-", "\\"];
    FRAMES[tick as usize % FRAMES.len()]
}
