use memchr::memchr;

use crate::limits::MAX_TAG_NAME_LEN;
use crate::widget::WidgetName;

/// A widget tag recognised in lesson text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetTag {
    pub widget: WidgetName,
    /// Byte offset of the opening `<`.
    pub start: usize,
    /// Byte offset after the final `>`.
    pub end: usize,
}

/// Find the next known widget tag at or after `from`.
///
/// Accepts the paired form `<name></name>` (no content between the tags) and
/// the self-closing forms `<name/>` and `<name />`. Tags whose name is not a
/// [`WidgetName`] are left alone and scanning continues after their `<`.
pub fn find_widget_tag(input: &[u8], from: usize) -> Option<WidgetTag> {
    let mut pos = from;
    while pos < input.len() {
        let lt = pos + memchr(b'<', &input[pos..])?;
        if let Some((widget, len)) = parse_widget_tag(&input[lt..]) {
            return Some(WidgetTag {
                widget,
                start: lt,
                end: lt + len,
            });
        }
        pos = lt + 1;
    }
    None
}

/// Parse a widget tag at the start of `input`.
///
/// Returns the widget and the tag's byte length.
fn parse_widget_tag(input: &[u8]) -> Option<(WidgetName, usize)> {
    let len = input.len();
    if len < 3 || input[0] != b'<' || !input[1].is_ascii_lowercase() {
        return None;
    }

    let name_start = 1;
    let mut pos = name_start;
    while pos < len
        && pos - name_start <= MAX_TAG_NAME_LEN
        && (input[pos].is_ascii_lowercase() || input[pos].is_ascii_digit() || input[pos] == b'-')
    {
        pos += 1;
    }
    let name = &input[name_start..pos];
    if name.len() > MAX_TAG_NAME_LEN {
        return None;
    }
    let widget = WidgetName::from_wire(std::str::from_utf8(name).ok()?)?;

    // Self-closing: `<name/>` or `<name />`
    let after_ws = skip_spaces(input, pos);
    if input[after_ws..].starts_with(b"/>") {
        return Some((widget, after_ws + 2));
    }

    // Paired: `<name></name>`
    if pos >= len || input[pos] != b'>' {
        return None;
    }
    pos += 1;
    let close = &input[pos..];
    if close.len() >= name.len() + 3
        && close.starts_with(b"</")
        && &close[2..2 + name.len()] == name
        && close[2 + name.len()] == b'>'
    {
        return Some((widget, pos + name.len() + 3));
    }
    None
}

fn skip_spaces(input: &[u8], mut pos: usize) -> usize {
    while pos < input.len() && (input[pos] == b' ' || input[pos] == b'\t') {
        pos += 1;
    }
    pos
}
