use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Average adult reading speed used for read-time estimates.
pub const WORDS_PER_MINUTE: usize = 200;

const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Derives a URL slug from an article title.
///
/// Lowercases ASCII letters, keeps ASCII digits, and collapses every other
/// run of characters into a single `-`. Leading and trailing dashes are
/// dropped, so a title made only of punctuation yields an empty slug.
///
/// # Examples
///
/// ```
/// use newsdesk::util::slugify;
///
/// assert_eq!(slugify("Budget 2025: What Changes?"), "budget-2025-what-changes");
/// assert_eq!(slugify("  --Hello--  "), "hello");
/// ```
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Removes HTML tags from an article body, leaving the text between them.
///
/// Tags are replaced by a single space so adjacent block elements do not
/// glue words together. This is not a sanitizer.
pub fn strip_html_tags(html: &str) -> Cow<'_, str> {
    if !html.contains('<') {
        return Cow::Borrowed(html);
    }

    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                out.push(' ');
            }
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    Cow::Owned(out)
}

/// Estimates reading time in whole minutes for an HTML body.
///
/// Never returns less than one minute, even for an empty body.
pub fn estimate_read_time(html: &str) -> u32 {
    let words = strip_html_tags(html).split_whitespace().count();
    let minutes = words.div_ceil(WORDS_PER_MINUTE).max(1);
    u32::try_from(minutes).unwrap_or(u32::MAX)
}

/// Display width of a string in terminal columns.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncates a string to at most `max_width` terminal columns.
///
/// When text is cut, `...` is appended and counted inside the budget. For
/// budgets of three columns or fewer there is no room for the ellipsis, so
/// the string is simply clipped.
///
/// # Examples
///
/// ```
/// use newsdesk::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Short", 10), "Short");
/// assert_eq!(truncate_to_width("Hello World", 8), "Hello...");
/// assert_eq!(truncate_to_width("Test", 2), "Te");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    let (budget, suffix) = if max_width <= ELLIPSIS_WIDTH {
        (max_width, "")
    } else {
        (max_width - ELLIPSIS_WIDTH, ELLIPSIS)
    };

    let mut used = 0;
    let mut cut = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        cut = idx + c.len_utf8();
    }

    Cow::Owned(format!("{}{}", &s[..cut], suffix))
}
