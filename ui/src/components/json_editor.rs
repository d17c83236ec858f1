//! JSON Editor Component
//!
//! Textarea with a highlighted overlay, line numbers, live validation and a
//! format button. The editor is uncontrolled from the form's point of view:
//! it shows `value` and reports every edit through `on_change`.

use leptos::prelude::*;
use leptos::web_sys;
use wasm_bindgen::JsCast;

fn push_token(html: &mut String, token: &str, class: &str) {
    let escaped = token
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");
    if class.is_empty() {
        html.push_str(&escaped);
    } else {
        html.push_str(&format!(r#"<span class="{}">{}</span>"#, class, escaped));
    }
}

/// Byte length of the string literal at the start of `s`, quotes included.
/// An unterminated literal runs to the end.
fn string_len(s: &str) -> usize {
    let mut escaped = false;
    for (i, c) in s.char_indices().skip(1) {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return i + 1,
            _ => {}
        }
    }
    s.len()
}

fn span_while(s: &str, keep: impl Fn(char) -> bool) -> usize {
    s.find(|c: char| !keep(c)).unwrap_or(s.len())
}

/// Syntax-highlighted HTML for `text`; never fails on malformed input
pub fn highlight_json(text: &str) -> String {
    let mut html = String::with_capacity(text.len() * 2);
    let mut rest = text;

    while let Some(first) = rest.chars().next() {
        let (len, class) = match first {
            '"' => {
                let len = string_len(rest);
                let is_key = rest[len..].trim_start().starts_with(':');
                (len, if is_key { "json-key" } else { "json-string" })
            }
            '-' | '0'..='9' => (
                span_while(rest, |c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E')),
                "json-number",
            ),
            c if c.is_ascii_alphabetic() => {
                let len = span_while(rest, |c| c.is_ascii_alphabetic());
                let class = match &rest[..len] {
                    "true" | "false" => "json-boolean",
                    "null" => "json-null",
                    _ => "json-error",
                };
                (len, class)
            }
            '{' | '}' => (1, "json-brace"),
            '[' | ']' => (1, "json-bracket"),
            ':' | ',' => (1, ""),
            c if c.is_whitespace() => (span_while(rest, char::is_whitespace), ""),
            c => (c.len_utf8(), "json-error"),
        };

        let (token, tail) = rest.split_at(len);
        push_token(&mut html, token, class);
        rest = tail;
    }

    html
}

/// Byte index of the UTF-16 offset `units` (DOM selection offsets count
/// UTF-16 code units)
fn byte_offset(text: &str, units: usize) -> usize {
    let mut seen = 0;
    for (idx, ch) in text.char_indices() {
        if seen >= units {
            return idx;
        }
        seen += ch.len_utf16();
    }
    text.len()
}

/// Replace the selection `start..end` (UTF-16 offsets) with two spaces;
/// returns the new text and the caret position in UTF-16 units
fn indent_selection(text: &str, start: usize, end: usize) -> (String, u32) {
    let (start, end) = (start.min(end), start.max(end));
    let head = &text[..byte_offset(text, start)];
    let tail = &text[byte_offset(text, end)..];
    let caret = head.encode_utf16().count() + 2;
    (format!("{}  {}", head, tail), caret as u32)
}

fn count_lines(text: &str) -> usize {
    text.lines().count().max(1)
}

/// Pretty-print `text`
pub fn format_json(text: &str) -> Result<String, String> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(|e| e.to_string())?;
    serde_json::to_string_pretty(&value).map_err(|e| e.to_string())
}

/// Parse error for `text`; blank text is valid
pub fn validate_json(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        return None;
    }
    serde_json::from_str::<serde_json::Value>(text).err().map(|e| e.to_string())
}

#[component]
pub fn JsonEditor(
    /// Element id
    name: String,
    #[prop(into)] value: Signal<String>,
    on_change: Callback<String>,
    #[prop(default = 8)] rows: u32,
) -> impl IntoView {
    let validation_error = Memo::new(move |_| value.with(|text| validate_json(text)));

    let on_format = move |_| {
        if let Ok(formatted) = value.with_untracked(|text| format_json(text)) {
            on_change.run(formatted);
        }
    };

    // Tab inserts two spaces instead of leaving the field
    let on_keydown = move |ev: web_sys::KeyboardEvent| {
        if ev.key() != "Tab" {
            return;
        }
        ev.prevent_default();
        let textarea = event_target::<web_sys::HtmlTextAreaElement>(&ev);
        let current = textarea.value();
        let start = textarea.selection_start().ok().flatten().unwrap_or(0) as usize;
        let end = textarea.selection_end().ok().flatten().unwrap_or(0) as usize;
        let (updated, cursor) = indent_selection(&current, start, end);
        textarea.set_value(&updated);
        let _ = textarea.set_selection_start(Some(cursor));
        let _ = textarea.set_selection_end(Some(cursor));
        on_change.run(updated);
    };

    let on_scroll = move |ev: web_sys::Event| {
        let textarea = event_target::<web_sys::HtmlTextAreaElement>(&ev);
        let overlay = textarea
            .parent_element()
            .and_then(|parent| parent.query_selector(".json-highlight").ok().flatten())
            .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok());
        if let Some(overlay) = overlay {
            overlay.set_scroll_top(textarea.scroll_top());
            overlay.set_scroll_left(textarea.scroll_left());
        }
    };

    view! {
        <div class="json-editor-container">
            <div class="flex justify-end mb-1">
                <button
                    type="button"
                    class="text-xs px-2 py-1 bg-gray-100 hover:bg-gray-200 text-gray-600 rounded transition-colors"
                    on:click=on_format
                    disabled=move || validation_error.with(Option::is_some) || value.with(|t| t.trim().is_empty())
                >
                    "Format"
                </button>
            </div>

            <div class="json-editor-wrapper">
                <div class="json-line-numbers" aria-hidden="true">
                    {move || {
                        let lines = value.with(|text| count_lines(text)).max(rows as usize);
                        (1..=lines)
                            .map(|n| view! { <div class="json-line-number">{n}</div> })
                            .collect_view()
                    }}
                </div>

                <div class="json-editor-area">
                    <pre
                        class="json-highlight"
                        aria-hidden="true"
                        inner_html=move || value.with(|text| highlight_json(text))
                    />
                    <textarea
                        id=name
                        class="json-textarea"
                        rows=rows
                        spellcheck="false"
                        autocomplete="off"
                        prop:value=move || value.get()
                        on:input=move |ev| on_change.run(event_target_value(&ev))
                        on:keydown=on_keydown
                        on:scroll=on_scroll
                    />
                </div>
            </div>

            {move || validation_error.get().map(|error| view! {
                <p class="mt-1 text-xs text-red-500">{error}</p>
            })}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_classifies_keys_and_values() {
        let html = highlight_json(r#"{"port": 5432, "ssl": true, "host": "db"}"#);
        assert!(html.contains(r#"<span class="json-key">"port"</span>"#));
        assert!(html.contains(r#"<span class="json-number">5432</span>"#));
        assert!(html.contains(r#"<span class="json-boolean">true</span>"#));
        assert!(html.contains(r#"<span class="json-string">"db"</span>"#));
    }

    #[test]
    fn test_highlight_escapes_markup() {
        let html = highlight_json(r#"{"a": "<b>&"}"#);
        assert!(html.contains("&lt;b&gt;&amp;"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_highlight_survives_malformed_input() {
        let html = highlight_json(r#"{"open": "no end"#);
        assert!(html.contains("json-string"));
        assert!(highlight_json("nope ü").contains("json-error"));
    }

    #[test]
    fn test_format_and_validate() {
        assert_eq!(format_json(r#"{"a":1}"#).unwrap(), "{\n  \"a\": 1\n}");
        assert!(format_json("{").is_err());
        assert_eq!(validate_json("   "), None);
        assert!(validate_json("[1,").is_some());
    }

    #[test]
    fn test_indent_selection_counts_utf16_units() {
        // "é" is one UTF-16 unit but two bytes, "😀" two units and four bytes
        assert_eq!(indent_selection("é{}", 2, 2), ("é{  }".to_string(), 4));
        assert_eq!(indent_selection("😀x", 2, 2), ("😀  x".to_string(), 4));
        assert_eq!(indent_selection("abcd", 1, 3), ("a  d".to_string(), 3));
        assert_eq!(indent_selection("ab", 9, 9), ("ab  ".to_string(), 4));
    }

    #[test]
    fn test_count_lines() {
        assert_eq!(count_lines(""), 1);
        assert_eq!(count_lines("{\n}"), 2);
    }
}
