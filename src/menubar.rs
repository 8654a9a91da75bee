use std::io::Write;

use crossterm::{queue, style};

use crate::config::KeyBindings;

/// Menu bar entries for the active bindings, e.g. `"[a][Left] left"`.
pub fn menu_items(bindings: &KeyBindings) -> Vec<String> {
    [
        (&bindings.left, "left"),
        (&bindings.right, "right"),
        (&bindings.activate, "details"),
        (&bindings.close, "close"),
        (&bindings.quit, "quit"),
    ]
    .into_iter()
    .filter(|(keys, _)| !keys.is_empty())
    .map(|(keys, label)| {
        let keys: String = keys.iter().map(|k| format!("[{}]", key_glyph(k))).collect();
        format!("{keys} {label}")
    })
    .collect()
}

fn key_glyph(binding: &str) -> &str {
    match binding {
        "Left" => "←",
        "Right" => "→",
        other => other,
    }
}

/// Print a menu item string, bolding any text inside `[...]` brackets.
/// Text outside brackets is printed dim.
pub fn print_menu_item<W: Write>(out: &mut W, item: &str) -> anyhow::Result<()> {
    let mut rest = item;
    while !rest.is_empty() {
        if let Some(open) = rest.find('[') {
            if open > 0 {
                queue!(
                    out,
                    style::SetAttribute(style::Attribute::Dim),
                    style::Print(&rest[..open]),
                    style::SetAttribute(style::Attribute::Reset),
                )?;
            }
            rest = &rest[open..];
            if let Some(close) = rest.find(']') {
                queue!(
                    out,
                    style::SetAttribute(style::Attribute::Bold),
                    style::Print(&rest[..=close]),
                    style::SetAttribute(style::Attribute::Reset),
                )?;
                rest = &rest[close + 1..];
            } else {
                queue!(out, style::Print(rest))?;
                break;
            }
        } else {
            queue!(
                out,
                style::SetAttribute(style::Attribute::Dim),
                style::Print(rest),
                style::SetAttribute(style::Attribute::Reset),
            )?;
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn items_follow_bindings() {
        let mut bindings = KeyBindings::default();
        bindings.close.clear();
        let items = menu_items(&bindings);
        assert_eq!(items[0], "[a][←] left");
        assert_eq!(items[2], "[Enter][Space] details");
        assert!(!items.iter().any(|i| i.ends_with("close")));
    }

    #[test]
    fn brackets_print_verbatim() {
        let mut out = Vec::new();
        print_menu_item(&mut out, "[q] quit").unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("[q]"));
        assert!(text.contains(" quit"));
    }
}
