//! Markup normalization (editor dialect → marker stream)
//!
//! The rich-text editor stores section content in a restricted HTML dialect:
//! paragraph and line breaks, emphasis, headings 1-6, ordered lists and a
//! handful of character entities. Normalization replaces every recognized tag
//! with a paired non-printable marker (private-use-area characters) in a
//! single left-to-right scan, decodes the supported entities and silently
//! strips everything else. The marker stream is what [`crate::ir::blocks`]
//! consumes.
//!
//! Degradation policy (a behavioral contract, not an implementation detail):
//! unknown tags are deleted without error, unmatched markers are closed at the
//! paragraph boundary by the block parser, and unsupported entities pass
//! through literally.

use log::debug;

/// Paragraph separator emitted for `<br>`, `<p>` and `</p>`.
pub const SEP: char = '\n';

/// Italic span markers.
pub const ITALIC_START: char = '\u{E000}';
pub const ITALIC_END: char = '\u{E001}';

/// Ordered-list region markers.
pub const LIST_START: char = '\u{E010}';
pub const LIST_END: char = '\u{E011}';

/// List-item markers.
pub const ITEM_START: char = '\u{E012}';
pub const ITEM_END: char = '\u{E013}';

const HEADING_START_BASE: u32 = 0xE020;
const HEADING_END_BASE: u32 = 0xE028;

/// Start marker for a heading of `level` (1-6).
pub fn heading_start(level: u8) -> char {
    debug_assert!((1..=6).contains(&level));
    char::from_u32(HEADING_START_BASE + (level as u32 - 1)).unwrap_or('\u{E020}')
}

/// End marker for a heading of `level` (1-6).
pub fn heading_end(level: u8) -> char {
    debug_assert!((1..=6).contains(&level));
    char::from_u32(HEADING_END_BASE + (level as u32 - 1)).unwrap_or('\u{E028}')
}

/// If `c` is a heading start marker, its level.
pub fn heading_start_level(c: char) -> Option<u8> {
    let code = c as u32;
    if (HEADING_START_BASE..HEADING_START_BASE + 6).contains(&code) {
        Some((code - HEADING_START_BASE) as u8 + 1)
    } else {
        None
    }
}

/// Whether `c` is any internal marker character.
pub fn is_marker(c: char) -> bool {
    matches!(c, '\u{E000}'..='\u{E02F}')
}

/// Remove every marker character from `text`, leaving the literal content.
/// This is the worst-case degradation path for pathological nesting.
pub fn strip_markers(text: &str) -> String {
    text.chars().filter(|c| !is_marker(*c)).collect()
}

/// Normalize a raw markup string into the marker stream.
///
/// Consecutive paragraph separators collapse to one; leading and trailing
/// separators are dropped. Input consisting only of whitespace and separators
/// yields an empty string, which the caller treats as "no blocks".
pub fn normalize(input: &str) -> String {
    let substituted = substitute_tags(input);
    collapse_separators(&substituted)
}

/// One left-to-right pass replacing tags with markers and decoding entities.
fn substitute_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find(['<', '&']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        if tail.starts_with('<') {
            match tail.find('>') {
                Some(end) => {
                    emit_tag_marker(&tail[1..end], &mut out);
                    rest = &tail[end + 1..];
                }
                None => {
                    // No closing '>': the '<' is literal text.
                    out.push_str(tail);
                    return out;
                }
            }
        } else {
            let consumed = decode_entity(tail, &mut out);
            rest = &tail[consumed..];
        }
    }
    out.push_str(rest);
    out
}

/// Append the marker for one tag body (text between `<` and `>`), if any.
/// Attributes are ignored; only the tag name drives marker selection.
fn emit_tag_marker(body: &str, out: &mut String) {
    let trimmed = body.trim();
    let (closing, name_part) = match trimmed.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let name: String = name_part
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();

    match name.as_str() {
        "br" | "p" => out.push(SEP),
        "i" | "em" => out.push(if closing { ITALIC_END } else { ITALIC_START }),
        "ol" => out.push(if closing { LIST_END } else { LIST_START }),
        "li" => out.push(if closing { ITEM_END } else { ITEM_START }),
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let level = name.as_bytes()[1] - b'0';
            out.push(if closing {
                heading_end(level)
            } else {
                heading_start(level)
            });
        }
        _ => {
            // Unsupported tag: delete silently, keep the content around it.
            debug!("dropping unsupported tag '<{body}>'");
        }
    }
}

/// Decode one entity at the start of `tail` (which begins with `&`).
/// Returns the number of bytes consumed. Only the six supported entities are
/// transformed; everything else stays literal.
fn decode_entity(tail: &str, out: &mut String) -> usize {
    const ENTITIES: &[(&str, char)] = &[
        ("&nbsp;", ' '),
        ("&amp;", '&'),
        ("&lt;", '<'),
        ("&gt;", '>'),
        ("&quot;", '"'),
        ("&apos;", '\''),
    ];
    for (entity, ch) in ENTITIES {
        if tail.starts_with(entity) {
            out.push(*ch);
            return entity.len();
        }
    }
    out.push('&');
    1
}

/// Collapse runs of separators and trim separator/whitespace-only input.
fn collapse_separators(input: &str) -> String {
    if input.trim().is_empty() {
        return String::new();
    }
    let mut out = String::with_capacity(input.len());
    let mut pending_sep = false;
    for c in input.chars() {
        if c == SEP {
            pending_sep = !out.is_empty();
        } else {
            if pending_sep {
                out.push(SEP);
                pending_sep = false;
            }
            out.push(c);
        }
    }
    out
}
