//! Block parsing (marker stream → typed blocks)
//!
//! Consumes the normalized marker stream and produces the ordered block
//! sequence a section renders from. The parser is strictly best-effort: it
//! never fails on malformed markup. Unmatched start markers keep their
//! feature open until the end of the paragraph (never across paragraphs), and
//! pathological nesting degrades to a paragraph of marker-stripped literal
//! text rather than an error.

use crate::ir::markup::{
    self, heading_end, heading_start_level, ITALIC_END, ITALIC_START, ITEM_END, ITEM_START,
    LIST_END, LIST_START, SEP,
};
use crate::ir::nodes::{Block, ListItem, Run};

/// Parse a normalized marker stream into blocks.
pub fn parse_blocks(normalized: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    for chunk in normalized.split(SEP) {
        if chunk.trim().is_empty() {
            continue;
        }
        parse_chunk(chunk, &mut blocks);
    }
    blocks
}

/// Parse one paragraph-sized chunk, appending blocks in source order.
///
/// Iterates over the remaining tail after every extracted heading or list, so
/// a chunk with any number of structural elements parses in constant stack.
fn parse_chunk(text: &str, out: &mut Vec<Block>) {
    let mut text = text;
    loop {
        let heading = text
            .char_indices()
            .find_map(|(i, c)| heading_start_level(c).map(|level| (i, c, level)));
        if let Some((idx, marker, level)) = heading {
            let before = &text[..idx];
            let after = &text[idx + marker.len_utf8()..];
            let end_marker = heading_end(level);
            let (inner, rest) = match after.find(end_marker) {
                // Unmatched heading start: the heading runs to the end of the
                // paragraph, never into the next one.
                Some(e) => (&after[..e], &after[e + end_marker.len_utf8()..]),
                None => (after, ""),
            };
            push_paragraph(before, out);
            let runs = parse_runs(inner);
            if !runs.is_empty() {
                out.push(Block::Heading { level, runs });
            }
            if rest.trim().is_empty() {
                return;
            }
            text = rest;
            continue;
        }

        if let Some(idx) = text.find(LIST_START) {
            let before = &text[..idx];
            let after = &text[idx + LIST_START.len_utf8()..];
            let (region, rest) = match after.find(LIST_END) {
                Some(e) => (&after[..e], &after[e + LIST_END.len_utf8()..]),
                None => (after, ""),
            };
            push_paragraph(before, out);
            let items = parse_list_items(region);
            if !items.is_empty() {
                out.push(Block::OrderedList { items });
            }
            if rest.trim().is_empty() {
                return;
            }
            text = rest;
            continue;
        }

        push_paragraph(text, out);
        return;
    }
}

fn push_paragraph(text: &str, out: &mut Vec<Block>) {
    let runs = parse_runs(text);
    if !runs.is_empty() {
        out.push(Block::Paragraph { runs });
    }
}

/// Split a list region on item markers. The fragment before the first item
/// marker is pre-list filler and is discarded.
fn parse_list_items(region: &str) -> Vec<ListItem> {
    let mut items = Vec::new();
    for fragment in region.split(ITEM_START).skip(1) {
        let content = match fragment.find(ITEM_END) {
            Some(e) => &fragment[..e],
            None => fragment,
        };
        let runs = parse_runs(content);
        if !runs.is_empty() {
            items.push(ListItem { runs });
        }
    }
    items
}

/// Parse the runs of one paragraph-level span of text.
///
/// Fragments between an italic start marker and the next end marker are
/// italic; an unmatched start keeps italic open to the end of the span.
/// Non-italic fragments are scanned for the `**`/`__` bold heuristic.
pub fn parse_runs(text: &str) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut fragments = text.split(ITALIC_START);
    if let Some(first) = fragments.next() {
        push_plain_runs(first, &mut runs);
    }
    for fragment in fragments {
        let (italic_part, rest) = match fragment.find(ITALIC_END) {
            Some(e) => (&fragment[..e], &fragment[e + ITALIC_END.len_utf8()..]),
            None => (fragment, ""),
        };
        let text = markup::strip_markers(italic_part);
        if !text.trim().is_empty() {
            runs.push(Run {
                text,
                italic: true,
                bold: false,
            });
        }
        push_plain_runs(rest, &mut runs);
    }
    runs
}

/// Bold heuristic: a literal `**` or `__` opens a bold run; the matching
/// delimiter closes it, a missing one keeps bold open to the end of the
/// fragment. The delimiters themselves are stripped.
fn push_plain_runs(text: &str, runs: &mut Vec<Run>) {
    let text = markup::strip_markers(text);
    let mut rest = text.as_str();
    loop {
        match find_bold_delimiter(rest) {
            None => {
                push_run(rest, false, runs);
                return;
            }
            Some((start, token)) => {
                push_run(&rest[..start], false, runs);
                let after = &rest[start + token.len()..];
                match after.find(token) {
                    Some(close) => {
                        push_run(&after[..close], true, runs);
                        rest = &after[close + token.len()..];
                    }
                    None => {
                        push_run(after, true, runs);
                        return;
                    }
                }
            }
        }
    }
}

fn find_bold_delimiter(text: &str) -> Option<(usize, &'static str)> {
    match (text.find("**"), text.find("__")) {
        (Some(s), Some(u)) if u < s => Some((u, "__")),
        (Some(s), _) => Some((s, "**")),
        (None, Some(u)) => Some((u, "__")),
        (None, None) => None,
    }
}

fn push_run(text: &str, bold: bool, runs: &mut Vec<Run>) {
    if text.trim().is_empty() {
        return;
    }
    runs.push(Run {
        text: text.to_string(),
        italic: false,
        bold,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::markup::normalize;

    fn parse(raw: &str) -> Vec<Block> {
        parse_blocks(&normalize(raw))
    }

    #[test]
    fn plain_paragraphs_split_on_boundaries() {
        let blocks = parse("<p>Первый.</p><p>Второй.</p>");
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph {
                    runs: vec![Run::plain("Первый.")]
                },
                Block::Paragraph {
                    runs: vec![Run::plain("Второй.")]
                },
            ]
        );
    }

    #[test]
    fn heading_with_surrounding_text() {
        let blocks = parse("до<h2>Обзор</h2>после");
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph {
                    runs: vec![Run::plain("до")]
                },
                Block::Heading {
                    level: 2,
                    runs: vec![Run::plain("Обзор")]
                },
                Block::Paragraph {
                    runs: vec![Run::plain("после")]
                },
            ]
        );
    }

    #[test]
    fn unclosed_heading_runs_to_end_of_paragraph() {
        let blocks = parse("<h3>Заголовок без конца");
        assert_eq!(
            blocks,
            vec![Block::Heading {
                level: 3,
                runs: vec![Run::plain("Заголовок без конца")]
            }]
        );
    }

    #[test]
    fn heading_does_not_bleed_across_paragraphs() {
        let blocks = parse("<h1>Открытый<p>обычный текст");
        assert_eq!(
            blocks,
            vec![
                Block::Heading {
                    level: 1,
                    runs: vec![Run::plain("Открытый")]
                },
                Block::Paragraph {
                    runs: vec![Run::plain("обычный текст")]
                },
            ]
        );
    }

    #[test]
    fn ordered_list_is_positional() {
        let blocks = parse("<ol><li>Первый</li><li>Второй</li></ol>");
        assert_eq!(
            blocks,
            vec![Block::OrderedList {
                items: vec![
                    ListItem {
                        runs: vec![Run::plain("Первый")]
                    },
                    ListItem {
                        runs: vec![Run::plain("Второй")]
                    },
                ]
            }]
        );
    }

    #[test]
    fn text_around_list_becomes_paragraphs() {
        let blocks = parse("введение<ol><li>один</li></ol>итог");
        assert_eq!(blocks.len(), 3);
        assert!(matches!(blocks[0], Block::Paragraph { .. }));
        assert!(matches!(blocks[1], Block::OrderedList { .. }));
        assert!(matches!(blocks[2], Block::Paragraph { .. }));
    }

    #[test]
    fn list_without_items_is_dropped() {
        assert_eq!(parse("<ol></ol>"), Vec::<Block>::new());
    }

    #[test]
    fn italic_spans() {
        let blocks = parse("до <i>внутри</i> после");
        assert_eq!(
            blocks,
            vec![Block::Paragraph {
                runs: vec![
                    Run::plain("до "),
                    Run::italic("внутри"),
                    Run::plain(" после"),
                ]
            }]
        );
    }

    #[test]
    fn unclosed_italic_runs_to_end_of_paragraph() {
        let blocks = parse("<i>italic forever");
        assert_eq!(
            blocks,
            vec![Block::Paragraph {
                runs: vec![Run::italic("italic forever")]
            }]
        );
    }

    #[test]
    fn bold_heuristic_splits_runs() {
        let blocks = parse("<p>Текст **важно** обычный.</p>");
        assert_eq!(
            blocks,
            vec![Block::Paragraph {
                runs: vec![
                    Run::plain("Текст "),
                    Run::bold("важно"),
                    Run::plain(" обычный."),
                ]
            }]
        );
    }

    #[test]
    fn underscore_bold_and_unmatched_opener() {
        let blocks = parse("__жирный__ хвост");
        assert_eq!(
            blocks,
            vec![Block::Paragraph {
                runs: vec![Run::bold("жирный"), Run::plain(" хвост")]
            }]
        );

        let blocks = parse("**до конца");
        assert_eq!(
            blocks,
            vec![Block::Paragraph {
                runs: vec![Run::bold("до конца")]
            }]
        );
    }

    #[test]
    fn heading_then_bold_paragraph() {
        let blocks = parse("<h1>Введение</h1><p>Текст **важно** обычный.</p>");
        assert_eq!(blocks.len(), 2);
        assert_eq!(
            blocks[0],
            Block::Heading {
                level: 1,
                runs: vec![Run::plain("Введение")]
            }
        );
    }

    #[test]
    fn huge_chunk_of_headings_parses_flat() {
        // No paragraph separators, so all of this is one chunk.
        let blocks = parse(&"<h1>x</h1>".repeat(100_000));
        assert_eq!(blocks.len(), 100_000);
        assert!(blocks.iter().all(|b| matches!(
            b,
            Block::Heading { level: 1, .. }
        )));

        let blocks = parse(&"<ol><li>y</li></ol>".repeat(50_000));
        assert_eq!(blocks.len(), 50_000);
    }

    #[test]
    fn whitespace_only_input_yields_no_blocks() {
        assert_eq!(parse("<p>   </p>"), Vec::<Block>::new());
        assert_eq!(parse(""), Vec::<Block>::new());
    }

    #[test]
    fn stray_end_markers_are_stripped() {
        let blocks = parse("хвост</i> текста</h2>");
        assert_eq!(
            blocks,
            vec![Block::Paragraph {
                runs: vec![Run::plain("хвост текста")]
            }]
        );
    }

    #[test]
    fn runs_are_never_blank() {
        let blocks = parse("<i> </i>x** **y");
        for block in &blocks {
            if let Block::Paragraph { runs } = block {
                for run in runs {
                    assert!(!run.text.trim().is_empty());
                }
            }
        }
    }
}
