//! Line layout for the PDF backend.
//!
//! PDF has no flowing text, so pagination and alignment are computed here, in
//! PostScript points, before anything touches the PDF writer. The planner
//! walks the document once and produces pages of absolutely positioned text
//! items: whole lines for left-aligned and centered text, individual words
//! for justified lines (inter-word gaps are stretched by positioning, which
//! survives any font encoding).
//!
//! Text measurement sits behind [`TextMeasure`] so the layout logic is
//! testable on synthetic fixed-advance metrics without font files.

use crate::error::ExportError;
use crate::ir::{Document, ListItem, Run};
use crate::render::{render_document, RenderBackend};
use crate::style::{mm_to_pt, GostProfile};

/// The face a piece of text renders in. Bold wins over italic when a run
/// carries both flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStyle {
    Regular,
    Bold,
    Italic,
}

impl RunStyle {
    pub fn of(run: &Run) -> RunStyle {
        if run.bold {
            RunStyle::Bold
        } else if run.italic {
            RunStyle::Italic
        } else {
            RunStyle::Regular
        }
    }
}

/// Width of a text span in points at the given size.
pub trait TextMeasure {
    fn text_width_pt(&self, text: &str, style: RunStyle, size_pt: f64) -> f64;
}

/// One absolutely positioned piece of text.
///
/// `baseline_pt` is measured from the top edge of the page; the PDF writer
/// flips it into the bottom-left coordinate system.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedText {
    pub x_pt: f64,
    pub baseline_pt: f64,
    pub size_pt: f64,
    pub style: RunStyle,
    pub text: String,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Page {
    pub items: Vec<PlacedText>,
}

enum Align {
    Left,
    Center,
    Justify,
}

/// Plan the full document into positioned pages.
pub fn plan_document<M: TextMeasure>(
    doc: &Document,
    profile: &GostProfile,
    measure: &M,
) -> Result<Vec<Page>, ExportError> {
    let mut planner = Planner::new(profile, measure);
    render_document(doc, &mut planner)?;
    Ok(planner.finish())
}

struct Planner<'a, M> {
    profile: &'a GostProfile,
    measure: &'a M,
    left_pt: f64,
    content_width_pt: f64,
    top_pt: f64,
    bottom_limit_pt: f64,
    pages: Vec<Page>,
    /// Baseline of the last placed line, from page top. `top_pt` means the
    /// current page is still empty.
    cursor_pt: f64,
}

impl<'a, M: TextMeasure> Planner<'a, M> {
    fn new(profile: &'a GostProfile, measure: &'a M) -> Self {
        let left_pt = mm_to_pt(profile.margin_left_mm);
        let right_pt = mm_to_pt(profile.page_width_mm - profile.margin_right_mm);
        let top_pt = mm_to_pt(profile.margin_top_mm);
        let bottom_limit_pt = mm_to_pt(profile.page_height_mm - profile.margin_bottom_mm);
        Planner {
            profile,
            measure,
            left_pt,
            content_width_pt: right_pt - left_pt,
            top_pt,
            bottom_limit_pt,
            pages: vec![Page::default()],
            cursor_pt: top_pt,
        }
    }

    fn finish(self) -> Vec<Page> {
        self.pages
    }

    /// Advance to the next baseline, breaking the page when the line would
    /// cross the bottom margin. Returns the baseline position.
    fn next_baseline(&mut self, size_pt: f64) -> f64 {
        let leading = size_pt * self.profile.line_spacing;
        let baseline = self.cursor_pt + leading;
        if baseline > self.bottom_limit_pt {
            self.pages.push(Page::default());
            self.cursor_pt = self.top_pt + leading;
        } else {
            self.cursor_pt = baseline;
        }
        self.cursor_pt
    }

    fn blank_line(&mut self, size_pt: f64) {
        // Vertical gap only; never forces a page break on its own.
        let leading = size_pt * self.profile.line_spacing;
        if self.cursor_pt + leading <= self.bottom_limit_pt {
            self.cursor_pt += leading;
        }
    }

    fn place(&mut self, item: PlacedText) {
        // pages is never empty
        if let Some(page) = self.pages.last_mut() {
            page.items.push(item);
        }
    }

    /// Lay out one paragraph of uniformly styled text.
    ///
    /// `first_indent_pt` applies to the first line only, `left_indent_pt` to
    /// every line. Justified paragraphs stretch inter-word gaps on every line
    /// but the last; single-word lines stay left-aligned.
    fn paragraph(
        &mut self,
        text: &str,
        style: RunStyle,
        size_pt: f64,
        first_indent_pt: f64,
        left_indent_pt: f64,
        align: Align,
    ) {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return;
        }
        let space_w = self.measure.text_width_pt(" ", style, size_pt);
        let widths: Vec<f64> = words
            .iter()
            .map(|w| self.measure.text_width_pt(w, style, size_pt))
            .collect();

        let lines = self.wrap(&words, &widths, space_w, first_indent_pt, left_indent_pt);
        let last = lines.len() - 1;
        for (li, line) in lines.iter().enumerate() {
            let indent = if li == 0 { first_indent_pt } else { 0.0 };
            let avail = self.content_width_pt - left_indent_pt - indent;
            let natural: f64 = line.iter().map(|&wi| widths[wi]).sum::<f64>()
                + space_w * (line.len() - 1) as f64;
            let baseline = self.next_baseline(size_pt);
            let line_left = self.left_pt + left_indent_pt + indent;

            match align {
                Align::Center => {
                    let x = self.left_pt + (self.content_width_pt - natural) / 2.0;
                    self.place_line(line, words.as_slice(), x, baseline, style, size_pt);
                }
                Align::Justify if li != last && line.len() > 1 && natural < avail => {
                    let extra = (avail - natural) / (line.len() - 1) as f64;
                    let mut x = line_left;
                    for &wi in line {
                        self.place(PlacedText {
                            x_pt: x,
                            baseline_pt: baseline,
                            size_pt,
                            style,
                            text: words[wi].to_string(),
                        });
                        x += widths[wi] + space_w + extra;
                    }
                }
                _ => {
                    self.place_line(line, words.as_slice(), line_left, baseline, style, size_pt);
                }
            }
        }
    }

    fn place_line(
        &mut self,
        line: &[usize],
        words: &[&str],
        x: f64,
        baseline: f64,
        style: RunStyle,
        size_pt: f64,
    ) {
        let text = line
            .iter()
            .map(|&wi| words[wi])
            .collect::<Vec<_>>()
            .join(" ");
        self.place(PlacedText {
            x_pt: x,
            baseline_pt: baseline,
            size_pt,
            style,
            text,
        });
    }

    /// Greedy wrap: word indices per line. A word wider than the line gets a
    /// line of its own and overflows the right margin rather than being cut.
    fn wrap(
        &self,
        words: &[&str],
        widths: &[f64],
        space_w: f64,
        first_indent_pt: f64,
        left_indent_pt: f64,
    ) -> Vec<Vec<usize>> {
        let mut lines: Vec<Vec<usize>> = Vec::new();
        let mut line: Vec<usize> = Vec::new();
        let mut line_w = 0.0;
        for (i, _) in words.iter().enumerate() {
            let indent = if lines.is_empty() { first_indent_pt } else { 0.0 };
            let avail = self.content_width_pt - left_indent_pt - indent;
            let candidate = if line.is_empty() {
                widths[i]
            } else {
                line_w + space_w + widths[i]
            };
            if !line.is_empty() && candidate > avail {
                lines.push(std::mem::take(&mut line));
                line_w = widths[i];
                line.push(i);
            } else {
                line_w = candidate;
                line.push(i);
            }
        }
        if !line.is_empty() {
            lines.push(line);
        }
        lines
    }
}

impl<M: TextMeasure> RenderBackend for Planner<'_, M> {
    fn begin_document(&mut self, doc: &Document) -> Result<(), ExportError> {
        self.paragraph(
            &doc.title,
            RunStyle::Bold,
            self.profile.title_size_pt,
            0.0,
            0.0,
            Align::Center,
        );
        self.blank_line(self.profile.body_size_pt);
        Ok(())
    }

    fn emit_heading(&mut self, level: u8, runs: &[Run]) -> Result<(), ExportError> {
        let text = runs
            .iter()
            .map(|r| r.text.as_str())
            .collect::<Vec<_>>()
            .join("");
        let align = if self.profile.heading_centered(level) {
            Align::Center
        } else {
            Align::Left
        };
        self.blank_line(self.profile.body_size_pt);
        self.paragraph(
            &text,
            RunStyle::Bold,
            self.profile.heading_size_pt,
            0.0,
            0.0,
            align,
        );
        Ok(())
    }

    /// Each style segment lays out as its own paragraph; only the first one
    /// carries the first-line indent, so the group still reads as a single
    /// indented paragraph.
    fn emit_paragraph(&mut self, runs: &[Run]) -> Result<(), ExportError> {
        let first_indent = mm_to_pt(self.profile.first_line_indent_mm);
        for (i, run) in runs.iter().enumerate() {
            let indent = if i == 0 { first_indent } else { 0.0 };
            self.paragraph(
                &run.text,
                RunStyle::of(run),
                self.profile.body_size_pt,
                indent,
                0.0,
                Align::Justify,
            );
        }
        Ok(())
    }

    fn emit_list(&mut self, items: &[ListItem]) -> Result<(), ExportError> {
        let indent = mm_to_pt(self.profile.list_indent_mm);
        for (n, item) in items.iter().enumerate() {
            for (i, run) in item.runs.iter().enumerate() {
                let text = if i == 0 {
                    format!("{}. {}", n + 1, run.text)
                } else {
                    run.text.clone()
                };
                self.paragraph(
                    &text,
                    RunStyle::of(run),
                    self.profile.body_size_pt,
                    0.0,
                    indent,
                    Align::Justify,
                );
            }
        }
        Ok(())
    }

    fn end_document(&mut self) -> Result<(), ExportError> {
        Ok(())
    }
}
