//! The GOST 7.32-2017 style profile.
//!
//! Every layout constant used by the DOCX and PDF backends lives here. The
//! correctness contract for the two renderers is visual equivalence, so
//! neither backend is allowed to hardcode a page metric, font size or indent
//! of its own; both read the same [`GostProfile`] value. Tests may construct
//! modified profiles to exercise backend behavior under different metrics.

/// Formatting constants required by GOST 7.32-2017.
///
/// The profile is an immutable value passed explicitly into both renderers.
/// [`GostProfile::default`] yields the standard-compliant profile.
#[derive(Debug, Clone, PartialEq)]
pub struct GostProfile {
    /// Page width in millimeters (A4).
    pub page_width_mm: f64,
    /// Page height in millimeters (A4).
    pub page_height_mm: f64,
    /// Left page margin in millimeters.
    pub margin_left_mm: f64,
    /// Right page margin in millimeters.
    pub margin_right_mm: f64,
    /// Top page margin in millimeters.
    pub margin_top_mm: f64,
    /// Bottom page margin in millimeters.
    pub margin_bottom_mm: f64,
    /// Body and heading font family.
    pub font_family: String,
    /// Body text size in points.
    pub body_size_pt: f64,
    /// Section heading size in points.
    pub heading_size_pt: f64,
    /// Document title size in points.
    pub title_size_pt: f64,
    /// Line spacing as a multiple of single spacing.
    pub line_spacing: f64,
    /// First-line indent of body paragraphs in millimeters.
    pub first_line_indent_mm: f64,
    /// Indent of ordered-list items in millimeters.
    pub list_indent_mm: f64,
    /// Inclusive range of heading levels collected by the table of contents.
    pub toc_levels: (u8, u8),
}

impl Default for GostProfile {
    fn default() -> Self {
        GostProfile {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            margin_left_mm: 30.0,
            margin_right_mm: 15.0,
            margin_top_mm: 20.0,
            margin_bottom_mm: 20.0,
            font_family: "Times New Roman".to_string(),
            body_size_pt: 14.0,
            heading_size_pt: 14.0,
            title_size_pt: 16.0,
            line_spacing: 1.5,
            first_line_indent_mm: 12.5,
            list_indent_mm: 12.5,
            toc_levels: (1, 3),
        }
    }
}

impl GostProfile {
    /// Whether a heading of the given level is centered (level 1 and injected
    /// section headings) or left-aligned (levels 2-6).
    pub fn heading_centered(&self, level: u8) -> bool {
        level <= 1
    }

    /// Word-processor outline level for a heading: `level - 1`.
    pub fn outline_level(&self, level: u8) -> u8 {
        level.saturating_sub(1)
    }

    /// Line spacing in 240ths of a line, the unit WordprocessingML uses for
    /// `w:line` with `w:lineRule="auto"`. 1.5 line spacing is 360.
    pub fn line_units(&self) -> u32 {
        (self.line_spacing * 240.0).round() as u32
    }
}

/// Millimeters to twentieths of a point (the OOXML page metric unit).
pub fn mm_to_twips(mm: f64) -> u32 {
    (mm * 1440.0 / 25.4).round() as u32
}

/// Millimeters to PostScript points.
pub fn mm_to_pt(mm: f64) -> f64 {
    mm * 72.0 / 25.4
}

/// Points to millimeters.
pub fn pt_to_mm(pt: f64) -> f64 {
    pt * 25.4 / 72.0
}

/// Points to WordprocessingML half-points (`w:sz`).
pub fn pt_to_half_points(pt: f64) -> u32 {
    (pt * 2.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_matches_gost() {
        let profile = GostProfile::default();
        assert_eq!(profile.margin_left_mm, 30.0);
        assert_eq!(profile.margin_right_mm, 15.0);
        assert_eq!(profile.body_size_pt, 14.0);
        assert_eq!(profile.line_units(), 360);
        assert_eq!(profile.toc_levels, (1, 3));
    }

    #[test]
    fn unit_conversions() {
        // A4 in twips, as written into w:pgSz
        assert_eq!(mm_to_twips(210.0), 11906);
        assert_eq!(mm_to_twips(297.0), 16838);
        // GOST margins
        assert_eq!(mm_to_twips(30.0), 1701);
        assert_eq!(mm_to_twips(15.0), 850);
        assert_eq!(mm_to_twips(20.0), 1134);
        // First-line indent
        assert_eq!(mm_to_twips(12.5), 709);
        // 3 cm left margin in points, the value the PDF backend uses
        assert!((mm_to_pt(30.0) - 85.04).abs() < 0.01);
        assert_eq!(pt_to_half_points(14.0), 28);
    }

    #[test]
    fn heading_alignment_rules() {
        let profile = GostProfile::default();
        assert!(profile.heading_centered(1));
        assert!(!profile.heading_centered(2));
        assert_eq!(profile.outline_level(1), 0);
        assert_eq!(profile.outline_level(3), 2);
    }
}
