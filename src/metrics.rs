/// Text measurement used to center field labels on their anchor.
pub trait TextMetrics {
    /// Length of one rendered line of `text`.
    fn line_size(&self, text: &str, size: f64, line_width: f64) -> f64;

    /// Distance between two consecutive baselines.
    fn interline(&self, size: f64, line_width: f64) -> f64;
}

/// Measures everything as zero, so labels land exactly on their anchors.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMetrics;

impl TextMetrics for NoMetrics {
    fn line_size(&self, _text: &str, _size: f64, _line_width: f64) -> f64 {
        0.0
    }

    fn interline(&self, _size: f64, _line_width: f64) -> f64 {
        0.0
    }
}

/// Fixed-advance approximation of the KiCad stroke font.
#[derive(Debug, Clone, Copy)]
pub struct StrokeFontMetrics {
    /// Glyph advance as a fraction of the text size.
    pub advance: f64,
    /// Baseline pitch as a fraction of the text size.
    pub interline_pitch: f64,
}

impl Default for StrokeFontMetrics {
    fn default() -> Self {
        StrokeFontMetrics {
            advance: 0.8,
            interline_pitch: 1.62,
        }
    }
}

impl TextMetrics for StrokeFontMetrics {
    fn line_size(&self, text: &str, size: f64, line_width: f64) -> f64 {
        let glyphs = text.chars().count() as f64;
        if glyphs == 0.0 {
            return 0.0;
        }
        glyphs * size * self.advance + line_width
    }

    fn interline(&self, size: f64, line_width: f64) -> f64 {
        size * self.interline_pitch + line_width
    }
}
