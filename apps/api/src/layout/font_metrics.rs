//! Static width tables for the two PDF base-14 families the export uses.
//!
//! Widths are in em units (AFM width / 1000). The tables cover ASCII
//! 0x20..=0x7E; index = (char as usize) - 32. Bold faces are approximated by
//! scaling the regular widths, which is close enough for wrapping and for
//! right-aligning short date strings.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Font family enum
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontFamily {
    /// Sans-serif; modern and creative templates.
    Helvetica,
    /// Serif; classic template.
    TimesRoman,
}

impl FontFamily {
    /// PostScript name of the base-14 font.
    pub fn base_font(&self, bold: bool) -> &'static str {
        match (self, bold) {
            (FontFamily::Helvetica, false) => "Helvetica",
            (FontFamily::Helvetica, true) => "Helvetica-Bold",
            (FontFamily::TimesRoman, false) => "Times-Roman",
            (FontFamily::TimesRoman, true) => "Times-Bold",
        }
    }

    /// CSS font stack for the HTML preview.
    pub fn css_stack(&self) -> &'static str {
        match self {
            FontFamily::Helvetica => "Helvetica, Arial, sans-serif",
            FontFamily::TimesRoman => "'Times New Roman', Times, serif",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
pub struct FontMetricTable {
    widths: [f32; 95],
    /// Fallback width for characters outside the table.
    average_char_width: f32,
    bullet_width: f32,
    en_dash_width: f32,
    bold_scale: f32,
}

impl FontMetricTable {
    fn char_width(&self, c: char) -> f32 {
        let code = c as usize;
        match c {
            _ if (32..=126).contains(&code) => self.widths[code - 32],
            '•' => self.bullet_width,
            '–' => self.en_dash_width,
            '—' => 1.0,
            _ => self.average_char_width,
        }
    }

    /// Width of `s` in em units.
    pub fn measure_str(&self, s: &str, bold: bool) -> f32 {
        let regular: f32 = s.chars().map(|c| self.char_width(c)).sum();
        if bold {
            regular * self.bold_scale
        } else {
            regular
        }
    }

    /// Width of `s` in points when set at `size_pt`.
    pub fn width_pt(&self, s: &str, size_pt: f32, bold: bool) -> f32 {
        self.measure_str(s, bold) * size_pt
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables
// ────────────────────────────────────────────────────────────────────────────

static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500, 0.667, 0.556, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222, 0.500, 0.222, 0.833,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
        // {      |      }      ~
        0.334, 0.260, 0.334, 0.584,
    ],
    average_char_width: 0.556,
    bullet_width: 0.350,
    en_dash_width: 0.556,
    bold_scale: 1.07,
};

static TIMES_ROMAN_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.250, 0.333, 0.408, 0.500, 0.500, 0.833, 0.778, 0.180, 0.333, 0.333, 0.500, 0.564, 0.250, 0.333, 0.250, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.564, 0.564, 0.564, 0.444, 0.921,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.722, 0.667, 0.667, 0.722, 0.611, 0.556, 0.722, 0.722, 0.333, 0.389, 0.722, 0.611, 0.889,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.722, 0.556, 0.722, 0.667, 0.556, 0.611, 0.722, 0.722, 0.944, 0.722, 0.722, 0.611,
        // [      \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.469, 0.500, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.444, 0.500, 0.444, 0.500, 0.444, 0.333, 0.500, 0.500, 0.278, 0.278, 0.500, 0.278, 0.778,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.500, 0.500, 0.500, 0.500, 0.333, 0.389, 0.278, 0.500, 0.500, 0.722, 0.500, 0.500, 0.444,
        // {      |      }      ~
        0.480, 0.200, 0.480, 0.541,
    ],
    average_char_width: 0.500,
    bullet_width: 0.350,
    en_dash_width: 0.500,
    bold_scale: 1.04,
};

/// Returns the static metric table for a given font family.
pub fn get_metrics(font: FontFamily) -> &'static FontMetricTable {
    match font {
        FontFamily::Helvetica => &HELVETICA_TABLE,
        FontFamily::TimesRoman => &TIMES_ROMAN_TABLE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_measure_str_empty_returns_zero() {
        assert_eq!(get_metrics(FontFamily::Helvetica).measure_str("", false), 0.0);
    }

    #[test]
    fn test_measure_str_ascii_characters() {
        let metrics = get_metrics(FontFamily::Helvetica);
        // R(0.722) + u(0.556) + s(0.500) + t(0.278)
        let width = metrics.measure_str("Rust", false);
        assert!(approx(width, 2.056), "got {width}");
    }

    #[test]
    fn test_times_is_narrower_than_helvetica() {
        let text = "Senior Software Engineer";
        let helvetica = get_metrics(FontFamily::Helvetica).measure_str(text, false);
        let times = get_metrics(FontFamily::TimesRoman).measure_str(text, false);
        assert!(times < helvetica);
    }

    #[test]
    fn test_bold_is_wider() {
        let metrics = get_metrics(FontFamily::TimesRoman);
        assert!(metrics.measure_str("Education", true) > metrics.measure_str("Education", false));
    }

    #[test]
    fn test_non_ascii_falls_back() {
        let metrics = get_metrics(FontFamily::Helvetica);
        assert!(approx(metrics.measure_str("é", false), metrics.average_char_width));
        assert!(approx(metrics.measure_str("•", false), 0.350));
    }

    #[test]
    fn test_width_pt_scales_with_size() {
        let metrics = get_metrics(FontFamily::Helvetica);
        assert!(approx(metrics.width_pt(" ", 10.0, false), 2.78));
    }

    #[test]
    fn test_base_font_names() {
        assert_eq!(FontFamily::Helvetica.base_font(true), "Helvetica-Bold");
        assert_eq!(FontFamily::TimesRoman.base_font(false), "Times-Roman");
    }
}
