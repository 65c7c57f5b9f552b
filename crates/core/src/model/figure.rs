use serde::{Deserialize, Serialize};
use std::fmt;

/// Dotted label identifying the source figure of a question, e.g. `"1.3"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FigureNumber(String);

impl FigureNumber {
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into().trim().to_owned())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric ordering key.
    ///
    /// Everything except digits, `.` and `-` is stripped, then the longest
    /// leading float is parsed. Labels without a number sort as `0.0`, so
    /// `"1.10"` (1.1) orders before `"1.2"`.
    #[must_use]
    pub fn sort_key(&self) -> f64 {
        let cleaned: String = self
            .0
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
            .collect();
        leading_float(&cleaned).unwrap_or(0.0)
    }

    /// Conventional asset name: `"1.3"` becomes `figure_1_3.jpg`.
    #[must_use]
    pub fn standard_filename(&self) -> String {
        format!("figure_{}.jpg", self.0.replace('.', "_"))
    }
}

fn leading_float(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut end = 0;
    if bytes.first() == Some(&b'-') {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut has_digits = end > digits_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start {
            has_digits = true;
            end = frac_end;
        }
    }
    if !has_digits {
        return None;
    }
    s[..end].parse::<f64>().ok()
}

impl fmt::Display for FigureNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_key_parses_dotted_labels_as_floats() {
        assert!((FigureNumber::new("1.3").sort_key() - 1.3).abs() < f64::EPSILON);
        assert!((FigureNumber::new("Figure 2.5").sort_key() - 2.5).abs() < f64::EPSILON);
        assert!((FigureNumber::new("1.2.3").sort_key() - 1.2).abs() < f64::EPSILON);
        assert!((FigureNumber::new("4.").sort_key() - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn abbreviation_dot_is_kept_when_stripping_letters() {
        // "Fig. 2.5" strips to ".2.5", whose leading float is 0.2.
        assert!((FigureNumber::new("Fig. 2.5").sort_key() - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn one_point_ten_sorts_before_one_point_two() {
        let ten = FigureNumber::new("1.10").sort_key();
        let two = FigureNumber::new("1.2").sort_key();
        assert!(ten < two);
    }

    #[test]
    fn labels_without_numbers_sort_as_zero() {
        assert_eq!(FigureNumber::new("A").sort_key(), 0.0);
        assert_eq!(FigureNumber::new("").sort_key(), 0.0);
        assert_eq!(FigureNumber::new("-").sort_key(), 0.0);
    }

    #[test]
    fn standard_filename_replaces_dots() {
        assert_eq!(FigureNumber::new("1.2").standard_filename(), "figure_1_2.jpg");
        assert_eq!(FigureNumber::new(" 3 ").standard_filename(), "figure_3.jpg");
    }
}
