use quiz_core::model::{Category, Question};

use crate::quiz::order::{CategoryFilter, sort_by_figure};

/// Image zoom in percent, clamped to `[MIN, MAX]` in `STEP` increments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoomLevel(u16);

impl ZoomLevel {
    pub const MIN: u16 = 60;
    pub const MAX: u16 = 200;
    pub const STEP: u16 = 20;
    pub const DEFAULT: u16 = 100;

    #[must_use]
    pub fn percent(self) -> u16 {
        self.0
    }

    /// CSS scale factor.
    #[must_use]
    pub fn scale(self) -> f32 {
        f32::from(self.0) / 100.0
    }

    #[must_use]
    pub fn zoom_in(self) -> Self {
        Self((self.0 + Self::STEP).min(Self::MAX))
    }

    #[must_use]
    pub fn zoom_out(self) -> Self {
        Self(self.0.saturating_sub(Self::STEP).max(Self::MIN))
    }

    #[must_use]
    pub fn can_zoom_in(self) -> bool {
        self.0 < Self::MAX
    }

    #[must_use]
    pub fn can_zoom_out(self) -> bool {
        self.0 > Self::MIN
    }
}

impl Default for ZoomLevel {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

/// Figure-by-figure browsing of a chapter, ordered by figure number.
#[derive(Debug, Clone, Default)]
pub struct StudyFlow {
    questions: Vec<Question>,
    view: Vec<Question>,
    filter: CategoryFilter,
    index: usize,
    zoom: ZoomLevel,
    revealed: bool,
}

impl StudyFlow {
    #[must_use]
    pub fn new(mut questions: Vec<Question>) -> Self {
        sort_by_figure(&mut questions);
        let view = questions.clone();
        Self {
            questions,
            view,
            ..Self::default()
        }
    }

    pub fn set_filter(&mut self, filter: CategoryFilter) {
        self.view = filter.apply(&self.questions);
        self.filter = filter;
        self.index = 0;
        self.revealed = false;
    }

    /// Returns `false` when already on the last figure.
    pub fn next(&mut self) -> bool {
        if self.index + 1 >= self.view.len() {
            return false;
        }
        self.index += 1;
        self.revealed = false;
        true
    }

    /// Returns `false` when already on the first figure.
    pub fn previous(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        self.revealed = false;
        true
    }

    pub fn zoom_in(&mut self) {
        self.zoom = self.zoom.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.zoom = self.zoom.zoom_out();
    }

    pub fn reset_zoom(&mut self) {
        self.zoom = ZoomLevel::default();
    }

    pub fn toggle_answer(&mut self) {
        self.revealed = !self.revealed;
    }

    #[must_use]
    pub fn current(&self) -> Option<&Question> {
        self.view.get(self.index)
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.view.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.index + 1 < self.view.len()
    }

    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.index > 0
    }

    #[must_use]
    pub fn zoom(&self) -> ZoomLevel {
        self.zoom
    }

    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    #[must_use]
    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    #[must_use]
    pub fn categories(&self) -> Vec<Category> {
        let mut categories: Vec<Category> =
            self.questions.iter().map(|q| q.category().clone()).collect();
        categories.sort();
        categories.dedup();
        categories
    }
}
