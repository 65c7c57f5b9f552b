use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::figure::FigureNumber;
use crate::model::ids::ChapterId;

/// Figure number → asset filename overrides, keyed by chapter.
///
/// Source images are not named after their figures, so the asset for figure
/// `1.2` of chapter `1` has to be looked up here. Figures without an entry use
/// [`FigureNumber::standard_filename`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageMap {
    chapters: BTreeMap<ChapterId, BTreeMap<String, String>>,
}

impl ImageMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the filename for a figure in a chapter.
    pub fn insert(
        &mut self,
        chapter: ChapterId,
        figure: &FigureNumber,
        filename: impl Into<String>,
    ) -> Option<String> {
        self.chapters
            .entry(chapter)
            .or_default()
            .insert(figure.as_str().to_owned(), filename.into())
    }

    #[must_use]
    pub fn with(mut self, chapter: ChapterId, figure: &FigureNumber, filename: &str) -> Self {
        self.insert(chapter, figure, filename);
        self
    }

    /// The mapped filename, if one is configured.
    #[must_use]
    pub fn get(&self, chapter: &ChapterId, figure: &FigureNumber) -> Option<&str> {
        self.chapters
            .get(chapter)
            .and_then(|figures| figures.get(figure.as_str()))
            .map(String::as_str)
    }

    /// The mapped filename, or the figure's standard filename.
    #[must_use]
    pub fn filename_for(&self, chapter: &ChapterId, figure: &FigureNumber) -> String {
        self.get(chapter, figure)
            .map_or_else(|| figure.standard_filename(), str::to_owned)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.chapters.values().map(BTreeMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
