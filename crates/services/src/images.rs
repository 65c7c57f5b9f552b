use quiz_core::model::{ImageMap, Question};
use url::Url;

use crate::settings::{DEFAULT_ASSET_BASE, DEFAULT_PLACEHOLDER_IMAGE};

/// Resolves the image to display for a question.
///
/// Resolution order:
/// 1. `image_url` that parses as an absolute URL is returned unchanged;
/// 2. any other non-blank `image_url` is returned as-is;
/// 3. a figure number maps to `{base}/chapters/chapter{N}/images/{file}`,
///    with `file` taken from the [`ImageMap`];
/// 4. otherwise the placeholder.
#[derive(Debug, Clone)]
pub struct ImageResolver {
    asset_base: String,
    placeholder: String,
    map: ImageMap,
}

impl Default for ImageResolver {
    fn default() -> Self {
        Self::new(DEFAULT_ASSET_BASE, DEFAULT_PLACEHOLDER_IMAGE, ImageMap::default())
    }
}

impl ImageResolver {
    #[must_use]
    pub fn new(asset_base: &str, placeholder: &str, map: ImageMap) -> Self {
        Self {
            asset_base: asset_base.trim_end_matches('/').to_owned(),
            placeholder: placeholder.to_owned(),
            map,
        }
    }

    #[must_use]
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Which rule applies to a question, with the resolved location.
    #[must_use]
    pub fn classify(&self, question: &Question) -> ImageSource {
        if let Some(raw) = question.image_url() {
            return if Url::parse(raw).is_ok() {
                ImageSource::Absolute(raw.to_owned())
            } else {
                ImageSource::Path(raw.to_owned())
            };
        }

        if let Some(figure) = question.figure_number() {
            let chapter = question.chapter();
            let file = self.map.filename_for(chapter, figure);
            return ImageSource::Figure(format!(
                "{}/chapters/chapter{chapter}/images/{file}",
                self.asset_base
            ));
        }

        ImageSource::Placeholder(self.placeholder.clone())
    }

    #[must_use]
    pub fn resolve(&self, question: &Question) -> String {
        self.classify(question).into_url()
    }
}

/// Outcome of image resolution, tagged with the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Absolute(String),
    Path(String),
    Figure(String),
    Placeholder(String),
}

impl ImageSource {
    #[must_use]
    pub fn into_url(self) -> String {
        match self {
            Self::Absolute(url) | Self::Path(url) | Self::Figure(url) | Self::Placeholder(url) => {
                url
            }
        }
    }

    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }
}
