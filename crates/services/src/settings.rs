use quiz_core::model::{ChapterId, ImageMap};

/// Placeholder served when a question has no usable image.
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "/api/placeholder/400/300";

/// URL prefix under which chapter assets are served.
pub const DEFAULT_ASSET_BASE: &str = "/data";

/// Knobs for the question and progress stores, resolved by the binary.
#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub asset_base: String,
    pub placeholder_image: String,
    pub image_map: ImageMap,
    pub use_fixtures: bool,
    pub default_chapter: ChapterId,
    pub chapters: Vec<ChapterId>,
    pub profile_key: String,
}

impl StoreSettings {
    #[must_use]
    pub fn new(default_chapter: ChapterId) -> Self {
        Self {
            asset_base: DEFAULT_ASSET_BASE.to_owned(),
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.to_owned(),
            image_map: ImageMap::default(),
            use_fixtures: false,
            chapters: vec![default_chapter.clone()],
            default_chapter,
            profile_key: crate::progress_store::DEFAULT_PROFILE_KEY.to_owned(),
        }
    }
}
