use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use quiz_core::model::{ChapterId, ImageMap, Question};

use crate::records::{parse_questions_csv, parse_questions_json};
use crate::repository::{QuestionSource, StorageError};

/// Name of the flat tabular resource under the data root.
pub const QUESTIONS_CSV: &str = "questions.csv";

/// Question resources laid out on disk under a data root:
///
/// ```text
/// <root>/questions.csv
/// <root>/chapters/chapter{N}/questions.json
/// <root>/chapters/chapter{N}/images/{filename}
/// ```
#[derive(Debug, Clone)]
pub struct FsQuestionSource {
    root: PathBuf,
}

impl FsQuestionSource {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn chapter_dir(&self, chapter: &ChapterId) -> PathBuf {
        self.root.join("chapters").join(format!("chapter{chapter}"))
    }

    #[must_use]
    pub fn chapter_file(&self, chapter: &ChapterId) -> PathBuf {
        self.chapter_dir(chapter).join("questions.json")
    }

    #[must_use]
    pub fn tabular_file(&self) -> PathBuf {
        self.root.join(QUESTIONS_CSV)
    }
}

async fn read_text(path: &Path) -> Result<String, StorageError> {
    tokio::fs::read_to_string(path).await.map_err(|err| {
        if err.kind() == ErrorKind::NotFound {
            StorageError::NotFound
        } else {
            StorageError::Io(format!("{}: {err}", path.display()))
        }
    })
}

#[async_trait]
impl QuestionSource for FsQuestionSource {
    async fn chapter_questions(&self, chapter: &ChapterId) -> Result<Vec<Question>, StorageError> {
        let path = self.chapter_file(chapter);
        let text = read_text(&path).await?;
        let questions = parse_questions_json(&text, Some(chapter))?;
        tracing::debug!(path = %path.display(), count = questions.len(), "loaded chapter questions");
        Ok(questions)
    }

    async fn all_questions(&self) -> Result<Vec<Question>, StorageError> {
        let path = self.tabular_file();
        let text = read_text(&path).await?;
        let questions = parse_questions_csv(&text)?;
        tracing::debug!(path = %path.display(), count = questions.len(), "loaded tabular questions");
        Ok(questions)
    }
}

/// Read an image map from a JSON file shaped `{ "<chapter>": { "<figure>": "<file>" } }`.
///
/// # Errors
///
/// Returns `StorageError::NotFound` if the file is missing, or
/// `StorageError::Serialization` if it is not a valid map.
pub async fn load_image_map(path: &Path) -> Result<ImageMap, StorageError> {
    let text = read_text(path).await?;
    serde_json::from_str(&text).map_err(|err| StorageError::Serialization(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::FigureNumber;

    #[test]
    fn chapter_paths_follow_layout() {
        let source = FsQuestionSource::new("/srv/data");
        let chapter = ChapterId::new("3").unwrap();
        assert_eq!(
            source.chapter_file(&chapter),
            PathBuf::from("/srv/data/chapters/chapter3/questions.json")
        );
        assert_eq!(source.tabular_file(), PathBuf::from("/srv/data/questions.csv"));
    }

    #[tokio::test]
    async fn missing_files_are_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let source = FsQuestionSource::new(dir.path());
        let chapter = ChapterId::new("1").unwrap();
        assert!(matches!(
            source.chapter_questions(&chapter).await,
            Err(StorageError::NotFound)
        ));
        assert!(matches!(
            source.all_questions().await,
            Err(StorageError::NotFound)
        ));
        assert!(matches!(
            load_image_map(&dir.path().join("image_map.json")).await,
            Err(StorageError::NotFound)
        ));
    }

    #[tokio::test]
    async fn loads_image_map_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image_map.json");
        std::fs::write(&path, r#"{"1": {"1.1": "page_028.jpg"}}"#).unwrap();

        let map = load_image_map(&path).await.unwrap();
        let chapter = ChapterId::new("1").unwrap();
        assert_eq!(
            map.get(&chapter, &FigureNumber::new("1.1")),
            Some("page_028.jpg")
        );
    }
}
