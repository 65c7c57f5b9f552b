use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use quiz_core::model::ChapterId;

#[derive(Debug, Parser)]
#[command(name = "app", about = "Ocular pathology figure quiz")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub options: Options,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Launch the desktop quiz (default).
    Ui,
    /// Load every configured chapter and report what was found.
    Check,
    /// Clear stored quiz progress.
    Reset,
}

#[derive(Debug, Clone, Args)]
pub struct Options {
    /// SQLite database holding progress.
    #[arg(long = "db", env = "QUIZ_DB_URL", default_value = "sqlite://quiz.sqlite3", global = true)]
    pub db_url: String,

    /// Directory with `questions.csv` and `chapters/chapter{N}/`.
    #[arg(long, env = "QUIZ_DATA_DIR", default_value = "data", global = true)]
    pub data_dir: PathBuf,

    /// Chapter selected when a view opens.
    #[arg(long, env = "QUIZ_CHAPTER", default_value = "1", global = true)]
    pub chapter: String,

    /// JSON map of figure numbers to image filenames.
    #[arg(long, env = "QUIZ_IMAGE_MAP", global = true)]
    pub image_map: Option<PathBuf>,

    /// URL prefix for chapter images. Defaults to `/<data dir name>`.
    #[arg(long, global = true)]
    pub asset_base: Option<String>,

    /// Fall back to built-in sample questions when nothing loads.
    #[arg(long, global = true)]
    pub fixtures: bool,
}

impl Cli {
    #[must_use]
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Ui)
    }
}

impl Options {
    /// # Errors
    ///
    /// Returns an error if `--chapter` is blank.
    pub fn default_chapter(&self) -> anyhow::Result<ChapterId> {
        ChapterId::new(self.chapter.as_str())
            .with_context(|| format!("invalid --chapter value: {}", self.chapter))
    }

    #[must_use]
    pub fn db_url(&self) -> String {
        normalize_sqlite_url(&self.db_url)
    }

    /// Data directory resolved against the working directory.
    #[must_use]
    pub fn data_root(&self) -> PathBuf {
        absolute(&self.data_dir)
    }

    /// Explicit image map, or `<data-dir>/image_map.json` when that file exists.
    #[must_use]
    pub fn image_map_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.image_map {
            return Some(path.clone());
        }
        let candidate = self.data_root().join("image_map.json");
        candidate.is_file().then_some(candidate)
    }

    #[must_use]
    pub fn asset_base(&self) -> String {
        if let Some(base) = &self.asset_base {
            return base.clone();
        }
        let name = self
            .data_root()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("/{name}")
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    }
}

pub fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:" || trimmed.starts_with("sqlite://") {
        return trimmed.to_owned();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    format!("sqlite://{}", absolute(Path::new(path_str)).display())
}

/// Create the database file and its parent directory if missing.
///
/// # Errors
///
/// Returns an error if the URL has no path or the file cannot be created.
pub fn prepare_sqlite_file(db_url: &str) -> anyhow::Result<()> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let Some(path) = db_url.strip_prefix("sqlite://") else {
        bail!("invalid --db value: {db_url}");
    };
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        bail!("invalid --db value: {db_url}");
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)
            .with_context(|| format!("creating {}", path.display()))?;
    }

    Ok(())
}

/// Chapters present on disk as `chapters/chapter{N}` directories, in
/// numeric order where the suffix is a number.
#[must_use]
pub fn discover_chapters(data_root: &Path) -> Vec<ChapterId> {
    let Ok(entries) = std::fs::read_dir(data_root.join("chapters")) else {
        return Vec::new();
    };

    let mut chapters: Vec<ChapterId> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            let suffix = name.strip_prefix("chapter")?;
            ChapterId::new(suffix).ok()
        })
        .collect();

    chapters.sort_by(|a, b| {
        let key = |id: &ChapterId| id.to_string().parse::<u32>().unwrap_or(u32::MAX);
        key(a).cmp(&key(b)).then_with(|| a.cmp(b))
    });
    chapters
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("app").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn no_subcommand_launches_ui() {
        let cli = parse(&[]);
        assert_eq!(cli.command(), Command::Ui);
        assert_eq!(cli.options.chapter, "1");
        assert!(!cli.options.fixtures);
    }

    #[test]
    fn options_apply_after_subcommand() {
        let cli = parse(&["check", "--chapter", "4", "--fixtures", "--asset-base", "/img"]);
        assert_eq!(cli.command(), Command::Check);
        assert_eq!(cli.options.chapter, "4");
        assert!(cli.options.fixtures);
        assert_eq!(cli.options.asset_base(), "/img");
    }

    #[test]
    fn blank_chapter_is_rejected() {
        let cli = parse(&["--chapter", "  "]);
        assert!(cli.options.default_chapter().is_err());
    }

    #[test]
    fn asset_base_defaults_to_data_dir_name() {
        let cli = parse(&["--data-dir", "/srv/quiz/figures"]);
        assert_eq!(cli.options.asset_base(), "/figures");
    }

    #[test]
    fn normalize_keeps_full_urls() {
        assert_eq!(normalize_sqlite_url("sqlite::memory:"), "sqlite::memory:");
        assert_eq!(
            normalize_sqlite_url("sqlite:///tmp/quiz.db"),
            "sqlite:///tmp/quiz.db"
        );
    }

    #[test]
    fn normalize_makes_bare_paths_absolute() {
        assert_eq!(normalize_sqlite_url("/tmp/quiz.db"), "sqlite:///tmp/quiz.db");
        let relative = normalize_sqlite_url("sqlite:quiz.db");
        assert!(relative.starts_with("sqlite:///"));
        assert!(relative.ends_with("/quiz.db"));
    }

    #[test]
    fn prepare_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("quiz.sqlite3");
        prepare_sqlite_file(&format!("sqlite://{}", path.display())).unwrap();
        assert!(path.exists());
        assert!(prepare_sqlite_file("postgres://nope").is_err());
    }

    #[test]
    fn chapters_are_discovered_in_numeric_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["chapter10", "chapter2", "chapter1", "notes"] {
            std::fs::create_dir_all(dir.path().join("chapters").join(name)).unwrap();
        }
        let found: Vec<String> = discover_chapters(dir.path())
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(found, ["1", "2", "10"]);
    }
}
