mod cli;

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use quiz_core::model::{ChapterId, ImageMap};
use services::{AppServices, Clock, ProgressStore, QuestionStore, QuizService, StoreSettings};
use storage::StorageError;
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

use crate::cli::{Cli, Command, Options, discover_chapters, prepare_sqlite_file};

struct DesktopApp {
    services: AppServices,
}

impl UiApp for DesktopApp {
    fn default_chapter(&self) -> ChapterId {
        self.services.default_chapter().clone()
    }

    fn chapters(&self) -> Vec<ChapterId> {
        self.services.chapters().to_vec()
    }

    fn questions(&self) -> Arc<QuestionStore> {
        self.services.questions()
    }

    fn progress(&self) -> Arc<ProgressStore> {
        self.services.progress()
    }

    fn quiz(&self) -> Arc<QuizService> {
        self.services.quiz()
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn load_image_map(options: &Options) -> anyhow::Result<ImageMap> {
    let Some(path) = options.image_map_path() else {
        return Ok(ImageMap::default());
    };
    match storage::load_image_map(&path).await {
        Ok(map) => {
            tracing::info!(path = %path.display(), entries = map.len(), "image map loaded");
            Ok(map)
        }
        Err(StorageError::NotFound) if options.image_map.is_none() => Ok(ImageMap::default()),
        Err(err) => Err(err).with_context(|| format!("loading image map {}", path.display())),
    }
}

async fn build_services(options: &Options) -> anyhow::Result<AppServices> {
    let db_url = options.db_url();
    prepare_sqlite_file(&db_url)?;

    let data_root = options.data_root();
    let mut settings = StoreSettings::new(options.default_chapter()?);
    settings.asset_base = options.asset_base();
    settings.image_map = load_image_map(options).await?;
    settings.use_fixtures = options.fixtures;
    settings.chapters = discover_chapters(&data_root);

    tracing::info!(
        db = %db_url,
        data = %data_root.display(),
        asset_base = %settings.asset_base,
        chapters = settings.chapters.len(),
        "opening quiz storage"
    );

    AppServices::new_sqlite(&db_url, data_root, Clock::system(), settings)
        .await
        .context("opening storage")
}

fn launch_ui(services: AppServices, options: &Options) {
    let app: Arc<dyn UiApp> = Arc::new(DesktopApp { services });
    let context = build_app_context(&app);

    // Chapter images are served from the data directory's parent so that
    // `/<data dir name>/chapters/...` resolves inside the webview.
    let data_root = options.data_root();
    let resources = data_root
        .parent()
        .map_or_else(|| data_root.clone(), std::path::Path::to_path_buf);

    let desktop_cfg = DesktopConfig::new()
        .with_resource_directory(resources)
        .with_window(
            WindowBuilder::new()
                .with_title("Ocular Pathology Quiz")
                .with_always_on_top(false),
        );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
}

async fn check(services: &AppServices) {
    let questions = services.questions();
    for chapter in services.chapters() {
        let loaded = questions.by_chapter(chapter).await;
        println!("chapter {chapter}: {} questions", loaded.len());

        let mut by_category: BTreeMap<String, usize> = BTreeMap::new();
        for question in &loaded {
            *by_category
                .entry(question.category().display_name())
                .or_default() += 1;
        }
        for (category, count) in by_category {
            println!("  {category}: {count}");
        }

        for question in &loaded {
            let source = questions.images().classify(question);
            let marker = if source.is_placeholder() { " (placeholder)" } else { "" };
            println!("  {} -> {}{marker}", question.id(), source.into_url());
        }
    }
}

async fn reset(services: &AppServices) -> anyhow::Result<()> {
    let profile = services
        .progress()
        .try_reset_progress()
        .await
        .context("resetting progress")?;
    println!("progress reset for profile {}", profile.id());
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let services = build_services(&cli.options).await?;

    match cli.command() {
        Command::Ui => launch_ui(services, &cli.options),
        Command::Check => check(&services).await,
        Command::Reset => reset(&services).await?,
    }
    Ok(())
}
