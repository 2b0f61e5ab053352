use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use wordhoard_config::Config;
use wordhoard_core::{SettingsStore, Storage, VocabularyStore};
use wordhoard_io::ImportMode;
use wordhoard_learn::{DrillSession, LearningMode, ProgressStore, QueueFilter, build_queue};
use wordhoard_translate::{
    CachedPhonetics, DictApiPhonetics, FallbackProvider, SignedProvider, Translator,
    TranslatorChain,
};
use wordhoard_types::{CategoryFilter, SortMode, VocabEntry, is_word_or_phrase, normalize_key};

mod content;
mod events;
mod popup;
mod storage;

use popup::{ExportFormat, PopupSession};
use storage::JsonFileStorage;

#[derive(Parser)]
#[command(name = "wordhoard", about = "Personal vocabulary builder")]
struct Cli {
    /// Storage file holding the vocabulary and learning progress.
    #[arg(long, default_value = "wordhoard.json")]
    data: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List vocabulary entries by category.
    List {
        #[arg(long, default_value = "all")]
        filter: String,
        /// count, recent or alpha; default keeps count order.
        #[arg(long)]
        sort: Option<String>,
        #[arg(long, default_value_t = 0)]
        page: usize,
    },
    /// Search across words and translations.
    Search {
        term: String,
        #[arg(long, default_value = "all")]
        filter: String,
    },
    /// Translate a text and add it to the vocabulary.
    Add { text: String },
    /// Toggle the star on a word.
    Star { word: String },
    /// Delete a word.
    Remove { word: String },
    /// Delete the whole vocabulary.
    Clear {
        #[arg(long)]
        yes: bool,
    },
    /// Overview statistics and recent words.
    Stats,
    /// Export the vocabulary as JSON or CSV.
    Export {
        #[arg(long, default_value = "json")]
        format: String,
        #[arg(long, default_value = "all")]
        filter: String,
        /// Write here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Import a previously exported backup.
    Import {
        file: PathBuf,
        /// merge or replace.
        #[arg(long, default_value = "merge")]
        mode: String,
    },
    /// Show, change or move user settings.
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Run a review session.
    Drill {
        /// flashcard, quiz or spelling.
        #[arg(long, default_value = "flashcard")]
        mode: String,
        /// all, word, phrase, starred or difficult.
        #[arg(long, default_value = "all")]
        filter: String,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print the current settings.
    Show,
    /// Set a field: provider, daily-goal or export-format.
    Set { field: String, value: String },
    /// Export settings as a JSON envelope.
    Export {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Import a settings envelope.
    Import { file: PathBuf },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if atty::is(atty::Stream::Stderr) {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = Config::new();
    let storage = JsonFileStorage::open(&cli.data)?;

    match cli.command {
        Command::List { filter, sort, page } => {
            let mut session = PopupSession::open(storage, &config.ui).await?;
            session.set_filter(parse_filter(&filter)?);
            session.set_sort(parse_sort(sort.as_deref())?);
            for _ in 0..page {
                session.next_page();
            }
            print_entries(session.page());
            println!(
                "page {}/{} ({} entries)",
                session.page_index() + 1,
                session.page_count(),
                session.result_count()
            );
        }
        Command::Search { term, filter } => {
            let mut session = PopupSession::open(storage, &config.ui).await?;
            session.set_filter(parse_filter(&filter)?);
            session.set_search(&term);
            print_entries(session.page());
        }
        Command::Add { text } => {
            let entry = add_entry(&config, storage, &text).await?;
            println!("{}  {}  ({}x)", entry.key, entry.translation, entry.count);
        }
        Command::Star { word } => {
            let mut session = PopupSession::open(storage, &config.ui).await?;
            session.toggle_star(&normalize_key(&word)).await?;
        }
        Command::Remove { word } => {
            let mut session = PopupSession::open(storage, &config.ui).await?;
            session.remove(&normalize_key(&word)).await?;
        }
        Command::Clear { yes } => {
            anyhow::ensure!(yes, "refusing to clear the vocabulary without --yes");
            let mut session = PopupSession::open(storage, &config.ui).await?;
            session.clear_all().await?;
        }
        Command::Stats => {
            let session = PopupSession::open(storage, &config.ui).await?;
            let stats = session.stats();
            println!(
                "{} entries: {} words, {} phrases, {} sentences, {} starred, {} total uses",
                stats.total, stats.words, stats.phrases, stats.sentences, stats.starred,
                stats.total_uses
            );
            println!("recent:");
            print_entries(&session.recent(5));
        }
        Command::Export {
            format,
            filter,
            out,
        } => {
            let session = PopupSession::open(storage, &config.ui).await?;
            let data = session
                .export(parse_format(&format)?, parse_filter(&filter)?)
                .await?;
            match out {
                Some(path) => std::fs::write(path, data)?,
                None => print!("{data}"),
            }
        }
        Command::Import { file, mode } => {
            let format = match file.extension().and_then(|e| e.to_str()) {
                Some("csv") => ExportFormat::Csv,
                _ => ExportFormat::Json,
            };
            let mode = match mode.as_str() {
                "merge" => ImportMode::Merge,
                "replace" => ImportMode::Replace,
                other => anyhow::bail!("unknown import mode: {other}"),
            };
            let input = std::fs::read_to_string(&file)?;
            let mut session = PopupSession::open(storage, &config.ui).await?;
            let stats = session.import(&input, format, mode).await?;
            println!(
                "imported: {} added, {} updated, {} total",
                stats.added, stats.updated, stats.total
            );
        }
        Command::Settings { action } => {
            run_settings(storage, action).await?;
        }
        Command::Drill { mode, filter } => {
            let mode: LearningMode = mode.parse().map_err(anyhow::Error::msg)?;
            let filter = parse_queue_filter(&filter)?;
            run_drill(&config, storage, mode, filter).await?;
        }
    }

    Ok(())
}

fn parse_filter(s: &str) -> anyhow::Result<CategoryFilter> {
    s.parse().map_err(anyhow::Error::msg)
}

fn parse_sort(s: Option<&str>) -> anyhow::Result<Option<SortMode>> {
    s.map(|s| s.parse().map_err(anyhow::Error::msg)).transpose()
}

fn parse_format(s: &str) -> anyhow::Result<ExportFormat> {
    match s.trim().to_lowercase().as_str() {
        "json" => Ok(ExportFormat::Json),
        "csv" => Ok(ExportFormat::Csv),
        other => anyhow::bail!("unknown export format: {other}"),
    }
}

fn parse_queue_filter(s: &str) -> anyhow::Result<QueueFilter> {
    match s.trim().to_lowercase().as_str() {
        "all" => Ok(QueueFilter::All),
        "word" | "words" => Ok(QueueFilter::Word),
        "phrase" | "phrases" => Ok(QueueFilter::Phrase),
        "starred" => Ok(QueueFilter::Starred),
        "difficult" => Ok(QueueFilter::Difficult),
        other => anyhow::bail!("unknown drill filter: {other}"),
    }
}

fn print_entries(entries: &[VocabEntry]) {
    for entry in entries {
        let star = if entry.starred { " ★" } else { "" };
        let pos = entry
            .part_of_speech
            .map(|p| format!(" [{}]", p.as_str()))
            .unwrap_or_default();
        println!(
            "{}  {}{pos}  ({}, {}x){star}",
            entry.key,
            entry.translation,
            entry.kind.as_str(),
            entry.count
        );
    }
}

async fn run_settings(storage: Arc<JsonFileStorage>, action: SettingsAction) -> anyhow::Result<()> {
    let store = SettingsStore::new(storage);
    match action {
        SettingsAction::Show => {
            let settings = store.load().await?;
            print!("{}", serde_json::to_string_pretty(&settings)?);
            println!();
        }
        SettingsAction::Set { field, value } => {
            let mut settings = store.load().await?;
            match field.as_str() {
                "provider" => settings.provider = value,
                "daily-goal" => settings.daily_goal = value.parse()?,
                "export-format" => {
                    anyhow::ensure!(
                        matches!(value.as_str(), "json" | "csv"),
                        "unknown export format: {value}"
                    );
                    settings.default_export_format = value;
                }
                other => anyhow::bail!("unknown settings field: {other}"),
            }
            store.save(&settings).await?;
        }
        SettingsAction::Export { out } => {
            let settings = store.load().await?;
            let data = wordhoard_io::export_settings(&settings)?;
            match out {
                Some(path) => std::fs::write(path, data)?,
                None => println!("{data}"),
            }
        }
        SettingsAction::Import { file } => {
            let input = std::fs::read_to_string(&file)?;
            let settings = wordhoard_io::parse_settings(&input)?;
            store.save(&settings).await?;
            println!("settings imported");
        }
    }
    Ok(())
}

/// Translate through the configured provider chain and persist, the
/// same pipeline the page confirm gesture runs. The preferred provider
/// from settings goes first in the chain.
async fn add_entry(
    config: &Config,
    storage: Arc<dyn Storage>,
    text: &str,
) -> anyhow::Result<VocabEntry> {
    let settings = SettingsStore::new(storage.clone()).load().await?;
    let signed = Arc::new(SignedProvider::new(&config.translator)) as Arc<dyn Translator>;
    let fallback = Arc::new(FallbackProvider::new(&config.translator)) as Arc<dyn Translator>;
    let chain = TranslatorChain::new(if settings.provider == "fallback" {
        vec![fallback, signed]
    } else {
        vec![signed, fallback]
    });
    let phonetics = CachedPhonetics::new(Arc::new(DictApiPhonetics::new(&config.translator)));

    let translation = chain.translate_or_sentinel(text).await;
    let part_of_speech = if is_word_or_phrase(text) {
        phonetics.lookup(&normalize_key(text)).await.part_of_speech
    } else {
        None
    };

    let store = VocabularyStore::new(storage);
    Ok(store.upsert(text, translation.text, part_of_speech).await?)
}

async fn run_drill(
    config: &Config,
    storage: Arc<JsonFileStorage>,
    mode: LearningMode,
    filter: QueueFilter,
) -> anyhow::Result<()> {
    let store = VocabularyStore::new(storage.clone());
    let progress_store = ProgressStore::new(storage.clone());

    let settings = SettingsStore::new(storage).load().await?;
    let goal = if settings.daily_goal > 0 {
        settings.daily_goal
    } else {
        config.learning.daily_goal
    };

    let pool: Vec<VocabEntry> = store.load().await?.into_values().collect();
    let progress = progress_store.load().await?;
    let queue = build_queue(&pool, &progress, filter, goal);
    if queue.is_empty() {
        println!("nothing to review");
        return Ok(());
    }

    let mut session = DrillSession::new(mode, queue);
    while let Some(entry) = session.current().cloned() {
        let correct = match mode {
            LearningMode::Flashcard => {
                println!("\n{}", entry.source_text);
                prompt("  (enter to reveal) ")?;
                println!("  {}", entry.translation);
                prompt("  knew it? [y/n] ")?.starts_with('y')
            }
            LearningMode::Quiz => {
                println!("\n{}", entry.source_text);
                let options = session.quiz_options(&pool);
                for (i, option) in options.iter().enumerate() {
                    println!("  {}. {option}", i + 1);
                }
                let picked = prompt("  answer: ")?
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| options.get(n.wrapping_sub(1)));
                picked == Some(&entry.translation)
            }
            LearningMode::Spelling => {
                println!("\n{}", entry.translation);
                let answer = prompt("  type the word: ")?;
                session.check_spelling(&answer)
            }
        };

        if !correct {
            println!("  -> {}  {}", entry.key, entry.translation);
        }
        session.answer(correct);
        progress_store.record(&entry.key, correct).await?;
    }

    let stats = session.stats();
    println!(
        "\nreviewed {} words, {} correct ({:.0}%)",
        stats.reviewed,
        stats.correct,
        stats.accuracy() * 100.0
    );

    if let Some(mut review) = session.mistake_review() {
        println!("words to revisit:");
        while let Some(entry) = review.current().cloned() {
            println!("  {}  {}", entry.key, entry.translation);
            review.answer(true);
        }
    }
    Ok(())
}

fn prompt(label: &str) -> anyhow::Result<String> {
    print!("{label}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_lowercase())
}
