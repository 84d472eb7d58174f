// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::{BufRead, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chapterglot::app_config::{self, Config};
use chapterglot::credentials::resolve_api_key;
use chapterglot::glossary::Glossary;
use chapterglot::ingestion::{HttpChapterFetcher, IngestionQueue};
use chapterglot::prompter::{Prompter, TerminalPrompter};
use chapterglot::providers::{Gemini, TokioSleeper, Translator};
use chapterglot::review::ReviewSession;
use chapterglot::storage::{KeyValueStore, SqliteStore};
use chapterglot::translation::{translate_header, Chapter, ChapterPipeline, ChapterView, NameColor};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate one chapter and render it as HTML
    Translate(TranslateArgs),

    /// Translate a novel's title and synopsis
    Header(HeaderArgs),

    /// Inspect and edit the name glossary
    Names {
        /// Novel identifier
        #[arg(short, long)]
        novel: String,

        #[command(subcommand)]
        action: NamesAction,
    },

    /// Manage the chapter ingestion queue
    Queue {
        /// Novel identifier
        #[arg(short, long)]
        novel: String,

        #[command(subcommand)]
        action: QueueAction,
    },

    /// Generate shell completions for chapterglot
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Chapter text file, `-` for standard input
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Novel identifier
    #[arg(short, long)]
    novel: String,

    /// Chapter title; the first line of the input when omitted
    #[arg(short, long)]
    title: Option<String>,

    /// Write the HTML here instead of standard output
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Open an interactive review of the names after translating
    #[arg(short, long)]
    review: bool,
}

impl TranslateArgs {
    fn reads_stdin(&self) -> bool {
        self.input_path == Path::new("-")
    }

    // @checks: Flag combinations that cannot work together
    fn validate(&self) -> Result<()> {
        if self.review && self.reads_stdin() {
            return Err(anyhow!(
                "--review answers prompts on standard input, so the chapter must come from a file, not `-`"
            ));
        }
        Ok(())
    }
}

#[derive(Parser, Debug)]
struct HeaderArgs {
    /// Novel identifier
    #[arg(short, long)]
    novel: String,

    /// Novel title
    #[arg(short, long)]
    title: String,

    /// Novel synopsis
    #[arg(short, long)]
    synopsis: String,
}

#[derive(Subcommand, Debug)]
enum NamesAction {
    /// List local and global names
    List,
    /// Change a translation
    Edit { original: String },
    /// Remove a name
    Remove { original: String },
    /// Move a name between the novel and the global list
    Promote { original: String },
    /// Toggle the verified flag of a local name
    Check { original: String },
    /// Add a global name
    New,
    /// Print the review packet of a name
    Copy { original: String },
    /// Set the review packet template
    CopyMessage,
}

#[derive(Subcommand, Debug)]
enum QueueAction {
    /// Queue chapter links from a file, one per line, in fetch order
    Seed { links_file: PathBuf },
    /// Show queue and content log sizes
    Status,
    /// Fetch every queued chapter into the content log
    Drain,
    /// Delete queued links and fetched contents
    Clear,
}

/// chapterglot - consistent names for machine-translated web novels
///
/// Translates Chinese web novel chapters to English with Gemini and keeps
/// proper nouns consistent across chapters.
#[derive(Parser, Debug)]
#[command(name = "chapterglot")]
#[command(version)]
#[command(about = "Chapter translation with a persistent name glossary")]
#[command(long_about = "chapterglot translates web novel chapters with Gemini and keeps proper nouns consistent.

EXAMPLES:
    chapterglot translate -n 12345 chapter.txt -o chapter.html   # Translate one chapter
    chapterglot translate -n 12345 --review chapter.txt          # Translate, then review names
    chapterglot header -n 12345 -t '标题' -s '简介'               # Translate title and synopsis
    chapterglot names -n 12345 list                              # Show the glossary
    chapterglot names -n 12345 copy 张伟                          # Print a review packet
    chapterglot queue -n 12345 seed links.txt                    # Queue catalog links
    chapterglot queue -n 12345 drain                             # Fetch queued chapters
    chapterglot completions bash > chapterglot.bash              # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically. The Gemini API key is taken from --api-key,
    GEMINI_API_KEY, the config file, the stored key, or asked for once.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Gemini API key
    #[arg(long, global = true, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Gemini model name
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// SQLite database path
    #[arg(long, global = true)]
    storage_path: Option<PathBuf>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger { level }))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and marker for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "✖"),
            Level::Warn => ("1;33", "!"),
            Level::Info => ("1;32", " "),
            Level::Debug => ("1;36", "·"),
            Level::Trace => ("1;35", "…"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let now = chrono::Local::now().format("%H:%M:%S.%3f");
        let (color, marker) = Self::style_for_level(record.level());
        let _ = writeln!(
            std::io::stderr(),
            "\x1B[{}m{} {} {}\x1B[0m",
            color,
            now,
            marker,
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Everything up to trace is let through the logger; the active level is
    // narrowed with set_max_level once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "chapterglot", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli)?;
    log::set_max_level(config.log_level.to_level_filter());

    let store = open_store(&config)?;
    let prompter: Arc<dyn Prompter> = Arc::new(TerminalPrompter);

    match cli.command {
        Commands::Translate(args) => run_translate(args, &config, store, prompter).await,
        Commands::Header(args) => run_header(args, &config, store, prompter).await,
        Commands::Names { novel, action } => run_names(&novel, action, &config, store, prompter).await,
        Commands::Queue { novel, action } => run_queue(&novel, action, &config, store).await,
        Commands::Completions { .. } => Ok(()),
    }
}

// Load or create configuration, then apply command line overrides
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let mut config = Config::load_or_create(&cli.config_path)?;

    if let Some(api_key) = &cli.api_key {
        config.gemini.api_key = api_key.clone();
    }

    if let Some(model) = &cli.model {
        config.gemini.model = model.clone();
    }

    if let Some(storage_path) = &cli.storage_path {
        config.storage_path = Some(storage_path.clone());
    }

    if let Some(log_level) = cli.log_level {
        config.log_level = log_level.into();
    }

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

fn open_store(config: &Config) -> Result<Arc<dyn KeyValueStore>> {
    let store = match &config.storage_path {
        Some(path) => SqliteStore::open(path)?,
        None => SqliteStore::open_default()?,
    };

    info!("Using database at {}", store.path().display());
    Ok(Arc::new(store))
}

async fn build_translator(
    config: &Config,
    store: &dyn KeyValueStore,
    prompter: &dyn Prompter,
) -> Result<Arc<dyn Translator>> {
    let configured = Some(config.gemini.api_key.as_str());
    let api_key = resolve_api_key(configured, store, prompter).await?;

    Ok(Arc::new(Gemini::from_config(&config.gemini, &config.retry, api_key)))
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read chapter from standard input")?;
        return Ok(text);
    }

    std::fs::read_to_string(path).context(format!("Failed to read chapter file: {}", path.display()))
}

async fn run_translate(
    args: TranslateArgs,
    config: &Config,
    store: Arc<dyn KeyValueStore>,
    prompter: Arc<dyn Prompter>,
) -> Result<()> {
    args.validate()?;

    let body = read_input(&args.input_path)?;
    let title = match &args.title {
        Some(title) => title.clone(),
        None => body.trim().lines().next().unwrap_or_default().to_string(),
    };

    let translator = build_translator(config, store.as_ref(), prompter.as_ref()).await?;
    let mut glossary = Glossary::load(Arc::clone(&store), &args.novel).await?;
    let mut chapter = Chapter::load(&title, &body);

    let outcome = ChapterPipeline::new(translator).run(&mut chapter, &mut glossary).await?;

    if let Some(e) = &outcome.extraction_error {
        warn!("Names were not updated: {}", e);
    }
    info!("{} new names added", outcome.names_added);

    let errored = matches!(outcome.view, ChapterView::Errored(_));
    write_output(args.output.as_deref(), &outcome.view.html())?;

    if errored {
        return Err(anyhow!("Chapter could not be translated"));
    }

    if args.review {
        let session = ReviewSession::new(glossary, Some(chapter), prompter)
            .with_context_samples(config.glossary.context_samples);
        let session = review_loop(session).await?;

        if let Some(html) = session.view() {
            write_output(args.output.as_deref(), html)?;
        }
    }

    Ok(())
}

fn write_output(output: Option<&Path>, html: &str) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, html)
            .context(format!("Failed to write output file: {}", path.display())),
        None => {
            println!("{}", html);
            Ok(())
        }
    }
}

const REVIEW_HELP: &str = "Commands: list, edit <name>, remove <name>, promote <name>, check <name>, new, copy <name>, copy-message, clear, done";

async fn review_loop(mut session: ReviewSession) -> Result<ReviewSession> {
    eprintln!("{}", REVIEW_HELP);
    let stdin = std::io::stdin();

    loop {
        eprint!("review> ");
        let _ = std::io::stderr().flush();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let line = line.trim();
        let (command, argument) = match line.split_once(' ') {
            Some((command, argument)) => (command, argument.trim()),
            None => (line, ""),
        };

        let result = match command {
            "" => Ok(()),
            "done" | "quit" => break,
            "list" => {
                print_names(session.glossary());
                Ok(())
            }
            "edit" => session.edit(argument).await.map(|_| ()),
            "remove" => session.remove(argument).await.map(|_| ()),
            "promote" => session.promote(argument).await.map(|_| ()),
            "check" => session.check(argument).await.map(|_| ()),
            "new" => session.new_name().await.map(|_| ()),
            "copy" => session.copy(argument).await.map(|packet| println!("{}", packet)),
            "copy-message" => session.set_copy_message().await.map(|_| ()),
            "clear" => session.clear_ingested().await.map(|_| ()),
            _ => {
                eprintln!("{}", REVIEW_HELP);
                Ok(())
            }
        };

        if let Err(e) = result {
            error!("{}", e);
        }
    }

    Ok(session)
}

fn print_names(glossary: &Glossary) {
    for name in glossary.names() {
        let color = NameColor::for_entry(glossary, name);
        println!(
            "{}\t{}\t{}\t{:?}",
            name.original, name.translated, name.scope, color
        );
    }
}

async fn run_header(
    args: HeaderArgs,
    config: &Config,
    store: Arc<dyn KeyValueStore>,
    prompter: Arc<dyn Prompter>,
) -> Result<()> {
    let translator = build_translator(config, store.as_ref(), prompter.as_ref()).await?;
    let glossary = Glossary::load(Arc::clone(&store), &args.novel).await?;

    let header = translate_header(translator.as_ref(), &glossary, &args.title, &args.synopsis).await;

    match header.title {
        Ok(title) => println!("{}", title),
        Err(e) => error!("Error while translating novel title: {}", e),
    }
    match header.synopsis {
        Ok(synopsis) => println!("{}", synopsis),
        Err(e) => error!("Error while translating novel synopsis: {}", e),
    }

    Ok(())
}

async fn run_names(
    novel: &str,
    action: NamesAction,
    config: &Config,
    store: Arc<dyn KeyValueStore>,
    prompter: Arc<dyn Prompter>,
) -> Result<()> {
    let glossary = Glossary::load(store, novel).await?;
    let mut session = ReviewSession::new(glossary, None, prompter)
        .with_context_samples(config.glossary.context_samples);

    match action {
        NamesAction::List => print_names(session.glossary()),
        NamesAction::Edit { original } => {
            session.edit(&original).await?;
        }
        NamesAction::Remove { original } => {
            if !session.remove(&original).await? {
                warn!("No name '{}' to remove", original);
            }
        }
        NamesAction::Promote { original } => {
            let promotion = session.promote(&original).await?;
            info!("{}: {:?}", original, promotion);
        }
        NamesAction::Check { original } => {
            let outcome = session.check(&original).await?;
            info!("{}: {:?}", original, outcome);
        }
        NamesAction::New => {
            session.new_name().await?;
        }
        NamesAction::Copy { original } => println!("{}", session.copy(&original).await?),
        NamesAction::CopyMessage => {
            session.set_copy_message().await?;
        }
    }

    Ok(())
}

async fn run_queue(
    novel: &str,
    action: QueueAction,
    config: &Config,
    store: Arc<dyn KeyValueStore>,
) -> Result<()> {
    let queue = IngestionQueue::new(store, novel);

    match action {
        QueueAction::Seed { links_file } => {
            let text = std::fs::read_to_string(&links_file)
                .context(format!("Failed to read links file: {}", links_file.display()))?;
            let links: Vec<String> = text
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect();

            if queue.seed_links(&links).await? == 0 {
                warn!("Nothing queued for novel {}", novel);
            }
        }
        QueueAction::Status => {
            println!("pending links: {}", queue.pending_links().await?.len());
            println!("fetched chapters: {}", queue.contents().await?.len());
        }
        QueueAction::Drain => {
            let fetcher = HttpChapterFetcher::new(
                config.ingestion.charset.clone(),
                &config.ingestion.selector,
            )?;
            let interval = Duration::from_millis(config.ingestion.interval_ms);
            queue.drain(&fetcher, &TokioSleeper, interval).await?;
        }
        QueueAction::Clear => queue.clear().await?,
    }

    Ok(())
}
