//! halunder-review - Review & curation workbench CLI
//!
//! Loads the corpus from the store, then filters, pages, edits, exports,
//! or submits new text for processing.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use halunder_common::config::{self as common_config, FileConfig};
use halunder_common::models::TextSubmission;
use halunder_review::config::{Overrides, ReviewConfig};
use halunder_review::ingest::{self, HttpProcessingEngine};
use halunder_review::workbench::RowView;
use halunder_review::{
    Command, DraftEdit, FilterCriteria, HttpCorpusStore, Outcome, PageView, Workbench,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for halunder-review
#[derive(Parser, Debug)]
#[command(name = "halunder-review")]
#[command(about = "Review and curate the Halunder/German parallel corpus")]
#[command(version)]
struct Cli {
    /// Corpus store base URL
    #[arg(long, global = true, env = "HALUNDER_STORE_URL")]
    store_url: Option<String>,

    /// Processing engine base URL (required for `submit`)
    #[arg(long, global = true, env = "HALUNDER_ENGINE_URL")]
    engine_url: Option<String>,

    /// Remote call timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Show one page of the (filtered) corpus
    List(ListArgs),
    /// Edit one sentence pair and commit it to the store
    Edit(EditArgs),
    /// Download a CSV snapshot of the corpus
    Export {
        /// Directory to write into
        #[arg(short, long, env = "HALUNDER_EXPORT_DIR")]
        out: Option<PathBuf>,
    },
    /// Submit raw text to the processing engine
    Submit(SubmitArgs),
    /// List operators known to the store
    Users,
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Minimum match confidence in percent
    #[arg(short = 'c', long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=100))]
    min_confidence: u8,

    /// Case-insensitive source title substring
    #[arg(short, long, default_value = "")]
    source: String,

    /// Only pairs with a missing side
    #[arg(short, long)]
    incomplete: bool,

    /// Page to show (1-based)
    #[arg(short, long, default_value_t = 1)]
    page: usize,

    /// Print the page as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct EditArgs {
    /// Sentence pair id
    id: String,

    #[arg(long)]
    halunder: Option<String>,

    #[arg(long)]
    german: Option<String>,

    /// Match confidence in percent
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    confidence: Option<u8>,

    #[arg(long)]
    reasoning: Option<String>,
}

#[derive(Args, Debug)]
struct SubmitArgs {
    /// File with the Halunder text
    #[arg(long)]
    halunder: PathBuf,

    /// File with the German translation
    #[arg(long)]
    german: Option<PathBuf>,

    /// File with translation aids
    #[arg(long)]
    aids: Option<PathBuf>,

    /// File with idiom explanations
    #[arg(long)]
    idioms: Option<PathBuf>,

    #[arg(long, default_value = "")]
    title: String,

    #[arg(long, default_value = "")]
    author: String,

    #[arg(long = "source-page", default_value = "")]
    source_page: String,

    #[arg(long, default_value = "")]
    date: String,

    /// Text has been proofread
    #[arg(long)]
    proofread: bool,

    #[arg(long, default_value = "")]
    proofread_by: String,

    /// Submitting operator
    #[arg(short, long, env = "HALUNDER_USER", default_value = "")]
    user: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "halunder_review=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let file: FileConfig =
        common_config::load_file_config().context("Failed to load config file")?;

    let export_override = match &cli.command {
        CliCommand::Export { out } => out.clone(),
        _ => None,
    };
    let config = ReviewConfig::resolve(
        Overrides {
            store_url: cli.store_url,
            engine_url: cli.engine_url,
            export_dir: export_override,
            timeout_secs: cli.timeout,
        },
        file,
    )
    .context("Invalid configuration")?;
    let store = HttpCorpusStore::new(config.store_url.clone(), config.timeout)
        .context("Failed to create store client")?;
    info!("Corpus store: {}", store.base_url());

    match cli.command {
        CliCommand::List(args) => list(store, args).await,
        CliCommand::Edit(args) => edit(store, args).await,
        CliCommand::Export { .. } => export(store, &config.export_dir).await,
        CliCommand::Submit(args) => submit(&config, args).await,
        CliCommand::Users => users(&store).await,
    }
}

async fn list(store: HttpCorpusStore, args: ListArgs) -> Result<()> {
    let mut workbench = Workbench::load(store)
        .await
        .context("Failed to load sentences")?;

    let criteria = FilterCriteria::new(args.min_confidence, &args.source, args.incomplete);
    let mut outcome = workbench.handle(Command::ApplyFilters(criteria)).await?;
    if args.page != 1 {
        outcome = workbench.handle(Command::GoToPage(args.page)).await?;
        if outcome == Outcome::Unchanged {
            bail!(
                "Page {} does not exist (1..={})",
                args.page,
                workbench.render_page().total_pages
            );
        }
    }

    let page = match outcome {
        Outcome::Rendered(page) => page,
        _ => workbench.render_page(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else {
        print_page(&page);
    }
    Ok(())
}

async fn edit(store: HttpCorpusStore, args: EditArgs) -> Result<()> {
    let mut edits = Vec::new();
    if let Some(text) = args.halunder {
        edits.push(DraftEdit::HalunderText(text));
    }
    if let Some(text) = args.german {
        edits.push(DraftEdit::GermanText(text));
    }
    if let Some(percent) = args.confidence {
        edits.push(DraftEdit::ConfidencePercent(percent));
    }
    if let Some(text) = args.reasoning {
        edits.push(DraftEdit::Reasoning(text));
    }
    if edits.is_empty() {
        bail!("Nothing to change: pass at least one of --halunder, --german, --confidence, --reasoning");
    }

    let mut workbench = Workbench::load(store)
        .await
        .context("Failed to load sentences")?;

    workbench.handle(Command::OpenEdit(args.id.clone())).await?;
    for edit in edits {
        workbench.handle(Command::EditDraft(edit)).await?;
    }
    workbench.handle(Command::CommitEdit).await?;

    let pair = workbench
        .dataset()
        .get(&args.id)
        .with_context(|| format!("Sentence {} vanished after commit", args.id))?;
    println!("Saved {}", pair.id);
    println!("  halunder:   {}", pair.halunder_text);
    println!("  german:     {}", pair.german_text);
    println!(
        "  confidence: {}%",
        halunder_common::confidence::to_percent(pair.confidence())
    );
    if let Some(reasoning) = &pair.reasoning {
        println!("  reasoning:  {}", reasoning);
    }
    Ok(())
}

async fn export(store: HttpCorpusStore, dir: &Path) -> Result<()> {
    let file = halunder_review::export::export_snapshot(&store).await?;
    let path = file
        .save_into(dir)
        .with_context(|| format!("Failed to write export into {}", dir.display()))?;
    println!("{}", path.display());
    Ok(())
}

async fn submit(config: &ReviewConfig, args: SubmitArgs) -> Result<()> {
    let submission = TextSubmission {
        halunder_text: read_text(&args.halunder)?,
        german_text: read_optional(args.german.as_deref())?,
        translation_aids: read_optional(args.aids.as_deref())?,
        idiom_explanations: read_optional(args.idioms.as_deref())?,
        source_title: args.title,
        source_author: args.author,
        source_page: args.source_page,
        source_date: args.date,
        proofread: args.proofread,
        proofread_by: args.proofread_by,
        added_by: args.user,
    };

    let engine_url = config.require_engine_url()?;
    let engine = HttpProcessingEngine::new(engine_url, config.timeout)
        .context("Failed to create engine client")?;
    info!("Processing engine: {}", engine.base_url());
    let summary = ingest::submit(&engine, &submission).await?;

    println!("Sentences extracted:      {}", summary.sentences_extracted);
    println!("Translation aids:         {}", summary.translation_aids_extracted);
    println!("Idioms:                   {}", summary.idioms_extracted);
    println!(
        "Primary language:         {}",
        summary.text_type.primary_language.as_deref().unwrap_or("unknown")
    );
    println!("Parallel text:            {}", summary.has_parallel_text);
    let mut ids: Vec<_> = summary.text_ids.iter().collect();
    ids.sort();
    for (language, id) in ids {
        println!("Text id ({}): {}", language, id);
    }
    Ok(())
}

async fn users(store: &HttpCorpusStore) -> Result<()> {
    let users = store
        .list_users()
        .await
        .context("Failed to fetch user list")?;
    for user in users {
        println!("{}", user);
    }
    Ok(())
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn read_optional(path: Option<&Path>) -> Result<String> {
    path.map(read_text).transpose().map(Option::unwrap_or_default)
}

fn print_page(page: &PageView) {
    for row in &page.rows {
        print_row(row);
    }
    println!(
        "Page {} of {} ({} sentence pairs){}{}",
        page.page,
        page.total_pages,
        page.total_items,
        if page.can_prev { "  [prev]" } else { "" },
        if page.can_next { "  [next]" } else { "" },
    );
}

fn print_row(row: &RowView) {
    println!(
        "{:>5}  {}  {:>3}% ({})  {}",
        row.number,
        row.id,
        row.confidence_percent,
        row.band.as_str(),
        row.source_title.as_deref().unwrap_or("-")
    );
    println!("       HAL: {}", row.halunder_text);
    println!("       GER: {}", row.german_text);
    if let Some(reasoning) = row.reasoning.as_deref().filter(|r| !r.is_empty()) {
        println!("       why: {}", reasoning);
    }
}
