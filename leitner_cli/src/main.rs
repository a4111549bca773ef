use chrono::{DateTime, Duration, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use leitner_core::*;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "leitner")]
#[command(about = "Leitner spaced-repetition flashcards", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Review the next due card (default)
    Next {
        /// Record this answer without prompting
        #[arg(long, value_enum)]
        answer: Option<AnswerArg>,

        /// Show the card without recording an answer
        #[arg(long, conflicts_with = "answer")]
        peek: bool,
    },

    /// Add a new card
    Add { word: String, definition: String },

    /// List every card
    List {
        /// Print cards as JSON
        #[arg(long)]
        json: bool,
    },

    /// Record an answer for a specific card
    #[command(group(
        clap::ArgGroup::new("result")
            .required(true)
            .args(["correct", "incorrect"])
    ))]
    Answer {
        id: Uuid,

        #[arg(long)]
        correct: bool,

        #[arg(long)]
        incorrect: bool,
    },

    /// Delete a card
    Delete { id: Uuid },

    /// Summarize review progress
    Status,

    /// Export all cards to CSV
    Export { path: PathBuf },

    /// Add cards from a CSV with `word` and `definition` columns
    Import { path: PathBuf },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AnswerArg {
    Correct,
    Incorrect,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(2);
        }
    };

    // Initialize logging
    let level = if cli.verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    leitner_core::logging::init_with_level(level);

    match run(cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_recoverable() => {
            eprintln!("{}", e);
            ExitCode::from(1)
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli, config: &Config) -> Result<()> {
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    tracing::debug!("Using data directory {:?}", data_dir);
    let deck = Deck::new(FileStore::open(&data_dir)?);

    match cli.command {
        Some(Commands::Next { answer, peek }) => cmd_next(&deck, answer, peek),
        Some(Commands::Add { word, definition }) => cmd_add(&deck, &word, &definition),
        Some(Commands::List { json }) => cmd_list(&deck, json),
        Some(Commands::Answer { id, correct, .. }) => cmd_answer(&deck, id, correct),
        Some(Commands::Delete { id }) => cmd_delete(&deck, id),
        Some(Commands::Status) => cmd_status(&deck),
        Some(Commands::Export { path }) => cmd_export(&deck, &path),
        Some(Commands::Import { path }) => cmd_import(&deck, &path),
        None => {
            // Default to interactive "next"
            cmd_next(&deck, None, false)
        }
    }
}

fn cmd_next(deck: &Deck<FileStore>, answer: Option<AnswerArg>, peek: bool) -> Result<()> {
    let Some(card) = deck.fetch_next_card()? else {
        print_status_message(&deck.review_status()?, Utc::now());
        return Ok(());
    };

    display_card(&card);

    if peek {
        println!("\n[Peek - not recording an answer]");
        return Ok(());
    }

    let was_correct = match answer {
        Some(answer) => {
            println!("  = {}", card.definition);
            answer == AnswerArg::Correct
        }
        None => match prompt_answer(&card)? {
            Some(was_correct) => was_correct,
            None => {
                println!("\nNo answer recorded.");
                return Ok(());
            }
        },
    };

    let outcome = deck.submit_answer(card.id, was_correct)?;
    report_answer(&outcome.answered, was_correct);
    report_next(deck, outcome.next.as_ref())
}

fn cmd_add(deck: &Deck<FileStore>, word: &str, definition: &str) -> Result<()> {
    let card = deck.create_card(word, definition)?;
    println!("✓ Added {:?} ({})", card.word, card.id);
    Ok(())
}

fn cmd_list(deck: &Deck<FileStore>, json: bool) -> Result<()> {
    let cards = deck.list_all_cards()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&cards)?);
        return Ok(());
    }

    if cards.is_empty() {
        println!("No cards yet.");
        return Ok(());
    }

    let now = Utc::now();
    for card in &cards {
        println!(
            "{}  bin {:>2}  misses {:>2}  {:<8}  {} = {}",
            card.id,
            card.bin,
            card.num_times_incorrect,
            card_state(card, now),
            card.word,
            card.definition
        );
    }
    Ok(())
}

fn cmd_answer(deck: &Deck<FileStore>, id: Uuid, was_correct: bool) -> Result<()> {
    let outcome = deck.submit_answer(id, was_correct)?;
    report_answer(&outcome.answered, was_correct);
    report_next(deck, outcome.next.as_ref())
}

fn cmd_delete(deck: &Deck<FileStore>, id: Uuid) -> Result<()> {
    if deck.delete_card(id)? {
        println!("✓ Deleted card {}", id);
    } else {
        println!("No card with id {}", id);
    }
    Ok(())
}

fn cmd_status(deck: &Deck<FileStore>) -> Result<()> {
    let cards = deck.list_all_cards()?;
    let now = Utc::now();

    let count = |state: &str| cards.iter().filter(|c| card_state(c, now) == state).count();
    println!("Cards:    {}", cards.len());
    println!("  due:      {}", count("due"));
    println!("  cooling:  {}", count("cooling"));
    println!("  mastered: {}", count("mastered"));
    println!("  retired:  {}", count("retired"));
    println!();

    match deck.review_status()? {
        ReviewStatus::Ready(card) => println!("Next up: {}", card.word),
        status => print_status_message(&status, now),
    }
    Ok(())
}

fn cmd_export(deck: &Deck<FileStore>, path: &Path) -> Result<()> {
    let count = export_csv(&deck.list_all_cards()?, path)?;
    println!("✓ Exported {} cards to {}", count, path.display());
    Ok(())
}

fn cmd_import(deck: &Deck<FileStore>, path: &Path) -> Result<()> {
    let summary = import_csv(deck, path)?;
    println!(
        "✓ Imported {} cards ({} skipped)",
        summary.created, summary.skipped
    );
    Ok(())
}

fn card_state(card: &Card, now: DateTime<Utc>) -> &'static str {
    if card.bin >= policy::MASTERED_BIN {
        "mastered"
    } else if policy::is_exhausted(card) {
        "retired"
    } else if policy::is_eligible(card, now) {
        "due"
    } else {
        "cooling"
    }
}

fn print_status_message(status: &ReviewStatus, now: DateTime<Utc>) {
    match status {
        ReviewStatus::Ready(_) => println!("A card is due; run `leitner next`."),
        ReviewStatus::TemporarilyDone { next_due } => {
            println!("You are temporarily done; please come back later to review more words.");
            if let Some(due) = next_due {
                println!("  Next review in about {}", format_wait(*due - now));
            }
        }
        ReviewStatus::PermanentlyDone => {
            println!("You have no more words to review; you are permanently done!")
        }
        ReviewStatus::Empty => {
            println!("No cards yet. Add one with `leitner add <word> <definition>`.")
        }
    }
}

fn format_wait(wait: Duration) -> String {
    let secs = wait.num_seconds().max(1);
    match secs {
        s if s < 60 => format!("{}s", s),
        s if s < 3600 => format!("{}m", s / 60),
        s if s < 86_400 => format!("{}h", s / 3600),
        s => format!("{}d", s / 86_400),
    }
}

fn display_card(card: &Card) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  BIN {} CARD", card.bin);
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  {}", card.word);
}

fn report_answer(card: &Card, was_correct: bool) {
    if was_correct {
        println!("\n✓ Correct! Moved to bin {}", card.bin);
    } else {
        println!(
            "\n✗ Incorrect. Back to bin {} ({} misses)",
            card.bin, card.num_times_incorrect
        );
    }

    if card.bin >= policy::MASTERED_BIN {
        println!("  Mastered - this card will not be shown again.");
    } else if policy::is_exhausted(card) {
        println!("  Too many misses - this card will not be shown again.");
    } else if let Some(due) = policy::next_due(card) {
        println!("  Next review in about {}", format_wait(due - Utc::now()));
    }
}

fn report_next(deck: &Deck<FileStore>, next: Option<&Card>) -> Result<()> {
    println!();
    match next {
        Some(card) => println!("Next up: {}", card.word),
        None => print_status_message(&deck.review_status()?, Utc::now()),
    }
    Ok(())
}

/// Reveal the definition on Enter, then ask whether the answer was right.
///
/// Returns `None` if stdin closes before an answer is given.
fn prompt_answer(card: &Card) -> Result<Option<bool>> {
    println!("─────────────────────────────────────────");
    print!("Press Enter to reveal the definition ");
    io::stdout().flush()?;

    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        return Ok(None);
    }
    println!("  = {}", card.definition);

    loop {
        print!("Did you get it right? [y/n] ");
        io::stdout().flush()?;

        input.clear();
        if io::stdin().read_line(&mut input)? == 0 {
            return Ok(None);
        }
        match input.trim().to_lowercase().as_str() {
            "y" | "yes" => return Ok(Some(true)),
            "n" | "no" => return Ok(Some(false)),
            _ => continue,
        }
    }
}
