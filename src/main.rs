//! Swipedeck CLI
//!
//! Usage:
//!   swipedeck                                  # Interactive deck (demo listings)
//!   swipedeck --deck listings.json             # Interactive deck from a file
//!   swipedeck --script "like,nope,undo,liked"  # Run commands and exit
//!   swipedeck --serve                          # HTTP API server
//!   swipedeck --script "like" --json           # JSON output

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use tracing::debug;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use swipedeck::config::{load_deck, EngineConfig};
use swipedeck::core::{run_server, LikedCollection, SwipeSession};
use swipedeck::error::DeckError;
use swipedeck::types::{Direction, Record, RecordId, SessionEvent};
use swipedeck::VERSION;

const DEMO_DECK: &str = include_str!("../demos/listings.json");

#[derive(Parser, Debug)]
#[command(
    name = "swipedeck",
    version = VERSION,
    about = "Swipedeck - swipe through a deck of listings",
    long_about = "Swipedeck runs a card-stack session over a deck of listings.\n\n\
                  Each card is accepted (swipe right) or rejected (swipe left)\n\
                  exactly once. Accepted listings are kept in a liked list.\n\n\
                  Modes:\n  \
                  --interactive  Read commands from stdin (default)\n  \
                  --script       Run a comma-separated command list\n  \
                  --serve        HTTP API server mode\n\n\
                  Commands:\n  \
                  like | right | y      Accept the top card\n  \
                  nope | left | n       Reject the top card\n  \
                  drag <dx>             Drag and release at dx\n  \
                  undo | reset          Undo last decision / start over\n  \
                  next | prev           Browse the top card's photos\n  \
                  liked | unlike <id>   Show / edit the liked list\n  \
                  status | frames       Deck position / render frames\n  \
                  quit"
)]
struct Args {
    /// Deck file (JSON array of listings); defaults to the demo deck
    #[arg(short, long)]
    deck: Option<PathBuf>,

    /// Engine config file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Interactive mode - read commands from stdin
    #[arg(short, long)]
    interactive: bool,

    /// Comma-separated commands to run non-interactively
    #[arg(long)]
    script: Option<String>,

    /// Run as HTTP API server
    #[arg(short, long)]
    serve: bool,

    /// Server address (default: 127.0.0.1:3000)
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: String,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Debug logging and per-card transitions
    #[arg(long)]
    verbose: bool,
}

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Swipe(Direction),
    Drag(f64),
    Undo,
    Reset,
    Next,
    Prev,
    Liked,
    Unlike(RecordId),
    Status,
    Frames,
    Help,
    Quit,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);
    if args.no_color {
        colored::control::set_override(false);
    }

    let config = match &args.config {
        Some(path) => EngineConfig::load(path),
        None => Ok(EngineConfig::default()),
    };
    let config = config.unwrap_or_else(|e| fail(&e.to_string()));
    let records = load_records(&args).unwrap_or_else(|e| fail(&e));
    debug!(total = records.len(), "deck loaded");

    if args.serve {
        run_serve(&args, config, records).await;
        return;
    }

    let mut session = SwipeSession::new(records, config, LikedCollection::new())
        .unwrap_or_else(|e| fail(&e.to_string()));

    if let Some(script) = &args.script {
        run_script(&mut session, script, &args);
    } else {
        run_interactive(&mut session, &args);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "swipedeck=debug" } else { "swipedeck=info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn fail(message: &str) -> ! {
    eprintln!("{} {}", "error:".red().bold(), message);
    std::process::exit(1);
}

fn load_records(args: &Args) -> Result<Vec<Record>, String> {
    match &args.deck {
        Some(path) => load_deck(path).map_err(|e| e.to_string()),
        None => serde_json::from_str(DEMO_DECK).map_err(|e| format!("demo deck: {}", e)),
    }
}

/// Run a comma-separated command list
fn run_script(session: &mut SwipeSession<LikedCollection>, script: &str, args: &Args) {
    for raw in script.split(',') {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        match parse_command(raw) {
            Ok(Command::Quit) => break,
            Ok(command) => execute(session, command, args),
            Err(message) => {
                eprintln!("{} {}", "⚠".yellow(), message);
                std::process::exit(2);
            }
        }
    }
}

/// Run the interactive prompt
fn run_interactive(session: &mut SwipeSession<LikedCollection>, args: &Args) {
    print_header(session);

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{}", format_prompt(session));
        let _ = stdout.flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => break,
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match parse_command(line) {
            Ok(Command::Quit) => {
                println!(
                    "\nSession ended. Decided: {} | Liked: {}",
                    session.deck().decisions().len(),
                    session.host().len()
                );
                break;
            }
            Ok(command) => execute(session, command, args),
            Err(message) => println!("{} {}", "⚠".yellow(), message),
        }
    }
}

fn parse_command(line: &str) -> Result<Command, String> {
    let mut parts = line.split_whitespace();
    let Some(word) = parts.next() else {
        return Err("empty command".to_string());
    };
    let word = word.to_ascii_lowercase();

    if let Some(direction) = Direction::parse(&word) {
        return Ok(Command::Swipe(direction));
    }

    let command = match word.as_str() {
        "drag" => {
            let dx = parts
                .next()
                .ok_or("drag needs an offset, e.g. 'drag -140'")?;
            let dx: f64 = dx
                .parse()
                .map_err(|_| format!("'{}' is not a number", dx))?;
            if !dx.is_finite() {
                return Err(format!("'{}' is not a finite offset", dx));
            }
            Command::Drag(dx)
        }
        "undo" | "u" => Command::Undo,
        "reset" => Command::Reset,
        "next" => Command::Next,
        "prev" => Command::Prev,
        "liked" => Command::Liked,
        "unlike" => {
            let id = parts.next().ok_or("unlike needs a listing id")?;
            Command::Unlike(RecordId::new(id))
        }
        "status" => Command::Status,
        "frames" => Command::Frames,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("unknown command '{}' (try 'help')", other)),
    };
    Ok(command)
}

fn execute(session: &mut SwipeSession<LikedCollection>, command: Command, args: &Args) {
    let result = match command {
        Command::Swipe(direction) => session.trigger_swipe(direction),
        Command::Drag(dx) => session.drag_move(dx).and_then(|mut events| {
            events.extend(session.drag_end(dx)?);
            Ok(events)
        }),
        Command::Undo => session.undo(),
        Command::Reset => session.restart(),
        Command::Next => {
            show_photo(session, |s| s.next_image(), args);
            return;
        }
        Command::Prev => {
            show_photo(session, |s| s.prev_image(), args);
            return;
        }
        Command::Liked => {
            print_liked(session, args);
            return;
        }
        Command::Unlike(id) => {
            match session.host_mut().remove(&id) {
                Some(record) => println!("{} {}", "Removed".magenta(), record.title),
                None => println!("{} '{}' is not in the liked list", "⚠".yellow(), id),
            }
            return;
        }
        Command::Status => {
            print_status(session, args);
            return;
        }
        Command::Frames => {
            print_frames(session, args);
            return;
        }
        Command::Help => {
            print_help();
            return;
        }
        Command::Quit => return,
    };

    match result {
        Ok(mut events) => {
            events.extend(session.run_until_idle());
            print_events(&events, args);
            if !args.json && !session.is_exhausted() {
                print_top(session, args);
            }
        }
        Err(e) => print_error(&e),
    }
}

fn show_photo<F>(session: &mut SwipeSession<LikedCollection>, step: F, args: &Args)
where
    F: FnOnce(&mut SwipeSession<LikedCollection>) -> Result<usize, DeckError>,
{
    match step(session) {
        Ok(_) => print_top(session, args),
        Err(e) => print_error(&e),
    }
}

// =============================================================================
// OUTPUT
// =============================================================================

fn print_header(session: &SwipeSession<LikedCollection>) {
    println!("{}", format!("Swipedeck v{}", VERSION).bold());
    println!(
        "{} listings. Type 'like' or 'nope' (or 'help'). Type 'quit' to exit.",
        session.deck().len()
    );
    println!();
    if let Some(record) = session.active_record() {
        println!("  {}", record.summary().bold());
    }
}

fn format_prompt(session: &SwipeSession<LikedCollection>) -> String {
    let status = session.status();
    if status.exhausted {
        format!("[{}/{} done] > ", status.total, status.total)
    } else {
        format!("[{}/{}] > ", status.cursor + 1, status.total)
    }
}

fn print_events(events: &[SessionEvent], args: &Args) {
    for event in events {
        let detail = matches!(
            event,
            SessionEvent::Transition { .. } | SessionEvent::Reset { .. }
        );
        if args.json {
            match serde_json::to_string(event) {
                Ok(json) => println!("{}", json),
                Err(e) => eprintln!("failed to encode event: {}", e),
            }
        } else if detail && !args.verbose {
            continue;
        } else if args.no_color {
            println!("{}", event.to_parseable_string());
        } else {
            println!("{}", event.to_terminal_string());
        }
    }
}

fn print_top(session: &SwipeSession<LikedCollection>, args: &Args) {
    let (Some(record), Some(top)) = (session.active_record(), session.top()) else {
        return;
    };
    if args.json {
        print_json(&top.frame(0));
        return;
    }
    let photos = if record.image_count() > 0 {
        format!(" [photo {}/{}]", top.image_index() + 1, record.image_count())
    } else {
        String::new()
    };
    println!("  {}{}", record.summary().bold(), photos.bright_black());
}

fn print_liked(session: &SwipeSession<LikedCollection>, args: &Args) {
    let liked = session.host();
    if args.json {
        print_json(liked.records());
        return;
    }
    if liked.is_empty() {
        println!("No liked listings yet.");
        return;
    }
    println!("{} ({})", "Liked".green().bold(), liked.len());
    for record in liked.records() {
        println!("  {} {}", record.id.to_string().bright_black(), record.summary());
    }
}

fn print_status(session: &SwipeSession<LikedCollection>, args: &Args) {
    let status = session.status();
    if args.json {
        print_json(&status);
        return;
    }
    let top = status
        .active
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());
    println!(
        "cursor={} total={} exhausted={} top={} decided={} liked={}",
        status.cursor,
        status.total,
        status.exhausted,
        top,
        status.decided,
        session.host().len()
    );
}

fn print_frames(session: &SwipeSession<LikedCollection>, args: &Args) {
    let frames = session.frames();
    if args.json {
        print_json(&frames);
        return;
    }
    for frame in frames {
        println!("  {}", frame.to_parseable_string());
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("failed to encode output: {}", e),
    }
}

fn print_error(err: &DeckError) {
    match err {
        DeckError::OutOfRecords { .. } => println!("{}", "No more listings.".cyan()),
        DeckError::NothingToUndo => println!("{} nothing to undo", "⚠".yellow()),
        other => println!("{} {}", "⚠".yellow(), other),
    }
}

fn print_help() {
    println!("  like | right | y      accept the top card");
    println!("  nope | left | n       reject the top card");
    println!("  drag <dx>             drag and release at dx (|dx| > threshold commits)");
    println!("  undo                  undo the last decision");
    println!("  reset                 start over");
    println!("  next | prev           browse photos of the top card");
    println!("  liked                 show liked listings");
    println!("  unlike <id>           remove a listing from the liked list");
    println!("  status | frames       deck position / render frames");
    println!("  quit");
}

/// Run HTTP API server
async fn run_serve(args: &Args, config: EngineConfig, records: Vec<Record>) {
    println!();
    println!("{}", format!("Swipedeck API Server v{}", VERSION).bold());
    println!();

    if let Err(e) = run_server(&args.addr, config, records).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
