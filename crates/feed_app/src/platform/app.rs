use std::io::{self, BufRead};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use feed_engine::{EngineConfig, FeedEngine, FeedSnapshot, SettingsStore};
use feed_logging::{feed_info, feed_warn};

use super::{logging, render};
use crate::cli::Args;

const RENDER_POLL: Duration = Duration::from_millis(50);

const HELP: &str = "\
Type a search query and wait for results.
  <enter>     scroll to the last item
  :view N     mark item N as visible
  :more       load the next page
  :restart    reload the current query from page 1
  :help       show this text
  :quit       exit";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Query(String),
    ScrollToEnd,
    View(usize),
    More,
    Restart,
    Help,
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::ScrollToEnd;
    }
    let Some(command) = line.strip_prefix(':') else {
        return Command::Query(line.to_string());
    };
    let mut parts = command.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("more"), None) => Command::More,
        (Some("restart"), None) => Command::Restart,
        (Some("help"), None) => Command::Help,
        (Some("quit" | "q"), None) => Command::Quit,
        (Some("view"), Some(index)) => match index.parse() {
            Ok(index) => Command::View(index),
            Err(_) => Command::Unknown(line.to_string()),
        },
        _ => Command::Unknown(line.to_string()),
    }
}

pub fn run_app(args: Args) -> anyhow::Result<()> {
    logging::init(args.log, args.verbose);

    let store = SettingsStore::new(&args.settings_dir);
    let mut settings = store.load();
    if let Some(api_key) = args.api_key {
        settings.api_key = api_key;
        let path = store.save(&settings).context("saving settings")?;
        feed_info!("Stored API key in {}", path.display());
    }

    let config = EngineConfig::from_settings(&settings).with_endpoint(args.endpoint);
    let engine = Arc::new(FeedEngine::new(config).context("starting feed engine")?);
    println!("{}", engine.title());
    println!("{HELP}");

    let stop = Arc::new(AtomicBool::new(false));
    let renderer = spawn_renderer(&engine, settings.low_data_images, stop.clone());

    let result = command_loop(&engine);

    stop.store(true, Ordering::Relaxed);
    if renderer.join().is_err() {
        feed_warn!("Render thread panicked");
    }
    engine.shutdown();
    result
}

fn command_loop(engine: &FeedEngine) -> anyhow::Result<()> {
    for line in io::stdin().lock().lines() {
        let line = line.context("reading stdin")?;
        match parse_command(&line) {
            Command::Query(text) => engine.set_query(text),
            Command::ScrollToEnd => {
                if let Some(item) = engine.snapshot().last_item() {
                    engine.notify_visible(item.id);
                }
            }
            Command::View(index) => match engine.snapshot().items.get(index) {
                Some(item) => engine.notify_visible(item.id),
                None => println!("no item {index}"),
            },
            Command::More => engine.load_more(),
            Command::Restart => engine.restart(),
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
            Command::Unknown(text) => println!("unknown command {text:?}; :help lists commands"),
        }
    }
    Ok(())
}

fn spawn_renderer(
    engine: &FeedEngine,
    low_data_images: bool,
    stop: Arc<AtomicBool>,
) -> thread::JoinHandle<()> {
    let mut snapshots = engine.subscribe();
    thread::spawn(move || {
        let mut previous: Option<FeedSnapshot> = None;
        while !stop.load(Ordering::Relaxed) {
            match snapshots.has_changed() {
                Ok(true) => {
                    let current = snapshots.borrow_and_update().clone();
                    for line in render::render(previous.as_ref(), &current, low_data_images) {
                        println!("{line}");
                    }
                    previous = Some(current);
                }
                Ok(false) => thread::sleep(RENDER_POLL),
                Err(_) => break,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_query() {
        assert_eq!(parse_command("  rust lang "), Command::Query("rust lang".into()));
    }

    #[test]
    fn blank_line_scrolls_to_end() {
        assert_eq!(parse_command("   "), Command::ScrollToEnd);
    }

    #[test]
    fn colon_commands_parse() {
        assert_eq!(parse_command(":more"), Command::More);
        assert_eq!(parse_command(":restart"), Command::Restart);
        assert_eq!(parse_command(":q"), Command::Quit);
        assert_eq!(parse_command(":view 12"), Command::View(12));
    }

    #[test]
    fn malformed_commands_are_unknown() {
        assert_eq!(parse_command(":view x"), Command::Unknown(":view x".into()));
        assert_eq!(parse_command(":more 3"), Command::Unknown(":more 3".into()));
        assert_eq!(parse_command(":bogus"), Command::Unknown(":bogus".into()));
    }
}
