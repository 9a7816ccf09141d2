//! Genesis headless shell: drives the controller from stdin, one command per line.
//!
//! Usage: `genesis`, then type `help`.

use std::sync::{Arc, Weak};

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;

use genesis_lib::breath::{BreathSink, PulseFrame};
use genesis_lib::controller::AppController;
use genesis_lib::state::load_config;
use genesis_lib::types::{BreathPhase, Config, Insight, Language, ListKind};

const HELP: &str = "\
commands:
  show                      print the full snapshot as JSON
  add intention|emotion T   append an item
  remove intention|emotion ID
  symbol S                  set the potential symbol
  lang pt|en                switch language
  analyse                   request an insight and blend it
  meditate                  open the breathing overlay
  exit                      close the overlay
  quit";

/// Prints each breath phase cue as it arrives.
struct ConsoleSink {
    controller: Weak<AppController>,
}

impl BreathSink for ConsoleSink {
    fn phase_changed(&self, phase: BreathPhase) {
        if let Some(controller) = self.controller.upgrade() {
            let cue = controller.phase_cue(phase);
            println!("[{}] {} ({})", cue.label, cue.quote, cue.accent);
        }
    }

    fn frame(&self, _frame: PulseFrame) {}
}

fn parse_kind(word: &str) -> Option<ListKind> {
    match word {
        "intention" | "intentions" | "i" => Some(ListKind::Intentions),
        "emotion" | "emotions" | "e" => Some(ListKind::Emotions),
        _ => None,
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Run one analysis off the input loop so edits and meditation stay live
/// while the provider answers.
fn spawn_analysis(controller: &Arc<AppController>) -> JoinHandle<Option<Insight>> {
    let controller = controller.clone();
    tokio::spawn(async move {
        let insight = controller.request_insight().await;
        let printed = match &insight {
            Some(insight) => {
                print_json(insight).and_then(|()| print_json(&controller.coherence()))
            }
            None => {
                println!("an analysis is already running");
                Ok(())
            }
        };
        if let Err(e) = printed {
            log::warn!("Failed to print insight: {}", e);
        }
        insight
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            genesis_lib::init_logging("info");
            log::warn!("{}. Using default configuration.", e);
            Config::default()
        }
    };
    genesis_lib::init_logging(&config.log_level);

    let controller = Arc::new(AppController::from_config(config));
    controller.set_breath_sink(Arc::new(ConsoleSink {
        controller: Arc::downgrade(&controller),
    }));

    println!("Genesis. Type `help` for commands.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();

        match command {
            "" => {}
            "help" => println!("{}", HELP),
            "show" => print_json(&controller.snapshot())?,
            "add" | "remove" => {
                let (kind, arg) = rest.split_once(' ').unwrap_or((rest, ""));
                let Some(kind) = parse_kind(kind) else {
                    println!("expected `intention` or `emotion`");
                    continue;
                };
                if command == "add" {
                    match controller.add_item(kind, arg) {
                        Some(id) => println!("added {}", id),
                        None => println!("ignored: empty text"),
                    }
                } else if !controller.remove_item(kind, arg.trim()) {
                    println!("no item with id {}", arg.trim());
                }
                print_json(&controller.coherence())?;
            }
            "symbol" => match controller.set_symbol(rest) {
                Some(symbol) => println!("symbol {}", symbol),
                None => println!("ignored: empty symbol"),
            },
            "lang" => match Language::from_tag(rest) {
                Some(language) => controller.set_language(language),
                None => println!("unknown language `{}`", rest),
            },
            "analyse" | "analyze" => {
                if controller.mode_flags().is_loading_insight {
                    println!("an analysis is already running");
                } else {
                    println!("analysing...");
                    spawn_analysis(&controller);
                }
            }
            "meditate" => {
                if !controller.enter_meditation() {
                    println!("already meditating");
                }
            }
            "exit" => {
                controller.exit_meditation();
            }
            "quit" => break,
            other => println!("unknown command `{}`; try `help`", other),
        }
    }

    controller.exit_meditation();
    Ok(())
}
