//! Terminal front-end: study form, interview phases, code challenge.
//!
//! Screens only read controller state and forward user actions; rules live in the core modules.
//! Prompts go to stdout, logs to stderr.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{info, instrument};

use crate::api::ApiClient;
use crate::session_store::SessionStore;
use crate::study::StudyController;

pub mod code;
pub mod interview;
pub mod study;

/// Line-oriented stdin/stdout. `None` from a read means EOF (treated as quit).
pub struct Console {
  lines: Lines<BufReader<Stdin>>,
}

impl Console {
  pub fn new() -> Self {
    Self { lines: BufReader::new(tokio::io::stdin()).lines() }
  }

  pub async fn ask(&mut self, prompt: &str) -> std::io::Result<Option<String>> {
    print!("{} ", prompt);
    std::io::stdout().flush()?;
    Ok(self.lines.next_line().await?.map(|l| l.trim().to_string()))
  }

  /// Multi-line input terminated by a line containing only ".".
  pub async fn read_block(&mut self) -> std::io::Result<Option<String>> {
    let mut out = Vec::new();
    loop {
      match self.lines.next_line().await? {
        None => return Ok(None),
        Some(line) if line.trim() == "." => break,
        Some(line) => out.push(line),
      }
    }
    Ok(Some(out.join("\n")))
  }
}

pub fn banner(title: &str) {
  println!();
  println!("=== {} ===", title);
}

/// Study -> interview -> code challenge, until the user quits.
#[instrument(level = "info", skip_all)]
pub async fn run(api: &ApiClient, store: SessionStore, language: &str) -> std::io::Result<()> {
  let mut console = Console::new();
  let mut controller = StudyController::init(store, language);

  loop {
    let params = match study::run(&mut console, &mut controller, api).await? {
      Some(params) => params,
      None => break,
    };
    let handoff = match interview::run(&mut console, api, params).await? {
      interview::Exit::Quit => break,
      interview::Exit::Study => continue,
      interview::Exit::Code(handoff) => handoff,
    };
    if !code::run(&mut console, api, handoff).await? {
      break;
    }
  }
  info!(target: "studyprep", "Session finished");
  Ok(())
}
