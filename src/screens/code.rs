//! Coding challenge page.

use crate::api::ApiClient;
use crate::code_challenge::CodeChallenge;
use crate::interview::CodeChallengeHandoff;
use crate::screens::{banner, Console};

const HELP: &str = "Commands: e (edit, finish with a line containing only '.') | p (print code) | r (reset editor) | s (submit) | o (start over) | h (home) | q (quit)";

/// Returns false when the user quits the program.
pub async fn run(console: &mut Console, api: &ApiClient, handoff: CodeChallengeHandoff) -> std::io::Result<bool> {
  let mut challenge = CodeChallenge::new(handoff);

  banner("Coding Challenge");
  println!("{}", challenge.question().prompt);
  println!("\nMethod signature:\n  {}", challenge.question().method_signature);
  println!("Implement only the method body.\n");
  println!("{}", challenge.code());
  println!("{}", HELP);

  loop {
    let Some(line) = console.ask(">").await? else { return Ok(false) };
    match line.as_str() {
      "e" => {
        let Some(code) = console.read_block().await? else { return Ok(false) };
        challenge.set_code(code);
      }
      "p" => println!("{}", challenge.code()),
      "r" => {
        challenge.restore_template();
        println!("{}", challenge.code());
      }
      "s" => {
        println!("Evaluating…");
        match challenge.submit(api).await {
          Ok(eval) => {
            println!("\n{}", if eval.passed { "PASSED" } else { "NEEDS WORK" });
            println!("Score: {}", eval.score);
            println!("Status: {}", if eval.passed { "Solution accepted" } else { "Solution rejected" });
            println!("{}\n", eval.feedback);
          }
          Err(e) => println!("! {}", e),
        }
      }
      "o" => {
        challenge.reset();
        println!("{}", challenge.code());
      }
      "h" => return Ok(true),
      "q" => return Ok(false),
      "" => {}
      _ => println!("{}", HELP),
    }
  }
}
