//! Study page: form, generated material, quiz.

use crate::api::ApiClient;
use crate::domain::{Level, StudyParams, StudyResult};
use crate::screens::{banner, Console};
use crate::study::{GenerateOutcome, StudyController};

const HELP: &str = "Commands: t <topic> | l <Junior|Mid|Senior> | g (generate) | a (show/hide quiz answers) | s (start interview) | x (end session) | q (quit)";

/// Returns the params to start an interview with, or None to quit.
pub async fn run(
  console: &mut Console,
  controller: &mut StudyController,
  api: &ApiClient,
) -> std::io::Result<Option<StudyParams>> {
  banner("AI Interview Study Tool");
  let mut show_answers = false;
  render(controller, show_answers);
  println!("{}", HELP);

  loop {
    let draft = controller.draft();
    let prompt = format!("[topic: {:?} · level: {}] >", draft.topic, draft.level);
    let Some(line) = console.ask(&prompt).await? else { return Ok(None) };
    let (cmd, arg) = line.split_once(' ').map(|(c, a)| (c, a.trim())).unwrap_or((line.as_str(), ""));

    match cmd {
      "t" => controller.set_topic(arg),
      "l" => match arg.parse::<Level>() {
        Ok(level) => controller.set_level(level),
        Err(e) => println!("{}", e),
      },
      "g" => {
        if !controller.generate_enabled() {
          println!("Generating...");
          continue;
        }
        println!("Generating interview material...");
        match controller.generate(api).await {
          Ok(GenerateOutcome::Generated) => render(controller, show_answers),
          Ok(GenerateOutcome::Unchanged) => println!("Already showing material for this topic and level."),
          Err(e) => {
            println!("{}", status_line(controller).unwrap_or_else(|| format!("! {}", e)));
            if e.is_retryable() {
              println!("  You can try again with g.");
            }
          }
        }
      }
      "x" => {
        controller.end_session();
        println!("Session cleared.");
      }
      "a" => {
        show_answers = !show_answers;
        render(controller, show_answers);
      }
      "s" => match controller.interview_params() {
        Ok(params) => return Ok(Some(params)),
        Err(e) => println!("! {}", e),
      },
      "q" => return Ok(None),
      "" => {}
      _ => println!("{}", HELP),
    }
  }
}

/// Last generation or validation error kept by the controller.
fn status_line(controller: &StudyController) -> Option<String> {
  controller.error().map(|e| format!("! {}", e))
}

fn render(controller: &StudyController, show_answers: bool) {
  if let Some(line) = status_line(controller) {
    println!("{}", line);
  }
  match controller.current() {
    Some(last) => {
      println!("-- {} ({}, {}) --", last.params.topic, last.params.level, last.params.language);
      render_result(&last.data, show_answers);
    }
    None => println!("Enter a valid topic to generate interview material."),
  }
}

fn render_result(data: &StudyResult, show_answers: bool) {
  println!("\nDefinition\n  {}", data.definition);
  println!("\nWhen to use");
  for item in &data.when_to_use {
    println!("  - {}", item);
  }
  println!("\nExample\n{}", data.example.code);
  if !data.example.explanation.is_empty() {
    println!("  {}", data.example.explanation);
  }
  println!("\nComplexity\n  Average: {}\n  Worst: {}", data.complexity.average, data.complexity.worst);
  println!("\nCommon mistakes");
  for m in &data.common_mistakes {
    println!("  - {}", m);
  }
  println!("\nQuiz");
  for (i, q) in data.quiz.iter().enumerate() {
    println!("  {}. {}", i + 1, q.question);
    for opt in &q.options {
      println!("     • {}", opt);
    }
    if show_answers {
      println!("     Correct answer: {}", q.correct_answer);
    }
  }
}
