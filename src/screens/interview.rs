//! Interview page: intro, theory questions, review, score.

use crate::api::ApiClient;
use crate::domain::{RequestStatus, StudyParams};
use crate::interview::{drive, CodeChallengeHandoff, Effect, Event, InterviewMachine, Phase};
use crate::screens::{banner, Console};
use crate::util::plural;

pub enum Exit {
  Quit,
  Study,
  Code(CodeChallengeHandoff),
}

pub async fn run(console: &mut Console, api: &ApiClient, params: StudyParams) -> std::io::Result<Exit> {
  let mut machine = InterviewMachine::new(params);

  loop {
    let event = match machine.phase() {
      Phase::Intro => {
        render_intro(&machine);
        match console.ask("Press Enter to begin (q to quit) >").await? {
          None => return Ok(Exit::Quit),
          Some(l) if l == "q" => return Ok(Exit::Quit),
          Some(_) => {
            println!("Starting interview…");
            Event::Begin
          }
        }
      }
      Phase::Theory if machine.session().is_none() => {
        if machine.start_status() == RequestStatus::Failed {
          println!("! {}", machine.error().unwrap_or("Failed to start interview"));
        }
        match console.ask("r to retry, q to quit >").await? {
          None => return Ok(Exit::Quit),
          Some(l) if l == "q" => return Ok(Exit::Quit),
          Some(l) if l == "r" => {
            println!("Starting interview…");
            Event::RetryStart
          }
          Some(_) => continue,
        }
      }
      Phase::Theory => {
        render_theory(&machine);
        let Some(line) = console.ask("Answer with <number><letter> (e.g. 2b), s to submit, q to quit >").await? else {
          return Ok(Exit::Quit);
        };
        match line.as_str() {
          "q" => return Ok(Exit::Quit),
          "s" => {
            println!("Submitting...");
            Event::Submit
          }
          other => match parse_selection(&machine, other) {
            Some(ev) => ev,
            None => {
              println!("Could not read '{}'.", other);
              continue;
            }
          },
        }
      }
      Phase::Review => {
        render_review(&machine);
        match console.ask("Press Enter to continue to score >").await? {
          None => return Ok(Exit::Quit),
          Some(_) => Event::ContinueToScore,
        }
      }
      Phase::Result => {
        render_result(&machine);
        match console.ask("b back to study, c continue to coding challenge >").await? {
          None => return Ok(Exit::Quit),
          Some(l) if l == "b" => Event::BackToStudy,
          Some(l) if l == "c" => Event::ContinueToCode,
          Some(_) => continue,
        }
      }
    };

    match drive(&mut machine, api, event).await {
      Ok(effects) => {
        for effect in effects {
          match effect {
            Effect::OpenCodeChallenge(handoff) => return Ok(Exit::Code(handoff)),
            Effect::ReturnToStudy => return Ok(Exit::Study),
            Effect::StartInterview(_) | Effect::SubmitTheory(_) => {}
          }
        }
        if machine.phase() == Phase::Theory && machine.session().is_some() {
          if let Some(err) = machine.error() {
            println!("! {}", err);
          }
        }
      }
      Err(e) => println!("! {}", e),
    }
  }
}

/// "2b" -> select option B of question 2.
fn parse_selection(machine: &InterviewMachine, input: &str) -> Option<Event> {
  let session = machine.session()?;
  let letter = input.chars().last()?.to_ascii_lowercase();
  let number: usize = input[..input.len() - letter.len_utf8()].trim().parse().ok()?;
  let question = session.theory_questions.get(number.checked_sub(1)?)?;
  let index = (letter as u32).checked_sub('a' as u32)? as usize;
  let option = question.options.get(index)?;
  Some(Event::Select { question_id: question.id.clone(), option: option.clone() })
}

fn letter(i: usize) -> char {
  (b'A' + (i as u8 % 26)) as char
}

fn render_intro(machine: &InterviewMachine) {
  let p = machine.params();
  banner(&format!("{} Interview", p.language));
  println!("Topic: {} · Level: {}", p.topic, p.level);
  println!("  Estimated time: ~10 minutes");
  println!("  5 theory questions");
  println!("  Coding challenge after theory");
  println!("  No backtracking once started");
}

fn render_theory(machine: &InterviewMachine) {
  let Some(session) = machine.session() else { return };
  banner("Interview Mode");
  let total = session.theory_questions.len();
  for (n, q) in session.theory_questions.iter().enumerate() {
    println!("\nQuestion {} of {}\n{}", n + 1, total, q.question);
    let picked = machine.answers().get(&q.id);
    for (i, opt) in q.options.iter().enumerate() {
      let mark = if picked == Some(opt) { "(x)" } else { "( )" };
      println!("  {} {}. {}", mark, letter(i), opt);
    }
  }
  let left = machine.unanswered();
  if left > 0 {
    println!("\n{} unanswered", plural(left, "question"));
  }
  println!();
}

fn render_review(machine: &InterviewMachine) {
  banner("Review");
  for item in machine.review() {
    println!("\n{} {}", if item.correct { "✔" } else { "✘" }, item.question);
    for (i, opt) in item.options.iter().enumerate() {
      let tag = match (opt.selected, opt.is_correct) {
        (true, true) => "  <- your answer, correct",
        (true, false) => "  <- your answer",
        (false, true) => "  <- correct answer",
        (false, false) => "",
      };
      println!("  {}. {}{}", letter(i), opt.text, tag);
    }
  }
  println!();
}

fn render_result(machine: &InterviewMachine) {
  let Some(s) = machine.summary() else { return };
  banner("Interview Complete");
  println!("{}%  {}", s.score_percentage, s.label.text());
  println!("Total questions: {}", s.total);
  println!("Correct answers: {}", s.correct);
  println!("Questions missed: {}", s.missed);
  if !s.missed_questions.is_empty() {
    println!("\nReview missed questions");
    for q in &s.missed_questions {
      println!("\n{}", q.question_text);
      println!("  Your answer: {}", q.user_answer.as_deref().unwrap_or("-"));
      println!("  Correct answer: {}", q.correct_answer);
    }
  }
  println!();
}
