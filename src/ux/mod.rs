use colored::Colorize;
use std::io::{self, Write};

use crate::context::{AnswerInput, Familiarity};
use crate::flow::{FlowConfig, InputMode};
use crate::wire::ScreenResult;

pub fn read_line(prompt: &str) -> String {
    print!("{} ", prompt);
    let _ = io::stdout().flush();
    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        s.trim().to_string()
    } else {
        String::new()
    }
}

pub fn confirm(prompt: &str) -> bool {
    let ans = read_line(&format!("{} [y/N]:", prompt)).to_lowercase();
    ans == "y" || ans == "yes"
}

pub fn ask_name() -> String {
    loop {
        let name = read_line(&format!("{}", "What should we call you?".bold()));
        if !name.is_empty() {
            return name;
        }
        println!("{}", "A name is needed to personalize things.".yellow());
    }
}

pub fn ask_familiarity() -> Option<Familiarity> {
    println!("\n{}", "How familiar are you with affirmations?".bold());
    println!("  1. New to this");
    println!("  2. Some experience");
    println!("  3. Very experienced");
    match read_line("Pick 1-3 (or press enter to skip):").as_str() {
        "1" => Some(Familiarity::New),
        "2" => Some(Familiarity::Some),
        "3" => Some(Familiarity::Very),
        _ => None,
    }
}

pub fn ask_topic() -> Option<String> {
    let topic = read_line(&format!(
        "\n{}",
        "What would you like your affirmations to focus on?".bold()
    ));
    if topic.is_empty() {
        None
    } else {
        Some(topic)
    }
}

fn suggestion_label(mode: InputMode) -> &'static str {
    match mode {
        InputMode::Chips => "Tap a chip by number",
        InputMode::Fragments => "Start from a fragment by number",
    }
}

pub fn show_screen(screen: &ScreenResult, screen_number: u32) {
    println!();
    if !screen.reflective_statement.is_empty() {
        println!("{}", screen.reflective_statement.dimmed());
    }
    println!("{} {}", format!("[{}]", screen_number).cyan().bold(), screen.question.bold());
    for (i, chip) in screen.initial_chips.iter().enumerate() {
        println!("  {}. {}", i + 1, chip.green());
    }
    if screen.expanded_chips.len() > screen.initial_chips.len() {
        println!("  {}", "(type 'more' for more suggestions)".dimmed());
    }
}

fn show_expanded(screen: &ScreenResult) {
    for (i, chip) in screen.expanded_chips.iter().enumerate() {
        println!("  {}. {}", i + 1, chip.green());
    }
}

/// Collect one answer: numbers toggle suggestions, `more` reveals the
/// expanded list, anything else is free text. Empty submit is allowed; the
/// prompt renders it as "(no response provided)".
pub fn read_answer(screen: &ScreenResult, flow: &FlowConfig) -> AnswerInput {
    println!("{}", suggestion_label(flow.input_mode).dimmed());
    let mut selected: Vec<String> = Vec::new();
    let mut expanded = false;
    loop {
        let line = read_line(">");
        if line.eq_ignore_ascii_case("more") && !expanded {
            expanded = true;
            show_expanded(screen);
            continue;
        }
        let active = if expanded { &screen.expanded_chips } else { &screen.initial_chips };
        if let Ok(n) = line.parse::<usize>() {
            if n >= 1 && n <= active.len() {
                let chip = active[n - 1].clone();
                if !selected.contains(&chip) {
                    println!("  {} {}", "+".green(), chip);
                    selected.push(chip);
                }
                continue;
            }
        }
        if line.eq_ignore_ascii_case("done") {
            return AnswerInput { text: String::new(), selected };
        }
        return AnswerInput { text: line, selected };
    }
}

pub fn show_generating(what: &str) {
    println!("\n{}", format!("Generating {what}...").dimmed());
}

pub fn show_error(message: &str) {
    println!("{} {}", "error:".red().bold(), message);
}

/// Per-affirmation review: keep or skip.
pub fn review_affirmation(index: usize, total: usize, affirmation: &str) -> bool {
    println!("\n{} {}", format!("({}/{})", index + 1, total).dimmed(), affirmation.bold());
    confirm("Keep this one?")
}

pub fn show_kept(approved: &[String]) {
    if approved.is_empty() {
        println!("\n{}", "No affirmations kept this time.".yellow());
        return;
    }
    println!("\n{}", "Your affirmations:".bold());
    for (i, a) in approved.iter().enumerate() {
        println!("  {}. {}", i + 1, a.green());
    }
}
