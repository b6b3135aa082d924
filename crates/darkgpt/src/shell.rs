// SPDX-FileCopyrightText: 2026 DarkGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `darkgpt shell`: interactive chat in the terminal.

use std::path::Path;

use colored::Colorize;
use darkgpt_agent::attachment::{encode_data_uri, media_type_for_path};
use darkgpt_config::DarkgptConfig;
use darkgpt_core::{DarkgptError, Message, Role};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::app::ChatStack;

/// Logs in as `email`, prints the conversation, then reads turns until
/// `/quit` or Ctrl-D.
pub async fn run_shell(config: DarkgptConfig, email: &str) -> Result<(), DarkgptError> {
    let password = rpassword::prompt_password("Password: ")
        .map_err(|e| DarkgptError::Internal(format!("failed to read password: {e}")))?;

    let stack = ChatStack::build(&config).await?;
    let login = stack.identity.login(email, &password).await?;
    let session = stack.sessions.get_or_load(&login.user.id).await?;
    let agent_name = config.agent.name.as_str();

    let mut rl = DefaultEditor::new()
        .map_err(|e| DarkgptError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", format!("{agent_name} shell").bold().green());
    println!(
        "Signed in as {}. Commands: {} {} {} {}\n",
        login.user.name.bold(),
        "/expert".yellow(),
        "/image <path>".yellow(),
        "/history".yellow(),
        "/quit".yellow()
    );
    print_messages(&session.messages().await, agent_name);

    let mut expert_mode = false;
    let mut pending_image: Option<String> = None;

    loop {
        let prompt = match (expert_mode, pending_image.is_some()) {
            (true, true) => format!("{}{}> ", "[expert]".red(), "[image]".cyan()),
            (true, false) => format!("{}> ", "[expert]".red()),
            (false, true) => format!("{}> ", "[image]".cyan()),
            (false, false) => "> ".to_string(),
        };

        let line = match rl.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        };

        let trimmed = line.trim();
        if trimmed.is_empty() && pending_image.is_none() {
            continue;
        }
        let _ = rl.add_history_entry(&line);

        let text = match parse_command(trimmed) {
            Command::Quit => break,
            Command::ToggleExpert => {
                expert_mode = !expert_mode;
                let state = if expert_mode { "on" } else { "off" };
                println!("{}", format!("expert mode {state}").dimmed());
                continue;
            }
            Command::History => {
                print_messages(&session.messages().await, agent_name);
                continue;
            }
            Command::Image(path) => {
                match load_image(path).await {
                    Ok(uri) => {
                        pending_image = Some(uri);
                        println!("{}", "image attached to your next message".dimmed());
                    }
                    Err(e) => eprintln!("{}: {e}", "error".red()),
                }
                continue;
            }
            Command::Unknown(name) => {
                eprintln!("{}: unknown command {name}", "error".red());
                println!("{}", USAGE.dimmed());
                continue;
            }
            Command::Chat(text) => text,
        };

        match session
            .send(text, pending_image.take(), expert_mode)
            .await
        {
            Ok(reply) => print_message(&reply, agent_name),
            Err(e) => eprintln!("{}: {e}", "error".red()),
        }
    }

    stack.identity.logout(&login.token);
    stack.shutdown().await?;
    println!("{}", "goodbye".dimmed());
    Ok(())
}

const USAGE: &str = "commands: /expert, /image <path>, /history, /quit";

/// One line of shell input.
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Quit,
    ToggleExpert,
    History,
    Image(&'a str),
    Unknown(&'a str),
    Chat(&'a str),
}

/// Splits a trimmed input line into a slash command or chat text. Command
/// names match as whole words, so `/imagefoo` is unknown rather than an image.
fn parse_command(line: &str) -> Command<'_> {
    if !line.starts_with('/') {
        return Command::Chat(line);
    }
    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };
    match name {
        "/quit" | "/exit" => Command::Quit,
        "/expert" => Command::ToggleExpert,
        "/history" => Command::History,
        "/image" => Command::Image(rest),
        _ => Command::Unknown(name),
    }
}

async fn load_image(path: &str) -> Result<String, DarkgptError> {
    if path.is_empty() {
        return Err(DarkgptError::Validation("usage: /image <path>".into()));
    }
    let path = Path::new(path);
    let media_type = media_type_for_path(path).ok_or_else(|| {
        DarkgptError::Validation("image must be a png, jpeg, gif or webp file".into())
    })?;
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        DarkgptError::Validation(format!("cannot read {}: {e}", path.display()))
    })?;
    Ok(encode_data_uri(media_type, &bytes))
}

fn print_messages(messages: &[Message], agent_name: &str) {
    for message in messages {
        print_message(message, agent_name);
    }
}

fn print_message(message: &Message, agent_name: &str) {
    let speaker = match message.role {
        Role::User => "you".cyan().bold(),
        Role::Assistant => agent_name.green().bold(),
        Role::System => "system".dimmed(),
    };
    let image = if message.image.is_some() {
        format!("{} ", "[image]".dimmed())
    } else {
        String::new()
    };
    println!("{speaker}: {image}{}\n", message.content);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_chat() {
        assert_eq!(parse_command("hello /image"), Command::Chat("hello /image"));
        assert_eq!(parse_command(""), Command::Chat(""));
    }

    #[test]
    fn known_commands_parse() {
        assert_eq!(parse_command("/quit"), Command::Quit);
        assert_eq!(parse_command("/exit"), Command::Quit);
        assert_eq!(parse_command("/expert"), Command::ToggleExpert);
        assert_eq!(parse_command("/history"), Command::History);
        assert_eq!(
            parse_command("/image  photos/cat.png"),
            Command::Image("photos/cat.png")
        );
        assert_eq!(parse_command("/image"), Command::Image(""));
    }

    #[test]
    fn image_prefix_needs_a_word_boundary() {
        assert_eq!(parse_command("/imagefoo"), Command::Unknown("/imagefoo"));
        assert_eq!(parse_command("/imagefoo bar.png"), Command::Unknown("/imagefoo"));
    }

    #[test]
    fn unknown_commands_are_not_sent_as_chat() {
        assert_eq!(parse_command("/help"), Command::Unknown("/help"));
        assert_eq!(parse_command("/quitnow"), Command::Unknown("/quitnow"));
    }
}
