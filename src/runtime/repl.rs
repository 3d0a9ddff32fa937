use anyhow::Result;
use colored::Colorize;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::client::ChatClient;
use crate::constants::KNOWN_LLMS;
use crate::view::{Page, Renderer, Route};

/// One line of interactive input
#[derive(Debug, PartialEq, Eq)]
pub enum Input {
    Message(String),
    Model(Option<String>),
    Logout,
    Help,
    Quit,
}

pub fn parse_input(line: &str) -> Input {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(command) = line.strip_prefix('/') else {
        return Input::Message(line.to_string());
    };

    let mut parts = command.splitn(2, char::is_whitespace);
    match parts.next().unwrap_or("") {
        "quit" | "exit" | "q" => Input::Quit,
        "logout" => Input::Logout,
        "help" | "?" => Input::Help,
        "model" => Input::Model(
            parts
                .next()
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_string),
        ),
        // Unknown slash commands are sent as ordinary text
        _ => Input::Message(line.to_string()),
    }
}

fn print_help() {
    println!("  /model [NAME]  show or switch the model selector");
    println!("  /logout        sign out and leave");
    println!("  /quit          leave");
}

/// Read messages from stdin until EOF, `/quit` or a successful `/logout`.
///
/// Each send is awaited before the next line is read, so the transcript
/// keeps submission order.
pub async fn run_chat(client: &ChatClient, llm: String) -> Result<()> {
    let relay = client.relay()?;
    let mut page = Page::new(llm);
    page.navigate(Route::Chat);
    let mut renderer = Renderer::new();

    println!(
        "Chatting with {} at {} (/help for commands)",
        page.llm.green(),
        client.config().chat.endpoint
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", ">".bold());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_input(&line) {
            Input::Quit => break,
            Input::Help => print_help(),
            Input::Model(None) => println!("model: {}", page.llm),
            Input::Model(Some(model)) => {
                if !KNOWN_LLMS.contains(&model.as_str()) {
                    tracing::warn!("unknown model selector {}; the server may fall back to its default", model);
                }
                page.llm = model;
                println!("model: {}", page.llm.green());
            }
            Input::Logout => {
                let manager = client.session_manager()?;
                if manager.sign_out(&mut page).await {
                    println!("Signed out.");
                    break;
                }
                renderer.render(&page);
            }
            Input::Message(text) => {
                page.message = text;
                relay.send(&mut page).await;
                renderer.render(&page);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_a_message() {
        assert_eq!(parse_input("hello\n"), Input::Message("hello".to_string()));
        assert_eq!(parse_input(""), Input::Message(String::new()));
    }

    #[test]
    fn test_slash_commands() {
        assert_eq!(parse_input("/quit"), Input::Quit);
        assert_eq!(parse_input("/logout\r\n"), Input::Logout);
        assert_eq!(parse_input("/model"), Input::Model(None));
        assert_eq!(
            parse_input("/model titan-text-express-v1"),
            Input::Model(Some("titan-text-express-v1".to_string()))
        );
    }

    #[test]
    fn test_unknown_slash_is_sent_verbatim() {
        assert_eq!(parse_input("/shrug"), Input::Message("/shrug".to_string()));
    }
}
