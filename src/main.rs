//! Terminal driver for the confession page.
//!
//! Reads one command per line from stdin and writes the page after each one.

use std::sync::Arc;

use confession_page::config::{
    ConfigManager,
    PageSettings,
};
use confession_page::i18n::{
    FilePreferences,
    FsFetcher,
    SystemLocale,
};
use confession_page::page::controller::ids;
use confession_page::page::selector::LANGUAGE_SELECT_ID;
use confession_page::page::{
    Document,
    HeadlessDocument,
    UiEvent,
};
use confession_page::{
    Page,
    ResourceStore,
};
use tokio::io::{
    AsyncBufReadExt,
    AsyncWriteExt,
    BufReader,
};

const HELP: &str = "commands: name <text> | confirm | no | yes | lang <code> | show | quit\n";

/// One line of user input.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Name(String),
    Event(UiEvent),
    Show,
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let (head, rest) = line.split_once(' ').map_or((line, ""), |(h, r)| (h, r.trim()));
    match head {
        "name" => Command::Name(rest.to_string()),
        "confirm" => Command::Event(UiEvent::click(ids::CONFIRM_BUTTON)),
        "no" => Command::Event(UiEvent::click(ids::NO_BUTTON)),
        "yes" => Command::Event(UiEvent::click(ids::YES_BUTTON)),
        "lang" if !rest.is_empty() => Command::Event(UiEvent::change(LANGUAGE_SELECT_ID, rest)),
        "show" | "" => Command::Show,
        "quit" | "exit" => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    }
}

fn load_config() -> ConfigManager {
    let mut config_manager = ConfigManager::new();
    let config_dir = std::env::current_dir().ok();
    if let Err(error) = config_manager.load_settings(config_dir) {
        tracing::error!("Configuration error: {}", error);
    }
    config_manager
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config_manager = load_config();
    let settings: &PageSettings = config_manager.get_settings();
    let store = Arc::new(ResourceStore::from_settings(
        FsFetcher::new(config_manager.resolve_path(&settings.resource_root)),
        FilePreferences::new(config_manager.resolve_path(&settings.preference_file)),
        settings,
    ));
    let mut page =
        Page::new(store, SystemLocale, HeadlessDocument::confession_page(), settings);
    page.start().await;

    let mut stdout = tokio::io::stdout();
    stdout.write_all(HELP.as_bytes()).await?;
    stdout.write_all(page.document().render_text().as_bytes()).await?;
    stdout.flush().await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Command::Name(name) => {
                if let Some(input) = page.document().element_by_id(ids::USERNAME_INPUT) {
                    page.document_mut().set_input_value(input, &name);
                }
            }
            Command::Event(event) => {
                if let Err(error) = page.dispatch(&event).await {
                    tracing::error!("{}", error);
                }
            }
            Command::Show => {}
            Command::Quit => break,
            Command::Unknown(text) => {
                stdout.write_all(format!("unknown command: {text}\n{HELP}").as_bytes()).await?;
            }
        }
        stdout.write_all(b"\n").await?;
        stdout.write_all(page.document().render_text().as_bytes()).await?;
        stdout.flush().await?;
    }

    Ok(())
}
