//! The main menu loop and the state it owns.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{error, info};

use super::chat::{ChatMode, ChatSession};
use super::editor::SettingsEditor;
use super::history::SessionLog;
use super::settings::defaults::MENU_KEY;
use super::settings::ConfigTree;
use crate::api::CompletionClient;
use crate::auth::Credential;
use crate::utils::console::{Console, UiError};

const BANNER: &str = "ChatGPT Browser Prototype";
const MENU_HEADER: &str = "\nMain Menu:";
const CHOICE_PROMPT: &str = "Enter your choice: ";
const INVALID_CHOICE_MSG: &str = "Invalid choice. Please try again.";
const EXIT_MSG: &str = "Exiting the program...";
const HELP_TEXT: &str = "\nHelp:
  1  Chat with the configured model. At the query prompt, type 'f' to send
     the \"query\" field of a JSON file, or 'x' to return to this menu.
  2  Copilot: chat as above; responses are also stored as copilot responses.
  3  Export this session's chat history to gpt_chat_export_<timestamp>.json.
  s  Change settings: model, max tokens, temperature and role.
  x  Exit.";

/// Everything a run of the program keeps between menu choices.
pub struct SessionContext {
    pub settings: ConfigTree,
    pub history: SessionLog,
    pub credential: Credential,
    pub export_dir: PathBuf,
}

impl SessionContext {
    pub fn new(
        settings: ConfigTree,
        credential: Credential,
        export_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            settings,
            history: SessionLog::new(),
            credential,
            export_dir: export_dir.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Chat,
    Copilot,
    Export,
    Settings,
    Help,
    Exit,
    Invalid,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Self {
        match input {
            "1" => MenuChoice::Chat,
            "2" => MenuChoice::Copilot,
            "3" => MenuChoice::Export,
            "s" => MenuChoice::Settings,
            "?" => MenuChoice::Help,
            "x" => MenuChoice::Exit,
            _ => MenuChoice::Invalid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuFlow {
    Continue,
    Exit,
}

pub struct MenuController<R, W, C> {
    context: SessionContext,
    console: Console<R, W>,
    client: C,
}

impl<R, W, C> MenuController<R, W, C>
where
    R: BufRead,
    W: Write,
    C: CompletionClient,
{
    pub fn new(context: SessionContext, console: Console<R, W>, client: C) -> Self {
        Self {
            context,
            console,
            client,
        }
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn console(&self) -> &Console<R, W> {
        &self.console
    }

    /// Show the menu and dispatch choices until the user exits.
    ///
    /// End of input anywhere counts as choosing to exit.
    pub async fn run(&mut self) -> Result<(), UiError> {
        self.console.say(BANNER)?;
        self.console
            .say(format!("Date: {}", Local::now().format("%Y-%m-%d")))?;

        loop {
            let flow = match self.next_choice() {
                Ok(choice) => self.dispatch(choice).await,
                Err(err) => Err(err),
            };
            match flow {
                Ok(MenuFlow::Continue) => {}
                Ok(MenuFlow::Exit) => return Ok(()),
                Err(UiError::InputClosed) => {
                    info!("Input closed; leaving menu loop");
                    return Ok(());
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn next_choice(&mut self) -> Result<MenuChoice, UiError> {
        self.console.say(MENU_HEADER)?;
        if let Some(menu) = self.context.settings.subtree(MENU_KEY) {
            for (key, label) in menu.iter() {
                self.console.say(format!("{key}. {label}"))?;
            }
        }
        let input = self.console.prompt(CHOICE_PROMPT)?;
        Ok(MenuChoice::parse(&input))
    }

    pub async fn dispatch(&mut self, choice: MenuChoice) -> Result<MenuFlow, UiError> {
        info!(?choice, "Menu choice");
        match choice {
            MenuChoice::Chat => self.chat(ChatMode::Standard).await?,
            MenuChoice::Copilot => self.chat(ChatMode::Copilot).await?,
            MenuChoice::Export => self.export_history()?,
            MenuChoice::Settings => {
                SettingsEditor::new(&mut self.console).run(&mut self.context.settings)?;
            }
            MenuChoice::Help => self.console.say(HELP_TEXT)?,
            MenuChoice::Exit => {
                self.console.say(EXIT_MSG)?;
                return Ok(MenuFlow::Exit);
            }
            MenuChoice::Invalid => self.console.say(INVALID_CHOICE_MSG)?,
        }
        Ok(MenuFlow::Continue)
    }

    async fn chat(&mut self, mode: ChatMode) -> Result<(), UiError> {
        ChatSession::new(&mut self.context, &mut self.console, &self.client, mode)
            .run()
            .await
    }

    fn export_history(&mut self) -> Result<(), UiError> {
        let timestamp = Local::now().naive_local();
        match self
            .context
            .history
            .export(&self.context.export_dir, timestamp)
        {
            Ok(path) => {
                let location = export_location(&self.context.export_dir, &path);
                self.console
                    .say(format!("\nChat history exported to {location}"))
            }
            Err(err) => {
                error!(error = %err, "Export failed");
                self.console.say(format!("\nExport failed: {err}"))
            }
        }
    }
}

/// How an export path is reported: bare file name for the working
/// directory, the full path otherwise.
fn export_location(export_dir: &Path, path: &Path) -> String {
    match path.file_name() {
        Some(name) if export_dir == Path::new(".") => name.to_string_lossy().into_owned(),
        _ => path.display().to_string(),
    }
}
