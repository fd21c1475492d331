//! Line-oriented console over a request workspace.
//!
//! Each input line is one [`Command`]. Positions are 1-based indices into
//! the tab strip, which is printed after every command with the active tab
//! marked `*` and the tab being renamed marked `~`.
//!
//! When the config directory is watched, edits to the schema source
//! entries made outside the session are reloaded between commands.

use std::path::PathBuf;

use rpcdesk_application::{
    ApplicationResult, ConfigStore, ConfigWatch, IMPORT_PATHS_KEY, LoadSchemaSources,
    SCHEMA_FILES_KEY, SaveSchemaSources, TabStore,
};
use rpcdesk_domain::{SchemaSources, TabId, TabPatch, WorkspaceState};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Command summary printed by `help`.
pub const HELP: &str = "\
commands:
  new                       open a tab at the front
  dup <n>                   duplicate tab n
  close <n>                 close tab n
  move <from> <to>          move a tab to another position
  select <n>                show tab n
  rename <n> [title]        start renaming tab n, or set its title
  cancel                    leave rename mode without changing the title
  set <field> <value>       edit the active tab (address, method, body)
  show                      print the active tab
  schema                    list schema sources
  schema <edit> <path>      add-import, remove-import, add-file, remove-file
  help                      print this text
  quit                      leave";

/// Errors raised while parsing a command line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// The line has no command.
    #[error("empty command")]
    Empty,

    /// The command name is not known.
    #[error("unknown command: {0} (try `help`)")]
    Unknown(String),

    /// A required argument is missing.
    #[error("{command}: missing {argument}")]
    MissingArgument {
        /// Command name.
        command: &'static str,
        /// Argument name.
        argument: &'static str,
    },

    /// A position is not a positive integer.
    #[error("invalid position: {0}")]
    InvalidPosition(String),

    /// `set` was given an unknown field.
    #[error("unknown field: {0} (expected address, method or body)")]
    UnknownField(String),

    /// `schema` was given an unknown edit.
    #[error("unknown schema edit: {0}")]
    UnknownSchemaEdit(String),
}

/// Editable field of the active tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Endpoint address.
    Address,
    /// Selected method.
    Method,
    /// Request text.
    Body,
}

impl Field {
    fn patch(self, value: String) -> TabPatch {
        match self {
            Self::Address => TabPatch::new().address(value),
            Self::Method => TabPatch::new().method(value),
            Self::Body => TabPatch::new().request_body(value),
        }
    }
}

/// Change to the schema source lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaEdit {
    /// Add an import path.
    AddImport(PathBuf),
    /// Remove an import path.
    RemoveImport(PathBuf),
    /// Add a schema file.
    AddFile(PathBuf),
    /// Remove a schema file.
    RemoveFile(PathBuf),
}

impl SchemaEdit {
    fn apply(&self, sources: &mut SchemaSources) {
        match self {
            Self::AddImport(path) => sources.add_import_paths([path.clone()]),
            Self::RemoveImport(path) => sources.remove_import_paths(std::slice::from_ref(path)),
            Self::AddFile(path) => sources.add_schema_files([path.clone()]),
            Self::RemoveFile(path) => sources.remove_schema_files(std::slice::from_ref(path)),
        }
    }
}

/// A parsed console command. Positions are zero-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open a new tab.
    New,
    /// Duplicate the tab at a position.
    Duplicate(usize),
    /// Close the tab at a position.
    Close(usize),
    /// Move a tab.
    Move {
        /// Position of the tab to move.
        from: usize,
        /// Position it should take.
        to: usize,
    },
    /// Activate the tab at a position.
    Select(usize),
    /// Enter rename mode, or commit a title when one is given.
    Rename {
        /// Tab position.
        position: usize,
        /// New title.
        title: Option<String>,
    },
    /// Leave rename mode, keeping the current title.
    CancelRename,
    /// Edit a field of the active tab.
    Set {
        /// Field to edit.
        field: Field,
        /// New value, may contain spaces.
        value: String,
    },
    /// Print the active tab.
    Show,
    /// List or edit the schema sources.
    Schema(Option<SchemaEdit>),
    /// Print the command summary.
    Help,
    /// Leave the console.
    Quit,
}

impl Command {
    /// Parses one input line.
    ///
    /// # Errors
    /// Returns a `CommandError` describing what is wrong with the line.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let (name, rest) = split_word(line);
        match name {
            "" => Err(CommandError::Empty),
            "new" => Ok(Self::New),
            "dup" => Ok(Self::Duplicate(position("dup", rest)?)),
            "close" => Ok(Self::Close(position("close", rest)?)),
            "select" => Ok(Self::Select(position("select", rest)?)),
            "move" => {
                let (from, to) = split_word(rest);
                Ok(Self::Move {
                    from: position("move", from)?,
                    to: position("move", to)?,
                })
            }
            "cancel" => Ok(Self::CancelRename),
            "rename" if rest == "cancel" => Ok(Self::CancelRename),
            "rename" => {
                let (n, title) = split_word(rest);
                Ok(Self::Rename {
                    position: position("rename", n)?,
                    title: (!title.is_empty()).then(|| title.to_string()),
                })
            }
            "set" => {
                let (field, value) = split_word(rest);
                let field = match field {
                    "" => {
                        return Err(CommandError::MissingArgument {
                            command: "set",
                            argument: "field",
                        });
                    }
                    "address" => Field::Address,
                    "method" => Field::Method,
                    "body" => Field::Body,
                    other => return Err(CommandError::UnknownField(other.to_string())),
                };
                Ok(Self::Set {
                    field,
                    value: value.to_string(),
                })
            }
            "show" => Ok(Self::Show),
            "schema" => parse_schema(rest).map(Self::Schema),
            "help" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn split_word(line: &str) -> (&str, &str) {
    let line = line.trim();
    line.split_once(char::is_whitespace)
        .map_or((line, ""), |(word, rest)| (word, rest.trim()))
}

fn position(command: &'static str, arg: &str) -> Result<usize, CommandError> {
    let (word, _) = split_word(arg);
    if word.is_empty() {
        return Err(CommandError::MissingArgument {
            command,
            argument: "position",
        });
    }
    match word.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(CommandError::InvalidPosition(word.to_string())),
    }
}

fn parse_schema(rest: &str) -> Result<Option<SchemaEdit>, CommandError> {
    let (edit, path) = split_word(rest);
    if edit.is_empty() {
        return Ok(None);
    }
    if path.is_empty() {
        return Err(CommandError::MissingArgument {
            command: "schema",
            argument: "path",
        });
    }
    let path = PathBuf::from(path);
    let edit = match edit {
        "add-import" => SchemaEdit::AddImport(path),
        "remove-import" => SchemaEdit::RemoveImport(path),
        "add-file" => SchemaEdit::AddFile(path),
        "remove-file" => SchemaEdit::RemoveFile(path),
        other => return Err(CommandError::UnknownSchemaEdit(other.to_string())),
    };
    Ok(Some(edit))
}

async fn next_change(changes: &mut Option<mpsc::UnboundedReceiver<String>>) -> Option<String> {
    match changes {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

/// Result of executing a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Text to print.
    Output(String),
    /// The user asked to leave.
    Quit,
}

/// Renders the tab strip, one tab per line.
#[must_use]
pub fn render_strip(state: &WorkspaceState) -> String {
    state
        .tabs_in_order()
        .enumerate()
        .map(|(index, tab)| {
            let active = if &tab.id == state.active_id() { '*' } else { ' ' };
            let renaming = if state.is_renaming(&tab.id) { '~' } else { ' ' };
            format!("{active}{renaming} {}. {}", index + 1, tab.title)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Console session: the tab store plus the persisted schema sources.
pub struct Console<S: ConfigStore + Clone> {
    tabs: TabStore,
    schema: SchemaSources,
    config: S,
    changes: Option<mpsc::UnboundedReceiver<String>>,
    watch: Option<ConfigWatch>,
}

impl<S: ConfigStore + Clone> Console<S> {
    /// Creates a session with a fresh workspace.
    pub fn new(config: S, schema: SchemaSources) -> Self {
        Self {
            tabs: TabStore::new(),
            schema,
            config,
            changes: None,
            watch: None,
        }
    }

    /// Creates a session with the schema sources stored in `config`.
    ///
    /// # Errors
    /// Returns an error if the stored sources cannot be read.
    pub async fn load(config: S) -> ApplicationResult<Self> {
        let schema = LoadSchemaSources::new(config.clone()).execute().await?;
        Ok(Self::new(config, schema))
    }

    /// Returns the tab store.
    pub const fn tabs(&self) -> &TabStore {
        &self.tabs
    }

    /// Returns the current schema sources.
    pub const fn schema(&self) -> &SchemaSources {
        &self.schema
    }

    /// Starts watching the config store for schema source changes.
    ///
    /// # Errors
    /// Returns an error if the store cannot be watched.
    pub fn watch_config(&mut self) -> ApplicationResult<()> {
        let (tx, rx) = mpsc::unbounded_channel();
        let watch = self.config.on_change(Box::new(move |key| {
            if key == IMPORT_PATHS_KEY || key == SCHEMA_FILES_KEY {
                let _ = tx.send(key.to_string());
            }
        }))?;
        self.changes = Some(rx);
        self.watch = Some(watch);
        Ok(())
    }

    /// Waits for the next schema source change. Never resolves when the
    /// config is not watched.
    pub async fn next_config_change(&mut self) -> Option<String> {
        next_change(&mut self.changes).await
    }

    /// Reloads the schema sources from the store. Returns whether they changed.
    ///
    /// # Errors
    /// Returns an error if the stored sources cannot be read.
    pub async fn reload_schema(&mut self) -> ApplicationResult<bool> {
        let loaded = LoadSchemaSources::new(self.config.clone()).execute().await?;
        if loaded == self.schema {
            return Ok(false);
        }
        info!(
            import_paths = loaded.import_paths.len(),
            schema_files = loaded.schema_files.len(),
            "schema sources reloaded"
        );
        self.schema = loaded;
        Ok(true)
    }

    /// Executes one command.
    ///
    /// # Errors
    /// Returns an error if persisting the schema sources fails.
    pub async fn execute(&mut self, command: Command) -> ApplicationResult<Reply> {
        debug!(?command, "executing console command");
        let note = match command {
            Command::Quit => return Ok(Reply::Quit),
            Command::Help => return Ok(Reply::Output(HELP.to_string())),
            Command::Show => return Ok(Reply::Output(self.describe_active())),
            Command::Schema(None) => return Ok(Reply::Output(self.describe_schema())),
            Command::Schema(Some(edit)) => {
                let mut next = self.schema.clone();
                edit.apply(&mut next);
                SaveSchemaSources::new(self.config.clone())
                    .execute(&next)
                    .await?;
                self.schema = next;
                return Ok(Reply::Output(self.describe_schema()));
            }
            Command::New => {
                self.tabs.create();
                None
            }
            Command::Duplicate(at) => self.with_tab(at, |tabs, id| {
                tabs.duplicate(id).map_or(Some("nothing to duplicate"), |_| None)
            }),
            Command::Close(at) => self.with_tab(at, |tabs, id| {
                (!tabs.delete(id)).then_some("cannot close the last tab")
            }),
            Command::Select(at) => self.with_tab(at, |tabs, id| {
                (!tabs.set_active(id)).then_some("nothing to select")
            }),
            Command::Rename { position, title } => self.with_tab(position, |tabs, id| {
                let applied = match title {
                    Some(title) => tabs.commit_rename(id, title),
                    None => tabs.set_renaming(Some(id)),
                };
                (!applied).then_some("nothing to rename")
            }),
            Command::CancelRename => {
                if self.tabs.state().renaming_id().is_none() {
                    Some("not renaming".to_string())
                } else {
                    self.tabs.set_renaming(None);
                    None
                }
            }
            Command::Move { from, to } => match self.id_at(to) {
                Ok(target) => self.with_tab(from, |tabs, id| {
                    (!tabs.reorder(id, &target)).then_some("nothing to move")
                }),
                Err(message) => Some(message),
            },
            Command::Set { field, value } => {
                self.tabs.update_active(field.patch(value));
                None
            }
        };

        let strip = render_strip(self.tabs.state());
        Ok(Reply::Output(match note {
            Some(note) => format!("{note}\n{strip}"),
            None => strip,
        }))
    }

    /// Reads commands from `input` until `quit` or end of input, writing
    /// replies and parse errors to `output`. Watched schema source changes
    /// are reloaded and reported as they arrive.
    ///
    /// # Errors
    /// Returns an error only if reading or writing fails.
    pub async fn run<R, W>(&mut self, input: R, output: &mut W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        loop {
            let text = tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        break;
                    };
                    if line.trim().is_empty() {
                        continue;
                    }
                    match Command::parse(&line) {
                        Ok(command) => match self.execute(command).await {
                            Ok(Reply::Quit) => break,
                            Ok(Reply::Output(text)) => text,
                            Err(error) => {
                                warn!(%error, "command failed");
                                format!("error: {error}")
                            }
                        },
                        Err(error) => error.to_string(),
                    }
                }
                Some(key) = next_change(&mut self.changes) => {
                    match self.reload_schema().await {
                        Ok(true) => format!("{key} changed on disk\n{}", self.describe_schema()),
                        Ok(false) => continue,
                        Err(error) => {
                            warn!(%error, key = %key, "schema reload failed");
                            format!("error: {error}")
                        }
                    }
                }
            };
            output.write_all(text.as_bytes()).await?;
            output.write_all(b"\n").await?;
            output.flush().await?;
        }
        Ok(())
    }

    fn id_at(&self, index: usize) -> Result<TabId, String> {
        self.tabs
            .state()
            .tab_at(index)
            .map(|tab| tab.id.clone())
            .ok_or_else(|| format!("no tab at position {}", index + 1))
    }

    fn with_tab<F>(&mut self, index: usize, action: F) -> Option<String>
    where
        F: FnOnce(&mut TabStore, &TabId) -> Option<&'static str>,
    {
        match self.id_at(index) {
            Ok(id) => action(&mut self.tabs, &id).map(str::to_string),
            Err(message) => Some(message),
        }
    }

    fn describe_active(&self) -> String {
        let Some(tab) = self.tabs.state().active_tab() else {
            return "no active tab".to_string();
        };
        format!(
            "title: {}\naddress: {}\nmethod: {}\nrequest:\n{}\nresponse:\n{}",
            tab.title, tab.address, tab.method, tab.request_body, tab.response_body
        )
    }

    fn describe_schema(&self) -> String {
        let list = |paths: &[PathBuf]| {
            if paths.is_empty() {
                "  (none)".to_string()
            } else {
                paths
                    .iter()
                    .map(|p| format!("  {}", p.display()))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        };
        format!(
            "import paths:\n{}\nschema files:\n{}",
            list(&self.schema.import_paths),
            list(&self.schema.schema_files)
        )
    }
}
