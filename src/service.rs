use std::path::Path;

use tracing::debug;

use crate::prompt::{Prompter, StdinPrompter};
use crate::runner::{ProcessRunner, SystemRunner};
use crate::store::{LAST, NoteStore};
use crate::sync::{SyncOutcome, SyncWorkflow, confirm_and_sync};
use crate::{Config, Note, NoteId, Selection, TitleEntry, ZetError, index};

/// Prompt shown above an interactive pick list.
pub const PICK_PROMPT: &str = "#> ";

/// How the user identifies the note a command acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteTarget {
    /// The most recently modified note.
    Last,
    /// A note named by its identifier.
    Id(NoteId),
    /// A note picked interactively from title matches.
    Search(String),
}

/// Git subcommands exposed through `zet git`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum GitOperation {
    Pull,
    Status,
    Push,
    Log,
    Stash,
    StashPop,
    #[value(alias = "lg")]
    Lazygit,
}

impl GitOperation {
    /// Program run for this operation.
    pub fn program(self) -> &'static str {
        match self {
            Self::Lazygit => "lazygit",
            _ => "git",
        }
    }

    /// Arguments passed to [`Self::program`].
    pub fn args(self) -> &'static [&'static str] {
        match self {
            Self::Pull => &["pull"],
            Self::Status => &["status"],
            Self::Push => &["push"],
            Self::Log => &["log"],
            Self::Stash => &["stash"],
            Self::StashPop => &["stash", "pop"],
            Self::Lazygit => &[],
        }
    }
}

/// Service layer providing the zettelkasten commands.
///
/// ZetService owns the note store and the collaborators used to talk to the
/// outside world: a [`ProcessRunner`] for the editor and git, and a
/// [`Prompter`] for confirmations and pick lists. It keeps no state between
/// commands.
///
/// # Examples
///
/// ```no_run
/// use zet::{ConfigBuilder, ZetService};
///
/// # fn main() -> anyhow::Result<()> {
/// let config = ConfigBuilder::new().repo("/home/me/Repos/zet").build();
/// let service = ZetService::system(config)?;
/// for entry in service.find("golang")? {
///     println!("{entry}");
/// }
/// # Ok(())
/// # }
/// ```
pub struct ZetService<R = SystemRunner, P = StdinPrompter> {
    config: Config,
    store: NoteStore,
    runner: R,
    prompter: P,
}

impl ZetService<SystemRunner, StdinPrompter> {
    /// Creates a service that runs real processes and reads stdin.
    pub fn system(config: Config) -> Result<Self, ZetError> {
        Self::new(config, SystemRunner::new(), StdinPrompter::new())
    }
}

impl<R: ProcessRunner, P: Prompter> ZetService<R, P> {
    /// Creates a service for the repository named by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ZetError::MissingConfig`] if no repository is configured.
    /// A relative repository path is resolved against the current directory.
    pub fn new(config: Config, runner: R, prompter: P) -> Result<Self, ZetError> {
        let store = NoteStore::open(config.require_repo()?)?;
        Ok(Self {
            config,
            store,
            runner,
            prompter,
        })
    }

    pub fn store(&self) -> &NoteStore {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn repo(&self) -> &Path {
        self.store.root()
    }

    /// Creates a note, opens it in the editor, then offers to sync it.
    ///
    /// # Errors
    ///
    /// Returns [`ZetError::Usage`] for an empty title before touching disk.
    pub fn create(&self, title: &str) -> Result<SyncOutcome, ZetError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ZetError::Usage("zet title cannot be empty".to_string()));
        }

        let id = NoteId::now()?;
        let path = self.store.create_note(&id)?;
        self.store.write_initial_document(&path, title)?;
        debug!(%id, title, "created zet");

        let mut note = Note::new(id, title, path);
        self.open_in_editor(&mut note)?;
        self.sync(&mut note)
    }

    /// Returns the most recently modified note.
    pub fn last(&self) -> Result<NoteId, ZetError> {
        self.store.resolve_note(LAST)
    }

    /// Opens the target note in the editor, then offers to sync it.
    ///
    /// Returns `Ok(None)` when a search produced no usable selection.
    pub fn edit(&self, target: &NoteTarget) -> Result<Option<SyncOutcome>, ZetError> {
        let Some(id) = self.resolve_target(target)? else {
            return Ok(None);
        };
        let mut note = self.existing_note(&id)?;
        self.open_in_editor(&mut note)?;
        self.sync(&mut note).map(Some)
    }

    /// Returns the target note's markdown document.
    ///
    /// Returns `Ok(None)` when a search produced no usable selection.
    pub fn view(&self, target: &NoteTarget) -> Result<Option<String>, ZetError> {
        let Some(id) = self.resolve_target(target)? else {
            return Ok(None);
        };
        self.store.read_document(&id).map(Some)
    }

    /// Lists every note with its title, in enumeration order.
    pub fn all(&self) -> Result<Vec<TitleEntry>, ZetError> {
        let ids = self.store.list_notes()?;
        Ok(index::find_titles(&self.store, &ids))
    }

    /// Notes whose title contains `query`, ignoring case.
    pub fn find(&self, query: &str) -> Result<Vec<TitleEntry>, ZetError> {
        if query.trim().is_empty() {
            return Err(ZetError::Usage("search query cannot be empty".to_string()));
        }
        Ok(index::search_titles(query, &self.all()?))
    }

    /// Notes whose body contains the tag `#<query>`.
    pub fn tags(&self, query: &str) -> Result<Vec<TitleEntry>, ZetError> {
        let tag = query.trim_start_matches('#');
        if tag.is_empty() {
            return Err(ZetError::Usage("tag cannot be empty".to_string()));
        }
        let ids = self.store.list_notes()?;
        index::search_tags(tag, &self.store, &ids)
    }

    /// Runs a git operation interactively in the repository.
    pub fn git(&self, operation: GitOperation) -> Result<(), ZetError> {
        self.runner
            .run_interactive(self.repo(), operation.program(), operation.args())
    }

    /// Shows title matches as a numbered list and reads the user's pick.
    ///
    /// Prints an informational message and returns `Ok(None)` when nothing
    /// matches, the reply is empty, or the reply matches no entry.
    pub fn select(&self, query: &str) -> Result<Option<NoteId>, ZetError> {
        let choices = Selection::enumerate(self.find(query)?);
        if choices.is_empty() {
            println!("No entries found for {query:?}");
            return Ok(None);
        }
        for choice in &choices {
            println!("{choice}");
        }

        let reply = self.prompter.prompt(PICK_PROMPT);
        if reply.trim().is_empty() {
            println!("exiting. did not provide valid entry.");
            return Ok(None);
        }
        match Selection::pick(&choices, &reply) {
            Some(choice) => Ok(Some(choice.entry.id.clone())),
            None => {
                println!("Key entered does not match, or zet could not be found");
                Ok(None)
            }
        }
    }

    fn resolve_target(&self, target: &NoteTarget) -> Result<Option<NoteId>, ZetError> {
        match target {
            NoteTarget::Last => self.store.resolve_note(LAST).map(Some),
            NoteTarget::Id(id) => Ok(Some(id.clone())),
            NoteTarget::Search(query) => self.select(query),
        }
    }

    fn existing_note(&self, id: &NoteId) -> Result<Note, ZetError> {
        let note = self.store.load(id);
        if !note.path().is_dir() {
            return Err(ZetError::NotFound(format!(
                "zet {id} does not exist in {}",
                self.repo().display()
            )));
        }
        Ok(note)
    }

    /// Hands the note's document to the editor and re-reads its title.
    ///
    /// `EDITOR` may carry arguments (`code --wait`); it is split on
    /// whitespace.
    fn open_in_editor(&self, note: &mut Note) -> Result<(), ZetError> {
        let readme = self.store.readme_path(note.id());
        let readme = readme.to_string_lossy();
        let mut words = self.config.editor().split_whitespace();
        let program = words.next().unwrap_or_default();
        let mut args: Vec<&str> = words.collect();
        args.push(readme.as_ref());

        self.runner.run_interactive(self.repo(), program, &args)?;
        note.set_title(index::extract_title(note.path()));
        Ok(())
    }

    fn sync(&self, note: &mut Note) -> Result<SyncOutcome, ZetError> {
        let mut workflow =
            SyncWorkflow::new(self.repo(), &self.runner, self.config.remote_override());
        confirm_and_sync(&mut workflow, &self.prompter, note)
    }
}
