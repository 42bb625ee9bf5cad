//! Synchronization of a note with the git remote.
//!
//! The workflow walks a fixed sequence of stages and stops at the first
//! failure. Completed stages are never undone: a failed push leaves the local
//! commit in place, and no failure touches the note's files.

use std::fmt;
use std::path::Path;

use tracing::debug;

use crate::prompt::{Prompter, is_affirmative};
use crate::runner::ProcessRunner;
use crate::{Note, ZetError, index};

const GIT: &str = "git";

/// Question asked before any git command runs.
pub const CONFIRM_PROMPT: &str = "Commit? (y/N) ";

/// Progress of a synchronization run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SyncStage {
    Idle,
    RemoteVerified,
    Pulled,
    Staged,
    Committed,
    Pushed,
}

impl fmt::Display for SyncStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::RemoteVerified => "remote verified",
            Self::Pulled => "pulled",
            Self::Staged => "staged",
            Self::Committed => "committed",
            Self::Pushed => "pushed",
        };
        f.write_str(name)
    }
}

/// How a confirm-then-sync request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The user did not confirm; nothing was versioned.
    Declined,
    /// Every stage through the push succeeded.
    Pushed,
}

/// Pull, stage, commit, and push a single note.
///
/// Every git command runs with the repository root as its working directory.
pub struct SyncWorkflow<'a, R: ProcessRunner + ?Sized> {
    repo: &'a Path,
    runner: &'a R,
    remote_override: bool,
    stage: SyncStage,
}

impl<'a, R: ProcessRunner + ?Sized> SyncWorkflow<'a, R> {
    /// Creates an idle workflow for the repository at `repo`.
    ///
    /// With `remote_override` set the remote-existence check always passes.
    pub fn new(repo: &'a Path, runner: &'a R, remote_override: bool) -> Self {
        Self {
            repo,
            runner,
            remote_override,
            stage: SyncStage::Idle,
        }
    }

    /// Last stage reached. After a failure this is the stage before it.
    pub fn stage(&self) -> SyncStage {
        self.stage
    }

    /// Checks that `git remote -v` reports at least one remote.
    pub fn verify_remote(&self) -> Result<(), ZetError> {
        if self.remote_override {
            return Ok(());
        }
        let remotes = self.runner.run_capture(self.repo, GIT, &["remote", "-v"]);
        if remotes.trim().is_empty() {
            return Err(ZetError::NoRemote);
        }
        Ok(())
    }

    /// Runs every stage for `note`, stopping at the first failure.
    ///
    /// An empty cached title is re-read from the document before committing.
    pub fn run(&mut self, note: &mut Note) -> Result<(), ZetError> {
        self.verify_remote()?;
        self.advance(SyncStage::RemoteVerified);

        self.git(&["pull", "-q"])
            .map_err(|e| ZetError::PullFailed(Box::new(e)))?;
        self.advance(SyncStage::Pulled);

        let target = note
            .path()
            .strip_prefix(self.repo)
            .unwrap_or(note.path())
            .to_string_lossy()
            .into_owned();
        self.git(&["add", "-A", &target])
            .map_err(|e| ZetError::StageFailed(Box::new(e)))?;
        self.advance(SyncStage::Staged);

        if note.title().is_empty() {
            note.set_title(index::extract_title(note.path()));
        }
        let message = if note.title().is_empty() {
            note.id().to_string()
        } else {
            note.title().to_string()
        };
        self.git(&["commit", "-m", &message])
            .map_err(|e| ZetError::CommitFailed(Box::new(e)))?;
        self.advance(SyncStage::Committed);
        println!("Committed {message:?}");

        self.verify_remote()
            .and_then(|()| self.git(&["push", "--quiet"]))
            .map_err(|e| ZetError::PushFailed(Box::new(e)))?;
        self.advance(SyncStage::Pushed);

        Ok(())
    }

    fn git(&self, args: &[&str]) -> Result<(), ZetError> {
        self.runner.run_interactive(self.repo, GIT, args)
    }

    fn advance(&mut self, next: SyncStage) {
        debug!(from = %self.stage, to = %next, "sync stage");
        self.stage = next;
    }
}

/// Asks for confirmation, then synchronizes the note.
///
/// Anything but `y` leaves the edited note on disk, unversioned, and returns
/// [`SyncOutcome::Declined`] without running git.
pub fn confirm_and_sync<R, P>(
    workflow: &mut SyncWorkflow<'_, R>,
    prompter: &P,
    note: &mut Note,
) -> Result<SyncOutcome, ZetError>
where
    R: ProcessRunner + ?Sized,
    P: Prompter + ?Sized,
{
    if !is_affirmative(&prompter.prompt(CONFIRM_PROMPT)) {
        println!("{:?} not committed but modified", note.path().display().to_string());
        return Ok(SyncOutcome::Declined);
    }
    workflow.run(note)?;
    Ok(SyncOutcome::Pushed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NoteId;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::path::PathBuf;

    /// Records git invocations and fails the configured subcommands.
    #[derive(Default)]
    struct FakeGit {
        remotes: String,
        failing: HashSet<&'static str>,
        calls: RefCell<Vec<(PathBuf, Vec<String>)>>,
    }

    impl FakeGit {
        fn with_remote() -> Self {
            Self {
                remotes: "origin\tgit@example.com:me/zet.git (fetch)\n".to_string(),
                ..Self::default()
            }
        }

        fn failing(mut self, subcommand: &'static str) -> Self {
            self.failing.insert(subcommand);
            self
        }

        fn subcommands(&self) -> Vec<String> {
            self.calls
                .borrow()
                .iter()
                .map(|(_, args)| args.join(" "))
                .collect()
        }
    }

    impl ProcessRunner for FakeGit {
        fn run_interactive(
            &self,
            cwd: &Path,
            program: &str,
            args: &[&str],
        ) -> Result<(), ZetError> {
            assert_eq!(program, "git");
            self.calls.borrow_mut().push((
                cwd.to_path_buf(),
                args.iter().map(|a| a.to_string()).collect(),
            ));
            if self.failing.contains(args[0]) {
                return Err(ZetError::CommandFailed {
                    program: program.to_string(),
                    code: Some(1),
                });
            }
            Ok(())
        }

        fn run_capture(&self, _cwd: &Path, _program: &str, _args: &[&str]) -> String {
            self.remotes.clone()
        }
    }

    struct Reply(&'static str);

    impl Prompter for Reply {
        fn prompt(&self, _message: &str) -> String {
            self.0.to_string()
        }
    }

    fn note(title: &str) -> Note {
        Note::new(
            NoteId::parse("20230101000000").unwrap(),
            title,
            "/repo/20230101000000",
        )
    }

    #[test]
    fn successful_run_walks_every_stage_in_order() {
        let git = FakeGit::with_remote();
        let repo = Path::new("/repo");
        let mut workflow = SyncWorkflow::new(repo, &git, false);
        let mut n = note("Hello World");

        workflow.run(&mut n).unwrap();

        assert_eq!(workflow.stage(), SyncStage::Pushed);
        assert_eq!(
            git.subcommands(),
            vec![
                "pull -q",
                "add -A 20230101000000",
                "commit -m Hello World",
                "push --quiet",
            ]
        );
        assert!(git.calls.borrow().iter().all(|(cwd, _)| cwd == repo));
    }

    #[test]
    fn missing_remote_aborts_before_any_git_command() {
        let git = FakeGit::default();
        let mut workflow = SyncWorkflow::new(Path::new("/repo"), &git, false);

        let err = workflow.run(&mut note("Hello")).unwrap_err();

        assert!(matches!(err, ZetError::NoRemote));
        assert_eq!(workflow.stage(), SyncStage::Idle);
        assert!(git.subcommands().is_empty());
    }

    #[test]
    fn remote_override_skips_the_remote_check() {
        let git = FakeGit::default();
        let mut workflow = SyncWorkflow::new(Path::new("/repo"), &git, true);

        workflow.run(&mut note("Hello")).unwrap();
        assert_eq!(workflow.stage(), SyncStage::Pushed);
    }

    #[test]
    fn pull_failure_stops_before_staging() {
        let git = FakeGit::with_remote().failing("pull");
        let mut workflow = SyncWorkflow::new(Path::new("/repo"), &git, false);

        let err = workflow.run(&mut note("Hello")).unwrap_err();

        assert!(matches!(err, ZetError::PullFailed(_)));
        assert_eq!(workflow.stage(), SyncStage::RemoteVerified);
        assert_eq!(git.subcommands(), vec!["pull -q"]);
    }

    #[test]
    fn stage_and_commit_failures_are_labelled() {
        let git = FakeGit::with_remote().failing("add");
        let mut workflow = SyncWorkflow::new(Path::new("/repo"), &git, false);
        let err = workflow.run(&mut note("Hello")).unwrap_err();
        assert!(matches!(err, ZetError::StageFailed(_)));
        assert_eq!(workflow.stage(), SyncStage::Pulled);

        let git = FakeGit::with_remote().failing("commit");
        let mut workflow = SyncWorkflow::new(Path::new("/repo"), &git, false);
        let err = workflow.run(&mut note("Hello")).unwrap_err();
        assert!(matches!(err, ZetError::CommitFailed(_)));
        assert_eq!(workflow.stage(), SyncStage::Staged);
    }

    #[test]
    fn push_failure_keeps_the_commit() {
        let git = FakeGit::with_remote().failing("push");
        let mut workflow = SyncWorkflow::new(Path::new("/repo"), &git, false);

        let err = workflow.run(&mut note("Hello")).unwrap_err();

        assert!(matches!(err, ZetError::PushFailed(_)));
        assert_eq!(workflow.stage(), SyncStage::Committed);
        // no reset or revert after the failed push
        assert_eq!(git.subcommands().last().unwrap(), "push --quiet");
        assert_eq!(git.subcommands().len(), 4);
    }

    #[test]
    fn empty_title_falls_back_to_id_when_document_is_missing() {
        let git = FakeGit::with_remote();
        let mut workflow = SyncWorkflow::new(Path::new("/repo"), &git, false);

        workflow.run(&mut note("")).unwrap();
        assert!(git.subcommands().contains(&"commit -m 20230101000000".to_string()));
    }

    #[test]
    fn empty_title_is_reread_from_the_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("20230101000000");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("README.md"), "# Real Title\n\nbody\n").unwrap();
        let git = FakeGit::with_remote();
        let mut workflow = SyncWorkflow::new(dir.path(), &git, false);
        let mut n = Note::new(NoteId::parse("20230101000000").unwrap(), "", &path);

        workflow.run(&mut n).unwrap();

        assert_eq!(n.title(), "Real Title");
        assert_eq!(
            git.subcommands(),
            vec![
                "pull -q",
                "add -A 20230101000000",
                "commit -m Real Title",
                "push --quiet",
            ]
        );
    }

    #[test]
    fn declined_confirmation_runs_nothing() {
        for reply in ["n", "", "yes", "N"] {
            let git = FakeGit::with_remote();
            let mut workflow = SyncWorkflow::new(Path::new("/repo"), &git, false);

            let outcome = confirm_and_sync(&mut workflow, &Reply(reply), &mut note("Hi")).unwrap();

            assert_eq!(outcome, SyncOutcome::Declined);
            assert_eq!(workflow.stage(), SyncStage::Idle);
            assert!(git.calls.borrow().is_empty());
        }
    }

    #[test]
    fn confirmation_accepts_either_case() {
        for reply in ["y", "Y"] {
            let git = FakeGit::with_remote();
            let mut workflow = SyncWorkflow::new(Path::new("/repo"), &git, false);

            let outcome = confirm_and_sync(&mut workflow, &Reply(reply), &mut note("Hi")).unwrap();
            assert_eq!(outcome, SyncOutcome::Pushed);
        }
    }
}
