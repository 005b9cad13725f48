use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::object::{list_commits, read_commit};
use crate::refs::current_branch;
use crate::repo::Repo;
use crate::types::Commit;

/// commit with its hash for log output
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub hash: Hash,
    pub commit: Commit,
}

/// history of the current branch, following first parents from the tip
pub fn log(repo: &Repo) -> Result<Vec<LogEntry>> {
    let mut entries = Vec::new();
    let mut next = Some(current_branch(repo)?.tip());

    while let Some(hash) = next {
        let commit = read_commit(repo, &hash)?;
        next = commit.parent;
        entries.push(LogEntry { hash, commit });
    }

    Ok(entries)
}

/// every commit ever made, in store order
pub fn global_log(repo: &Repo) -> Result<Vec<LogEntry>> {
    list_commits(repo)?
        .into_iter()
        .map(|hash| {
            let commit = read_commit(repo, &hash)?;
            Ok(LogEntry { hash, commit })
        })
        .collect()
}

/// ids of all commits with exactly this message
pub fn find(repo: &Repo, message: &str) -> Result<Vec<Hash>> {
    let mut found = Vec::new();
    for hash in list_commits(repo)? {
        if read_commit(repo, &hash)?.message == message {
            found.push(hash);
        }
    }

    if found.is_empty() {
        return Err(Error::NoCommitWithMessage(message.to_string()));
    }
    Ok(found)
}

/// format a log entry for display
impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "===")?;
        writeln!(f, "commit {}", self.hash)?;

        if let (Some(parent), Some(second)) = (self.commit.parent, self.commit.second_parent) {
            writeln!(f, "Merge: {} {}", parent.short(), second.short())?;
        }

        writeln!(f, "Date: {}", self.commit.display_date())?;
        writeln!(f, "{}", self.commit.message)?;
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{add, commit, create_branch, merge};
    use std::fs;
    use tempfile::tempdir;

    fn test_repo() -> (tempfile::TempDir, Repo) {
        let dir = tempdir().unwrap();
        let repo = Repo::init(dir.path()).unwrap();
        (dir, repo)
    }

    fn commit_file(repo: &Repo, path: &str, content: &str, message: &str) -> Hash {
        fs::write(repo.working_path(path), content).unwrap();
        add(repo, path).unwrap();
        commit(repo, message).unwrap()
    }

    #[test]
    fn test_log_initial_repo() {
        let (_dir, repo) = test_repo();

        let entries = log(&repo).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].commit.message, "initial commit");
        assert_eq!(entries[0].hash, Commit::root().id);
    }

    #[test]
    fn test_log_multiple_commits() {
        let (_dir, repo) = test_repo();

        let c1 = commit_file(&repo, "file.txt", "v1", "commit 1");
        let c2 = commit_file(&repo, "file.txt", "v2", "commit 2");

        let entries = log(&repo).unwrap();
        let hashes: Vec<_> = entries.iter().map(|e| e.hash).collect();

        assert_eq!(hashes, vec![c2, c1, Commit::root().id]);
    }

    #[test]
    fn test_log_only_current_branch() {
        let (_dir, repo) = test_repo();

        commit_file(&repo, "file.txt", "v1", "on master");
        create_branch(&repo, "other").unwrap();
        commit_file(&repo, "file.txt", "v2", "master only");

        crate::ops::checkout_branch(&repo, "other").unwrap();
        let messages: Vec<_> = log(&repo)
            .unwrap()
            .into_iter()
            .map(|e| e.commit.message)
            .collect();

        assert_eq!(messages, vec!["on master", "initial commit"]);
    }

    #[test]
    fn test_global_log_includes_all_branches() {
        let (_dir, repo) = test_repo();

        commit_file(&repo, "file.txt", "v1", "on master");
        create_branch(&repo, "other").unwrap();
        crate::ops::checkout_branch(&repo, "other").unwrap();
        commit_file(&repo, "file.txt", "v2", "on other");
        crate::ops::checkout_branch(&repo, "master").unwrap();

        let entries = global_log(&repo).unwrap();
        assert_eq!(entries.len(), 3);
        assert!(entries.iter().any(|e| e.commit.message == "on other"));
    }

    #[test]
    fn test_find() {
        let (_dir, repo) = test_repo();

        let c1 = commit_file(&repo, "a.txt", "a", "same message");
        let c2 = commit_file(&repo, "b.txt", "b", "same message");
        commit_file(&repo, "c.txt", "c", "different");

        let mut found = find(&repo, "same message").unwrap();
        found.sort();
        let mut expected = vec![c1, c2];
        expected.sort();
        assert_eq!(found, expected);

        let result = find(&repo, "no such message");
        assert!(matches!(result, Err(Error::NoCommitWithMessage(_))));
    }

    #[test]
    fn test_log_entry_display() {
        let (_dir, repo) = test_repo();

        let hash = commit_file(&repo, "file.txt", "content", "test message");
        let entries = log(&repo).unwrap();
        let display = format!("{}", entries[0]);

        assert!(display.starts_with(&format!("===\ncommit {}\nDate: ", hash)));
        assert!(display.ends_with("test message\n\n"));
        assert!(!display.contains("Merge:"));
    }

    #[test]
    fn test_merge_entry_display() {
        let (_dir, repo) = test_repo();

        commit_file(&repo, "base.txt", "base", "base");
        create_branch(&repo, "other").unwrap();
        let master_tip = commit_file(&repo, "m.txt", "m", "master side");
        crate::ops::checkout_branch(&repo, "other").unwrap();
        let other_tip = commit_file(&repo, "o.txt", "o", "other side");
        crate::ops::checkout_branch(&repo, "master").unwrap();
        merge(&repo, "other").unwrap();

        let display = format!("{}", log(&repo).unwrap()[0]);
        assert!(display.contains(&format!(
            "Merge: {} {}\n",
            master_tip.short(),
            other_tip.short()
        )));
        assert!(display.contains("Merged other into master."));
    }
}
