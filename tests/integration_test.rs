use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use git2::{Repository, Signature};
use precommit_message_preservation::cli::restore::RestoreCommand;
use precommit_message_preservation::git::UNKNOWN_BRANCH;
use precommit_message_preservation::{
    GitRepository, MessageCache, MessagePreservation, RepositoryIdentity, VERBOSE_MARKER,
};
use tempfile::TempDir;

/// Test setup that creates a temporary git repository and a scratch cache
struct TestRepo {
    _temp_dir: TempDir,
    repo_path: PathBuf,
    repo: Repository,
    cache: MessageCache,
}

impl TestRepo {
    fn new(name: &str, branch: &str) -> Result<Self> {
        let temp_dir = tempfile::tempdir()?;
        let repo_path = temp_dir.path().join(name);
        fs::create_dir_all(&repo_path)?;

        let repo = Repository::init(&repo_path)?;
        repo.set_head(&format!("refs/heads/{branch}"))?;

        let mut config = repo.config()?;
        config.set_str("user.name", "Test User")?;
        config.set_str("user.email", "test@example.com")?;

        let cache = MessageCache::new(temp_dir.path().join("cache"));

        Ok(TestRepo {
            _temp_dir: temp_dir,
            repo_path,
            repo,
            cache,
        })
    }

    fn add_commit(&self, message: &str) -> Result<git2::Oid> {
        fs::write(self.repo_path.join("test.txt"), message)?;

        let mut index = self.repo.index()?;
        index.add_path(Path::new("test.txt"))?;
        index.write()?;

        let signature = Signature::now("Test User", "test@example.com")?;
        let tree = self.repo.find_tree(index.write_tree()?)?;
        let parent = match self.repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(_) => None,
        };
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        Ok(self
            .repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?)
    }

    fn git(&self) -> GitRepository {
        GitRepository::open_at(&self.repo_path)
    }

    fn identity(&self) -> RepositoryIdentity {
        RepositoryIdentity::detect(&self.git())
    }
}

fn reject_message() -> Result<()> {
    bail!("subject must be in the imperative mood")
}

#[test]
fn detects_root_and_branch_of_real_repository() -> Result<()> {
    let test_repo = TestRepo::new("project", "develop")?;

    let identity = test_repo.identity();

    assert_eq!(
        identity.root.canonicalize()?,
        test_repo.repo_path.canonicalize()?
    );
    assert_eq!(identity.branch, "develop");
    Ok(())
}

#[test]
fn detects_root_from_subdirectory() -> Result<()> {
    let test_repo = TestRepo::new("project", "main")?;
    let nested = test_repo.repo_path.join("src").join("module");
    fs::create_dir_all(&nested)?;

    let identity = RepositoryIdentity::detect(&GitRepository::open_at(&nested));

    assert_eq!(
        identity.root.canonicalize()?,
        test_repo.repo_path.canonicalize()?
    );
    Ok(())
}

#[test]
fn detached_head_uses_unknown_branch() -> Result<()> {
    let test_repo = TestRepo::new("project", "main")?;
    let oid = test_repo.add_commit("initial")?;
    test_repo.repo.set_head_detached(oid)?;

    assert_eq!(test_repo.identity().branch, UNKNOWN_BRANCH);
    Ok(())
}

#[test]
fn failed_validation_preserves_message_for_next_commit() -> Result<()> {
    let test_repo = TestRepo::new("project", "main")?;
    let message = format!(
        "Added the cache\n# Please enter the commit message\n\nLonger body.\n{VERBOSE_MARKER}\ndiff --git a/test.txt b/test.txt\n"
    );

    let preservation =
        MessagePreservation::new(&*message, &test_repo.git(), test_repo.cache.clone());
    let err = preservation.run(reject_message).unwrap_err();
    assert!(err.to_string().contains("imperative mood"));

    let saved = test_repo.cache.read(&test_repo.identity());
    assert_eq!(saved, "Added the cache\n\nLonger body.\n");

    // The next `git commit` runs prepare-commit-msg with the template
    let message_file = test_repo.repo_path.join(".git").join("COMMIT_EDITMSG");
    fs::write(&message_file, "\n# Please enter the commit message\n")?;
    let restore = RestoreCommand {
        message_file: message_file.clone(),
        source: None,
        sha: None,
    };
    assert!(restore.execute_with(&test_repo.cache, &test_repo.git())?);
    assert_eq!(
        fs::read_to_string(&message_file)?,
        "Added the cache\n\nLonger body.\n\n# Please enter the commit message\n"
    );
    Ok(())
}

#[test]
fn passing_validation_clears_previous_failure() -> Result<()> {
    let test_repo = TestRepo::new("project", "main")?;
    let cache_file = test_repo.cache.save("Old attempt", &test_repo.identity())?;
    assert!(cache_file.exists());

    let preservation =
        MessagePreservation::new("Add cache", &test_repo.git(), test_repo.cache.clone());
    preservation.run(|| Ok(()))?;

    assert!(!cache_file.exists());
    Ok(())
}

#[test]
fn branches_do_not_share_cached_messages() -> Result<()> {
    let test_repo = TestRepo::new("project", "main")?;
    let main = test_repo.identity();

    test_repo.add_commit("initial")?;
    let head = test_repo.repo.head()?.peel_to_commit()?;
    test_repo.repo.branch("topic", &head, false)?;
    test_repo.repo.set_head("refs/heads/topic")?;
    let topic = test_repo.identity();

    test_repo.cache.save("Main attempt", &main)?;
    test_repo.cache.save("Topic attempt", &topic)?;

    assert_eq!(topic.branch, "topic");
    assert_eq!(test_repo.cache.read(&main), "Main attempt");
    assert_eq!(test_repo.cache.read(&topic), "Topic attempt");
    Ok(())
}

#[test]
fn same_named_repositories_do_not_collide() -> Result<()> {
    let first = TestRepo::new("project", "main")?;
    let second = TestRepo::new("project", "main")?;
    // Share one cache between both checkouts
    let cache = first.cache.clone();

    cache.save("First checkout", &first.identity())?;
    cache.save("Second checkout", &second.identity())?;

    assert_ne!(
        cache.path_for(&first.identity()),
        cache.path_for(&second.identity())
    );
    assert_eq!(cache.read(&first.identity()), "First checkout");
    assert_eq!(cache.read(&second.identity()), "Second checkout");
    Ok(())
}
