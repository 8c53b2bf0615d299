//! Bootstrap shared by commands that work on one validation domain.

use crate::cli::Output;
use crate::config::{AppConfig, DomainConfig, DomainConfigCache};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Temporary folder private to one run, removed when dropped.
#[derive(Debug)]
pub struct WorkFolder {
    path: PathBuf,
}

impl WorkFolder {
    /// Create `<parent>/<uuid>`.
    pub fn create(parent: &Path) -> Result<Self> {
        let path = parent.join(uuid::Uuid::new_v4().to_string());
        std::fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create work folder {}", path.display()))?;
        tracing::debug!("Created work folder {}", path.display());
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for WorkFolder {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_dir_all(&self.path) {
            tracing::warn!("Unable to delete work folder {}: {e}", self.path.display());
        }
    }
}

/// What a runner gets to work with.
pub struct RunContext<'a> {
    pub app: &'a AppConfig,
    pub domain: &'a DomainConfig,
    pub work_folder: &'a WorkFolder,
    pub output: &'a Output,
}

/// A command that needs a resolved domain.
pub trait ValidationRunner {
    fn run(&self, ctx: &RunContext<'_>) -> Result<()>;
}

/// Resolve the domain, create the work folder and call `runner`.
///
/// Domain selection failures are logged and shown before being returned.
/// The work folder is removed whatever the outcome.
pub fn bootstrap<R: ValidationRunner>(
    runner: &R,
    app: &AppConfig,
    requested_domain: Option<&str>,
    output: &Output,
) -> Result<()> {
    let domains = DomainConfigCache::load(app)?;
    let domain = match domains.select_domain(requested_domain) {
        Ok(domain) => domain,
        Err(e) => {
            tracing::error!("{e}");
            output.error(&e.to_string());
            return Err(e.into());
        }
    };
    tracing::info!("Running for domain [{}]", domain.domain_name);

    let work_folder = WorkFolder::create(&app.tmp_folder)?;
    let ctx = RunContext {
        app,
        domain,
        work_folder: &work_folder,
        output,
    };
    runner.run(&ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Recorder {
        fail: bool,
        seen: RefCell<Option<(String, PathBuf)>>,
    }

    impl ValidationRunner for Recorder {
        fn run(&self, ctx: &RunContext<'_>) -> Result<()> {
            assert!(ctx.work_folder.path().is_dir());
            *self.seen.borrow_mut() = Some((
                ctx.domain.domain_name.clone(),
                ctx.work_folder.path().to_path_buf(),
            ));
            if self.fail {
                anyhow::bail!("runner failed");
            }
            Ok(())
        }
    }

    fn app_with_domains(root: &Path, names: &[&str]) -> AppConfig {
        for name in names {
            let folder = root.join("domains").join(name);
            std::fs::create_dir_all(&folder).unwrap();
            std::fs::write(folder.join("config.toml"), "validation_types = [\"basic\"]\n").unwrap();
        }
        AppConfig {
            resource_root: root.join("domains"),
            tmp_folder: root.join("tmp"),
            domains: Vec::new(),
            ..AppConfig::load().unwrap()
        }
    }

    fn recorder(fail: bool) -> Recorder {
        Recorder {
            fail,
            seen: RefCell::new(None),
        }
    }

    #[test]
    fn test_work_folder_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let folder = WorkFolder::create(dir.path()).unwrap();
        let path = folder.path().to_path_buf();
        assert!(path.is_dir());
        drop(folder);
        assert!(!path.exists());
    }

    #[test]
    fn test_single_domain_is_selected() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_with_domains(dir.path(), &["invoice"]);
        let runner = recorder(false);
        bootstrap(&runner, &app, None, &Output::new(true)).unwrap();
        let (domain, work) = runner.seen.borrow().clone().unwrap();
        assert_eq!(domain, "invoice");
        assert!(!work.exists());
    }

    #[test]
    fn test_work_folder_removed_when_runner_fails() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_with_domains(dir.path(), &["invoice"]);
        let runner = recorder(true);
        assert!(bootstrap(&runner, &app, None, &Output::new(true)).is_err());
        let (_, work) = runner.seen.borrow().clone().unwrap();
        assert!(!work.exists());
    }

    #[test]
    fn test_selection_required() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_with_domains(dir.path(), &["invoice", "order"]);
        let runner = recorder(false);
        let err = bootstrap(&runner, &app, None, &Output::new(true)).unwrap_err();
        assert!(err.to_string().contains("[invoice|order]"));
        assert!(runner.seen.borrow().is_none());

        bootstrap(&runner, &app, Some("order"), &Output::new(true)).unwrap();
        assert_eq!(runner.seen.borrow().as_ref().unwrap().0, "order");
    }

    #[test]
    fn test_no_domains() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_with_domains(dir.path(), &[]);
        let err = bootstrap(&recorder(false), &app, None, &Output::new(true)).unwrap_err();
        assert!(err.to_string().contains("No validation domains"));
    }
}
