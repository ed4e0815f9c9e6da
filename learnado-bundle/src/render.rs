//! Static-site rendering.

use crate::config::RendererConfig;
use crate::error::{BundleError, BundleResult};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

/// Turns a staged site into a rendered output tree.
///
/// The staging directory holds the site template with `content/` filled in.
/// Implementations return the directory containing the rendered output,
/// which must lie inside `staging` so it is cleaned up with it.
pub trait ContentRenderer: Send + Sync {
    fn render(&self, staging: &Path) -> BundleResult<PathBuf>;
}

/// Runs an external renderer (Hugo by default) inside the staging directory.
///
/// The child is killed if it outlives the configured timeout.
#[derive(Debug, Clone)]
pub struct HugoRenderer {
    config: RendererConfig,
}

impl HugoRenderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    async fn run(&self, staging: &Path) -> BundleResult<()> {
        let program = &self.config.program;
        let timeout = self.config.timeout();

        let mut cmd = Command::new(program);
        cmd.args(&self.config.args)
            .current_dir(staging)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        debug!("Running renderer {program} in {}", staging.display());
        let output = match tokio::time::timeout(timeout, cmd.output()).await {
            Ok(result) => result
                .map_err(|e| BundleError::Packaging(format!("failed to run {program}: {e}")))?,
            Err(_) => {
                warn!("Renderer {program} exceeded {timeout:?}, killed");
                return Err(BundleError::RenderTimeout(timeout));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BundleError::Packaging(format!(
                "{program} failed (exit code {}): {}",
                output.status.code().unwrap_or(-1),
                stderr.trim()
            )));
        }
        Ok(())
    }

    /// Drives [`Self::run`] to completion from synchronous code.
    ///
    /// A runtime cannot be started on a thread that is already inside one,
    /// so under an async host the renderer runs on a scoped thread that owns
    /// its own runtime.
    fn run_blocking(&self, staging: &Path) -> BundleResult<()> {
        let run = || -> BundleResult<()> {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(self.run(staging))
        };

        if tokio::runtime::Handle::try_current().is_err() {
            return run();
        }
        debug!("Inside a tokio runtime, rendering on a dedicated thread");
        std::thread::scope(|scope| match scope.spawn(run).join() {
            Ok(result) => result,
            Err(_) => Err(BundleError::Packaging(format!(
                "{} renderer thread panicked",
                self.config.program
            ))),
        })
    }
}

impl Default for HugoRenderer {
    fn default() -> Self {
        Self::new(RendererConfig::default())
    }
}

impl ContentRenderer for HugoRenderer {
    fn render(&self, staging: &Path) -> BundleResult<PathBuf> {
        self.run_blocking(staging)?;

        let output = staging.join(&self.config.output_subdir);
        if !output.is_dir() {
            return Err(BundleError::Packaging(format!(
                "{} produced no output at {}",
                self.config.program,
                output.display()
            )));
        }
        Ok(output)
    }
}
