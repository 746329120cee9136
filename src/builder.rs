use std::{
    path::{Path, PathBuf},
    time::Instant,
};
use log::{info, debug, warn};
use crate::{
    command::{self, CommandLine},
    compiler::Compiler,
    config::Config,
    discovery::{self, MatchPolicy},
    executor::{Executor, Status},
    error::{BuilderError, BuilderResult},
};

const OBJECT_SUFFIX: &str = ".o";

/// What to do when the compiler or linker exits unsuccessfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Log the failure and carry on through link, cleanup and run.
    #[default]
    Proceed,
    /// Stop with `BuilderError::Toolchain` and leave objects on disk.
    Halt,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    pub match_policy: MatchPolicy,
    pub on_failure: FailurePolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    ConfigLoaded,
    Compiled,
    Linked,
    CleanedUp,
    Ran,
    Skipped,
}

/// Outcome of one build. A `None` status means the process could not be spawned.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub objects: Vec<PathBuf>,
    pub compile: Option<Status>,
    pub link: Option<Status>,
    pub run: Option<Status>,
    pub phase: Phase,
}

impl BuildReport {
    /// Whether both compile and link ran and exited successfully.
    pub fn toolchain_succeeded(&self) -> bool {
        [self.compile, self.link]
            .iter()
            .all(|status| status.map_or(false, |s| s.success()))
    }
}

pub struct Builder {
    config: Config,
    compiler: Compiler,
    work_dir: PathBuf,
    options: BuildOptions,
}

impl Builder {
    pub fn new(config: Config, work_dir: &Path, options: BuildOptions) -> BuilderResult<Self> {
        let language = config.language()?;
        for raw in config.flags.iter().chain(&config.linkers) {
            command::split_words(raw)?;
        }
        Ok(Builder {
            config,
            compiler: Compiler::new(language),
            work_dir: work_dir.to_path_buf(),
            options,
        })
    }

    pub fn load(config_path: &Path, work_dir: &Path, options: BuildOptions) -> BuilderResult<Self> {
        let config = Config::load(config_path)?;
        Self::new(config, work_dir, options)
    }

    pub fn build(&self, executor: &mut dyn Executor) -> BuilderResult<BuildReport> {
        let start = Instant::now();
        info!("Building {} ({})", self.config.build_name, self.compiler.language());

        let mut report = BuildReport {
            objects: Vec::new(),
            compile: None,
            link: None,
            run: None,
            phase: Phase::ConfigLoaded,
        };

        let (objects, status) = self.compile(executor)?;
        report.objects = objects;
        report.compile = status;
        report.phase = Phase::Compiled;

        report.link = self.link(executor, &report.objects)?;
        report.phase = Phase::Linked;

        self.cleanup(&report.objects)?;
        report.phase = Phase::CleanedUp;

        report.run = self.run_exe(executor);
        report.phase = match (self.config.run, report.run) {
            (false, _) => Phase::Skipped,
            (true, Some(_)) => Phase::Ran,
            // the binary could not be started
            (true, None) => Phase::CleanedUp,
        };

        info!(
            "Finished {} in {:.2}s",
            self.config.build_name,
            start.elapsed().as_secs_f32()
        );
        Ok(report)
    }

    fn find_sources(&self) -> BuilderResult<Vec<PathBuf>> {
        let suffix = self.compiler.language().source_suffix();
        let mut sources = Vec::new();
        for dir in &self.config.src {
            let found = discovery::list_dir(
                &self.work_dir,
                Path::new(dir),
                suffix,
                self.options.match_policy,
            )?;
            debug!("{}: {:?}", dir, found);
            sources.extend(found);
        }
        Ok(sources)
    }

    fn compile(&self, executor: &mut dyn Executor) -> BuilderResult<(Vec<PathBuf>, Option<Status>)> {
        let sources = self.find_sources()?;
        info!("Found {} source files", sources.len());

        let mut objects: Vec<PathBuf> = Vec::with_capacity(sources.len());
        for source in &sources {
            match self.compiler.object_path(source) {
                Some(object) if !objects.contains(&object) => objects.push(object),
                Some(_) => {}
                None => debug!("{} is not compiled, no object expected", source.display()),
            }
        }

        let cmd = self.compiler.compile_command(&self.config, &sources);
        let status = self.invoke(executor, &cmd, "Compilation")?;
        Ok((objects, status))
    }

    fn link(&self, executor: &mut dyn Executor, objects: &[PathBuf]) -> BuilderResult<Option<Status>> {
        info!("Linking {}", self.config.build_name);
        let cmd = self.compiler.link_command(&self.config, objects);
        self.invoke(executor, &cmd, "Linking")
    }

    /// Prints and runs a toolchain command, applying the failure policy to its status.
    fn invoke(
        &self,
        executor: &mut dyn Executor,
        cmd: &CommandLine,
        phase: &'static str,
    ) -> BuilderResult<Option<Status>> {
        println!("{}", cmd);

        let halt = self.options.on_failure == FailurePolicy::Halt;
        match executor.execute(cmd, &self.work_dir) {
            Ok(status) if status.success() => Ok(Some(status)),
            Ok(status) if halt => Err(BuilderError::Toolchain {
                phase,
                status: status.to_string(),
            }),
            Ok(status) => {
                warn!("{} failed with {}, continuing", phase, status);
                Ok(Some(status))
            }
            Err(e) if halt => Err(e),
            Err(e) => {
                warn!("{}, continuing", e);
                Ok(None)
            }
        }
    }

    fn cleanup(&self, objects: &[PathBuf]) -> BuilderResult<()> {
        for object in objects {
            let path = self.work_dir.join(object);
            match std::fs::remove_file(&path) {
                Ok(()) => debug!("Removed {}", path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    fn run_exe(&self, executor: &mut dyn Executor) -> Option<Status> {
        if !self.config.run {
            return None;
        }

        let exe = self.work_dir.join(&self.config.build_name);
        let cmd = CommandLine::new(exe.to_string_lossy());
        info!("Running {}", exe.display());

        match executor.execute(&cmd, &self.work_dir) {
            Ok(status) => {
                info!("{} exited with {}", self.config.build_name, status);
                Some(status)
            }
            Err(e) => {
                warn!("{}", e);
                None
            }
        }
    }

}

/// Deletes every `*.o` file left in `work_dir`. Needs no config.
pub fn clean_objects(work_dir: &Path) -> BuilderResult<usize> {
    let objects = discovery::list_dir(
        work_dir,
        Path::new("."),
        OBJECT_SUFFIX,
        MatchPolicy::ExactExtension,
    )?;

    let mut removed = 0;
    for object in &objects {
        let path = work_dir.join(object);
        if path.is_file() {
            std::fs::remove_file(&path)?;
            removed += 1;
        }
    }

    info!("Removed {} object files", removed);
    Ok(removed)
}
