mod config;
mod builder;
mod command;
mod compiler;
mod discovery;
mod executor;
mod toolchains;
mod error;

use std::{
    path::{Path, PathBuf},
    time::Instant,
};
use structopt::StructOpt;
use log::{info, warn};
use crate::{
    builder::{BuildOptions, Builder, FailurePolicy},
    config::Config,
    discovery::MatchPolicy,
    executor::SystemExecutor,
    error::{BuilderError, BuilderResult},
    toolchains::Language,
};

#[derive(Debug, StructOpt)]
#[structopt(name = "builder", about = "Compile, link and run a C/C++ program described by Config.json")]
struct Opt {
    #[structopt(long, parse(from_os_str), default_value = "Config.json", help = "Path to the JSON build config")]
    config: PathBuf,

    #[structopt(long, help = "Stop on compiler or linker failure and keep object files")]
    strict: bool,

    #[structopt(long = "exact-ext", help = "Match source files by exact extension instead of substring")]
    exact_ext: bool,

    #[structopt(subcommand)]
    cmd: Option<Cmd>,
}

#[derive(Debug, StructOpt)]
enum Cmd {
    #[structopt(name = "build", about = "Compile, link, clean up and optionally run (default)")]
    Build,

    #[structopt(name = "init", about = "Write a starter Config.json and source file")]
    Init {
        #[structopt(long, help = "Executable name")]
        name: Option<String>,

        #[structopt(long = "type", default_value = "cpp", help = "Project type: c or cpp")]
        kind: Language,
    },

    #[structopt(name = "clean", about = "Remove object files from the working directory")]
    Clean,
}

impl Opt {
    fn options(&self) -> BuildOptions {
        BuildOptions {
            match_policy: if self.exact_ext {
                MatchPolicy::ExactExtension
            } else {
                MatchPolicy::SuffixContains
            },
            on_failure: if self.strict {
                FailurePolicy::Halt
            } else {
                FailurePolicy::Proceed
            },
        }
    }
}

fn init_project(dir: &Path, config_path: &Path, name: Option<&str>, language: Language) -> BuilderResult<()> {
    if config_path.exists() {
        return Err(BuilderError::Config(format!(
            "{} already exists",
            config_path.display()
        )));
    }

    let name = name.unwrap_or("app");
    let config = Config::starter(name, language);
    std::fs::write(config_path, config.to_json()?)?;

    std::fs::create_dir_all(dir.join("src"))?;
    std::fs::create_dir_all(dir.join("include"))?;

    let main_file = dir.join("src").join(format!("main{}", language.source_suffix()));
    if !main_file.exists() {
        let example_src = match language {
            Language::Cpp => "#include <iostream>\n\nint main()\n{\n    std::cout << \"Hello from builder!\" << std::endl;\n    return 0;\n}\n",
            Language::C => "#include <stdio.h>\n\nint main(void)\n{\n    printf(\"Hello from builder!\\n\");\n    return 0;\n}\n",
        };
        std::fs::write(&main_file, example_src)?;
    }

    println!("Initialized {} project {} in {}", language, name, dir.display());
    Ok(())
}

fn run(opt: Opt, work_dir: &Path) -> BuilderResult<()> {
    match opt.cmd {
        Some(Cmd::Init { ref name, kind }) => init_project(work_dir, &opt.config, name.as_deref(), kind),
        Some(Cmd::Clean) => {
            builder::clean_objects(work_dir)?;
            Ok(())
        }
        Some(Cmd::Build) | None => {
            let start = Instant::now();
            let builder = Builder::load(&opt.config, work_dir, opt.options())?;
            let report = builder.build(&mut SystemExecutor)?;
            if report.toolchain_succeeded() {
                info!("Build completed in {:.2}s", start.elapsed().as_secs_f32());
            } else {
                warn!("Build finished with toolchain errors in {:.2}s", start.elapsed().as_secs_f32());
            }
            Ok(())
        }
    }
}

fn main() {
    env_logger::init();

    let opt = Opt::from_args();
    if let Err(e) = run(opt, Path::new(".")) {
        eprintln!("Build failed: {}", e);
        std::process::exit(1);
    }
}
