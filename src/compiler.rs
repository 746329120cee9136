use crate::{
    command::CommandLine,
    config::Config,
    toolchains::Language,
};
use std::path::{Path, PathBuf};

/// Extensions gcc/g++ compile under `-c`. Anything else is treated as linker
/// input and produces no object.
const COMPILED_EXTENSIONS: &[&str] = &[
    "c", "i", "ii", "cc", "cp", "cxx", "cpp", "CPP", "c++", "C", "s", "S", "sx",
];

/// Assembles the compile and link invocations for one language.
pub struct Compiler {
    language: Language,
}

impl Compiler {
    pub fn new(language: Language) -> Self {
        Compiler { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// `<compiler> <flags> "-I<dir>"... -c "<source>"...`
    pub fn compile_command(&self, config: &Config, sources: &[PathBuf]) -> CommandLine {
        let mut cmd = CommandLine::new(self.language.compiler());

        for flag in &config.flags {
            cmd.raw(flag.as_str());
        }

        for dir in &config.include_dir {
            cmd.quoted(format!("-I{}", dir));
        }

        cmd.raw("-c");

        for source in sources {
            cmd.quoted(source.to_string_lossy());
        }

        cmd
    }

    /// `<compiler> -o <name> <objects>... "-L<dir>"... <linkers>`
    pub fn link_command(&self, config: &Config, objects: &[PathBuf]) -> CommandLine {
        let mut cmd = CommandLine::new(self.language.compiler());
        cmd.raw("-o").plain(config.build_name.as_str());

        // Linking happens next to the objects, so only their names are passed.
        for object in objects {
            let name = object.file_name().unwrap_or(object.as_os_str());
            cmd.plain(name.to_string_lossy());
        }

        for dir in &config.lib_dir {
            cmd.quoted(format!("-L{}", dir));
        }

        for linker in &config.linkers {
            cmd.raw(linker.as_str());
        }

        cmd
    }

    /// Where `-c` leaves the object for `source`: its stem plus `.o`, in the
    /// working directory. `None` when the front end would not compile it.
    pub fn object_path(&self, source: &Path) -> Option<PathBuf> {
        let ext = source.extension()?.to_str()?;
        if !COMPILED_EXTENSIONS.contains(&ext) {
            return None;
        }

        let mut name = source.file_stem()?.to_os_string();
        name.push(".o");
        Some(PathBuf::from(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Token;

    fn config() -> Config {
        Config {
            include_dir: vec!["inc1".to_string(), "inc2".to_string()],
            lib_dir: vec!["lib".to_string()],
            linkers: vec!["-lm".to_string()],
            flags: vec!["-Wall".to_string(), "-std=c++17".to_string()],
            src: vec!["./src".to_string()],
            kind: "cpp".to_string(),
            build_name: "app".to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn compile_command_starts_with_front_end() {
        for language in [Language::C, Language::Cpp] {
            let cmd = Compiler::new(language).compile_command(&config(), &[]);
            assert!(cmd.to_string().starts_with(language.compiler()));
            assert!(cmd.argv().unwrap().contains(&"-c".to_string()));
        }
    }

    #[test]
    fn compile_command_keeps_token_order() {
        let sources = vec![PathBuf::from("./src/a.cpp"), PathBuf::from("./src/b.cpp")];
        let cmd = Compiler::new(Language::Cpp).compile_command(&config(), &sources);
        assert_eq!(
            cmd.to_string(),
            r#"g++ -Wall -std=c++17 "-Iinc1" "-Iinc2" -c "./src/a.cpp" "./src/b.cpp""#
        );
    }

    #[test]
    fn include_dirs_are_individually_quoted_in_order() {
        let line = Compiler::new(Language::C).compile_command(&config(), &[]).to_string();
        let first = line.find("\"-Iinc1\"").unwrap();
        let second = line.find("\"-Iinc2\"").unwrap();
        assert!(first < second);
    }

    #[test]
    fn link_command_uses_bare_object_names() {
        let objects = vec![PathBuf::from("./a.o"), PathBuf::from("b.o")];
        let cmd = Compiler::new(Language::Cpp).link_command(&config(), &objects);
        assert_eq!(cmd.argv().unwrap(), ["-o", "app", "a.o", "b.o", "-Llib", "-lm"]);
        assert_eq!(cmd.to_string(), "g++ -o app a.o b.o \"-Llib\" -lm");
        assert_eq!(cmd.args[0], Token::Raw("-o".to_string()));
    }

    #[test]
    fn object_path_follows_toolchain_naming() {
        let compiler = Compiler::new(Language::C);
        assert_eq!(compiler.object_path(Path::new("./src/main.c")), Some(PathBuf::from("main.o")));
        assert_eq!(compiler.object_path(Path::new("lib/x.y.c")), Some(PathBuf::from("x.y.o")));
    }

    #[test]
    fn non_source_matches_produce_no_object() {
        let compiler = Compiler::new(Language::Cpp);
        for name in ["./src/main.cpp.bak", "./src/x.cpp~", "./src/config.cmake", "./src/Makefile"] {
            assert_eq!(compiler.object_path(Path::new(name)), None, "{}", name);
        }
    }
}
