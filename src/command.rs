use std::{
    fmt,
    path::Path,
    process::Command,
};
use crate::error::{BuilderError, BuilderResult};

/// One argument as written by the user or derived from a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Verbatim text from the config, split into words with shell quoting rules.
    Raw(String),
    /// A single argument, shown without quotes.
    Plain(String),
    /// A single argument that may contain spaces (paths, `-I`/`-L` dirs).
    Quoted(String),
}

/// A toolchain invocation kept as a program plus structured arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<Token>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Self {
        CommandLine {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn raw(&mut self, value: impl Into<String>) -> &mut Self {
        self.args.push(Token::Raw(value.into()));
        self
    }

    pub fn plain(&mut self, value: impl Into<String>) -> &mut Self {
        self.args.push(Token::Plain(value.into()));
        self
    }

    pub fn quoted(&mut self, value: impl Into<String>) -> &mut Self {
        self.args.push(Token::Quoted(value.into()));
        self
    }

    /// Arguments exactly as the child process receives them.
    pub fn argv(&self) -> BuilderResult<Vec<String>> {
        let mut argv = Vec::with_capacity(self.args.len());
        for token in &self.args {
            match token {
                Token::Raw(value) => argv.extend(split_words(value)?),
                Token::Plain(value) | Token::Quoted(value) => argv.push(value.clone()),
            }
        }
        Ok(argv)
    }

    pub fn to_command(&self, dir: &Path) -> BuilderResult<Command> {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.argv()?).current_dir(dir);
        Ok(cmd)
    }
}

/// Splits `value` the way `sh` would, so `-DMSG="a b"` stays one word.
pub fn split_words(value: &str) -> BuilderResult<Vec<String>> {
    shlex::split(value)
        .ok_or_else(|| BuilderError::Config(format!("Unbalanced quotes in {:?}", value)))
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for token in &self.args {
            match token {
                Token::Raw(value) if value.trim().is_empty() => {}
                Token::Raw(value) | Token::Plain(value) => write!(f, " {}", value)?,
                Token::Quoted(value) => write!(f, " \"{}\"", value)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_quotes_only_path_tokens() {
        let mut line = CommandLine::new("g++");
        line.raw("-O2").quoted("-Iinc dir").raw("-c").quoted("src/a.cpp");
        assert_eq!(line.to_string(), r#"g++ -O2 "-Iinc dir" -c "src/a.cpp""#);
    }

    #[test]
    fn raw_tokens_split_like_a_shell() {
        let mut line = CommandLine::new("gcc");
        line.raw("-lm  -lpthread").raw("").quoted("my file.o").plain("out bin");
        assert_eq!(line.argv().unwrap(), ["-lm", "-lpthread", "my file.o", "out bin"]);
    }

    #[test]
    fn quoted_flag_stays_one_argument() {
        let mut line = CommandLine::new("gcc");
        line.raw(r#"-DMSG="a b" -O2"#).raw("-c");
        assert_eq!(line.argv().unwrap(), ["-DMSG=a b", "-O2", "-c"]);
        assert_eq!(line.to_string(), r#"gcc -DMSG="a b" -O2 -c"#);
    }

    #[test]
    fn unbalanced_quote_is_a_config_error() {
        let mut line = CommandLine::new("gcc");
        line.raw(r#"-DMSG="a b"#);
        assert!(matches!(line.argv(), Err(BuilderError::Config(_))));
        assert!(line.to_command(Path::new(".")).is_err());
    }

    #[test]
    fn command_runs_in_given_directory() {
        let mut line = CommandLine::new("gcc");
        line.raw("-c");
        let cmd = line.to_command(Path::new("/tmp")).unwrap();
        assert_eq!(cmd.get_program(), "gcc");
        assert_eq!(cmd.get_current_dir(), Some(Path::new("/tmp")));
        assert_eq!(cmd.get_args().collect::<Vec<_>>(), ["-c"]);
    }
}
