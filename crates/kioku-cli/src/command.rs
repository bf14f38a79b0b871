//! Script line parsing.

use std::path::PathBuf;
use thiserror::Error;

/// One parsed script command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Mkdir(PathBuf),
    Touch(PathBuf),
    /// Write `text` at a byte offset, creating the file if needed.
    Write {
        path: PathBuf,
        offset: u64,
        text: String,
    },
    /// Write `text` at the current end of the file.
    Append { path: PathBuf, text: String },
    Cat(PathBuf),
    Ls(PathBuf),
    Tree(PathBuf),
    Mv { from: PathBuf, to: PathBuf },
    Rm(PathBuf),
    Rmdir(PathBuf),
    Truncate { path: PathBuf, size: u64 },
    Stat(PathBuf),
    Df,
}

/// Why a script line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown command: {0}")]
    Unknown(String),

    #[error("{command}: missing {arg}")]
    MissingArg {
        command: &'static str,
        arg: &'static str,
    },

    #[error("{command}: expected a number, got {value:?}")]
    BadNumber {
        command: &'static str,
        value: String,
    },

    #[error("{command}: unexpected argument {value:?}")]
    Extra {
        command: &'static str,
        value: String,
    },
}

/// Cursor over the whitespace-separated words of one line.
struct Args<'a> {
    command: &'static str,
    rest: &'a str,
}

impl<'a> Args<'a> {
    fn word(&mut self, arg: &'static str) -> Result<&'a str, ParseError> {
        let trimmed = self.rest.trim_start();
        if trimmed.is_empty() {
            return Err(ParseError::MissingArg {
                command: self.command,
                arg,
            });
        }
        let end = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
        let (word, rest) = trimmed.split_at(end);
        self.rest = rest;
        Ok(word)
    }

    fn path(&mut self) -> Result<PathBuf, ParseError> {
        self.word("path").map(PathBuf::from)
    }

    fn number(&mut self, arg: &'static str) -> Result<u64, ParseError> {
        let word = self.word(arg)?;
        word.parse().map_err(|_| ParseError::BadNumber {
            command: self.command,
            value: word.to_string(),
        })
    }

    /// Everything left on the line, minus the single separating space.
    fn text(&mut self) -> String {
        let rest = std::mem::take(&mut self.rest);
        rest.strip_prefix(' ').unwrap_or(rest).to_string()
    }

    fn finish(self) -> Result<(), ParseError> {
        let rest = self.rest.trim();
        if rest.is_empty() {
            Ok(())
        } else {
            Err(ParseError::Extra {
                command: self.command,
                value: rest.to_string(),
            })
        }
    }
}

impl Command {
    /// Parse a script line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, ParseError> {
        let line = line.trim_end_matches(['\r', '\n']);
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }

        let end = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
        let (name, rest) = trimmed.split_at(end);

        let command: &'static str = match name {
            "mkdir" => "mkdir",
            "touch" => "touch",
            "write" => "write",
            "append" => "append",
            "cat" => "cat",
            "ls" => "ls",
            "tree" => "tree",
            "mv" => "mv",
            "rm" => "rm",
            "rmdir" => "rmdir",
            "truncate" => "truncate",
            "stat" => "stat",
            "df" => "df",
            other => return Err(ParseError::Unknown(other.to_string())),
        };
        let mut args = Args { command, rest };

        let parsed = match command {
            "mkdir" => Command::Mkdir(args.path()?),
            "touch" => Command::Touch(args.path()?),
            "write" => {
                let path = args.path()?;
                let offset = args.number("offset")?;
                let text = args.text();
                Command::Write { path, offset, text }
            }
            "append" => {
                let path = args.path()?;
                let text = args.text();
                Command::Append { path, text }
            }
            "cat" => Command::Cat(args.path()?),
            "ls" => Command::Ls(args.path()?),
            "tree" => {
                let path = if args.rest.trim().is_empty() {
                    PathBuf::from("/")
                } else {
                    args.path()?
                };
                Command::Tree(path)
            }
            "mv" => {
                let from = args.path()?;
                let to = args.path()?;
                Command::Mv { from, to }
            }
            "rm" => Command::Rm(args.path()?),
            "rmdir" => Command::Rmdir(args.path()?),
            "truncate" => {
                let path = args.path()?;
                let size = args.number("size")?;
                Command::Truncate { path, size }
            }
            "stat" => Command::Stat(args.path()?),
            _ => Command::Df,
        };
        args.finish()?;
        Ok(Some(parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_blank_and_comments() {
        assert_eq!(Command::parse(""), Ok(None));
        assert_eq!(Command::parse("   "), Ok(None));
        assert_eq!(Command::parse("# mkdir /a"), Ok(None));
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(
            Command::parse("mkdir /a/b"),
            Ok(Some(Command::Mkdir(PathBuf::from("/a/b"))))
        );
        assert_eq!(
            Command::parse("  mv /a   /b\n"),
            Ok(Some(Command::Mv {
                from: PathBuf::from("/a"),
                to: PathBuf::from("/b"),
            }))
        );
        assert_eq!(Command::parse("df"), Ok(Some(Command::Df)));
        assert_eq!(
            Command::parse("tree"),
            Ok(Some(Command::Tree(PathBuf::from("/"))))
        );
    }

    #[test]
    fn test_text_keeps_inner_spacing() {
        assert_eq!(
            Command::parse("write /f 3 hello  world "),
            Ok(Some(Command::Write {
                path: PathBuf::from("/f"),
                offset: 3,
                text: "hello  world ".to_string(),
            }))
        );
        assert_eq!(
            Command::parse("append /f"),
            Ok(Some(Command::Append {
                path: PathBuf::from("/f"),
                text: String::new(),
            }))
        );
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            Command::parse("frobnicate /x"),
            Err(ParseError::Unknown("frobnicate".to_string()))
        );
        assert_eq!(
            Command::parse("mv /a"),
            Err(ParseError::MissingArg {
                command: "mv",
                arg: "path"
            })
        );
        assert_eq!(
            Command::parse("truncate /a big"),
            Err(ParseError::BadNumber {
                command: "truncate",
                value: "big".to_string()
            })
        );
        assert_eq!(
            Command::parse("rm /a /b"),
            Err(ParseError::Extra {
                command: "rm",
                value: "/b".to_string()
            })
        );
    }
}
