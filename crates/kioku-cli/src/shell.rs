//! Executes parsed commands against a [`MemoryFs`].

use anyhow::Context;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use kioku_vfs::{FsConfig, MemoryFs, OpenFlags, VfsOps};

use crate::command::Command;

/// Script interpreter over a fresh, private filesystem.
pub struct Shell {
    fs: MemoryFs,
}

impl Shell {
    pub fn new(config: FsConfig) -> Self {
        Self {
            fs: MemoryFs::with_config(config),
        }
    }

    pub fn fs(&self) -> &MemoryFs {
        &self.fs
    }

    /// Run every line of `script`. Returns how many lines failed.
    ///
    /// A failing line is reported on `err` and the script carries on.
    pub async fn run(
        &self,
        script: impl BufRead,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> anyhow::Result<usize> {
        let mut failures = 0;
        for (index, line) in script.lines().enumerate() {
            let line = line.context("reading script")?;
            let lineno = index + 1;

            let result = match Command::parse(&line) {
                Ok(Some(command)) => self.execute(&command, out).await,
                Ok(None) => continue,
                Err(e) => Err(e.into()),
            };
            if let Err(e) = result {
                failures += 1;
                tracing::debug!(lineno, error = %e, "command failed");
                writeln!(err, "line {lineno}: {e}")?;
            }
        }
        Ok(failures)
    }

    /// Execute a single command.
    pub async fn execute(&self, command: &Command, out: &mut dyn Write) -> anyhow::Result<()> {
        let config = self.fs.config();
        match command {
            Command::Mkdir(path) => {
                self.fs.mkdir(path, config.dir_perm).await?;
            }
            Command::Touch(path) => {
                if !self.fs.exists(path).await {
                    self.fs.create(path, config.file_perm).await?;
                }
            }
            Command::Write { path, offset, text } => {
                self.fs
                    .open(path, OpenFlags::create(), config.file_perm)
                    .await?;
                self.fs.write(path, *offset, text.as_bytes()).await?;
            }
            Command::Append { path, text } => {
                let attr = self
                    .fs
                    .open(path, OpenFlags::create(), config.file_perm)
                    .await?;
                self.fs.write(path, attr.size, text.as_bytes()).await?;
            }
            Command::Cat(path) => {
                let data = self.fs.read_all(path).await?;
                out.write_all(&data)?;
                if !data.ends_with(b"\n") {
                    writeln!(out)?;
                }
            }
            Command::Ls(path) => {
                for entry in self.fs.readdir(path).await? {
                    let attr = self.fs.getattr(&path.join(&entry.name)).await?;
                    writeln!(out, "{} {:>8} {}", attr.mode, attr.size, entry.name)?;
                }
            }
            Command::Tree(path) => self.tree(path, out).await?,
            Command::Mv { from, to } => self.fs.rename(from, to).await?,
            Command::Rm(path) => self.fs.unlink(path).await?,
            Command::Rmdir(path) => self.fs.rmdir(path).await?,
            Command::Truncate { path, size } => self.fs.truncate(path, *size).await?,
            Command::Stat(path) => {
                let attr = self.fs.getattr(path).await?;
                writeln!(
                    out,
                    "{}: {} {:#o} {} bytes",
                    path.display(),
                    attr.mode,
                    attr.perm,
                    attr.size
                )?;
            }
            Command::Df => {
                let stats = self.fs.statfs().await?;
                writeln!(
                    out,
                    "{} files, {} directories, {} bytes",
                    stats.files, stats.directories, stats.bytes
                )?;
            }
        }
        Ok(())
    }

    /// Print the subtree at `root`, depth first, children sorted.
    async fn tree(&self, root: &Path, out: &mut dyn Write) -> anyhow::Result<()> {
        let attr = self.fs.getattr(root).await?;
        writeln!(out, "{}", root.display())?;
        if !attr.is_dir() {
            return Ok(());
        }

        let mut stack = Vec::new();
        self.push_children(root, 1, &mut stack).await?;
        while let Some(item) = stack.pop() {
            let suffix = if item.is_dir { "/" } else { "" };
            writeln!(out, "{}{}{suffix}", "  ".repeat(item.depth), item.name)?;
            if item.is_dir {
                self.push_children(&item.path, item.depth + 1, &mut stack)
                    .await?;
            }
        }
        Ok(())
    }

    /// Push the entries of `dir` so that the first one by name pops first.
    async fn push_children(
        &self,
        dir: &Path,
        depth: usize,
        stack: &mut Vec<TreeItem>,
    ) -> anyhow::Result<()> {
        let entries = self.fs.readdir(dir).await?;
        for entry in entries.into_iter().rev() {
            stack.push(TreeItem {
                path: dir.join(&entry.name),
                is_dir: entry.kind.is_dir(),
                name: entry.name,
                depth,
            });
        }
        Ok(())
    }
}

struct TreeItem {
    path: PathBuf,
    name: String,
    depth: usize,
    is_dir: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn run(script: &str) -> (usize, String, String) {
        let shell = Shell::new(FsConfig::default());
        let mut out = Vec::new();
        let mut err = Vec::new();
        let failures = shell
            .run(script.as_bytes(), &mut out, &mut err)
            .await
            .unwrap();
        (
            failures,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_write_and_cat() {
        let (failures, out, _) = run("write /notes/a.txt 0 hello\nappend /notes/a.txt  world\ncat /notes/a.txt\n").await;
        assert_eq!(failures, 0);
        assert_eq!(out, "hello world\n");
    }

    #[tokio::test]
    async fn test_sparse_write_shows_zeros() {
        let (_, out, _) = run("write /f 3 x\nstat /f\n").await;
        assert_eq!(out, "/f: -rw-r--r-- 0o644 4 bytes\n");
    }

    #[tokio::test]
    async fn test_ls_and_tree() {
        let script = "\
# build a small tree
touch /b/two.txt
write /a/one.txt 0 1
mkdir /a/empty
ls /a
tree
";
        let (failures, out, _) = run(script).await;
        assert_eq!(failures, 0);
        let expected = "\
drwxr-xr-x        0 empty
-rw-r--r--        1 one.txt
/
  a/
    empty/
    one.txt
  b/
    two.txt
";
        assert_eq!(out, expected);
    }

    #[tokio::test]
    async fn test_errors_are_counted_and_reported() {
        let script = "mkdir /d\ntouch /d/f\nrmdir /d\nbogus\nrm /missing\nmv /d /e\ndf\n";
        let (failures, out, err) = run(script).await;
        assert_eq!(failures, 3);
        assert!(err.contains("line 3: directory not empty: /d"));
        assert!(err.contains("line 4: unknown command: bogus"));
        assert!(err.contains("line 5: not found: /missing"));
        assert_eq!(out, "1 files, 2 directories, 0 bytes\n");
    }

    #[tokio::test]
    async fn test_touch_existing_directory_is_noop() {
        let (failures, _, _) = run("mkdir /d\ntouch /d\n").await;
        assert_eq!(failures, 0);
    }

    #[tokio::test]
    async fn test_truncate_then_cat() {
        let shell = Shell::new(FsConfig::default());
        let mut out = Vec::new();
        let mut err = Vec::new();
        shell
            .run("write /t 0 abcdef\ntruncate /t 2\n".as_bytes(), &mut out, &mut err)
            .await
            .unwrap();
        assert_eq!(shell.fs().read_all(Path::new("/t")).await.unwrap(), b"ab");
    }
}
