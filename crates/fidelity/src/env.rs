use std::collections::BTreeMap;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};

/// Everything the tools need from the outside world.
///
/// The syntax crates never see this; only the driver does, so tests can run
/// the whole pipeline against [`MemoryEnvironment`].
pub trait Environment {
    fn read_file(&self, path: &Utf8Path) -> io::Result<String>;

    fn write_file(&mut self, path: &Utf8Path, contents: &str) -> io::Result<()>;

    fn delete_file(&mut self, path: &Utf8Path) -> io::Result<()>;

    fn file_exists(&self, path: &Utf8Path) -> bool;

    /// Files under `dir`, recursively, whose extension is one of
    /// `extensions`. Sorted.
    fn list_files(&self, dir: &Utf8Path, extensions: &[&str]) -> io::Result<Vec<Utf8PathBuf>>;

    /// Process arguments, including the program name.
    fn arguments(&self) -> Vec<String>;

    fn stdout(&mut self) -> &mut dyn io::Write;

    fn stderr(&mut self) -> &mut dyn io::Write;
}

fn has_extension(path: &Utf8Path, extensions: &[&str]) -> bool {
    path.extension().is_some_and(|extension| extensions.contains(&extension))
}

pub struct OsEnvironment {
    stdout: io::Stdout,
    stderr: io::Stderr,
}

impl OsEnvironment {
    pub fn new() -> Self {
        Self { stdout: io::stdout(), stderr: io::stderr() }
    }

    fn collect_files(
        dir: &Utf8Path,
        extensions: &[&str],
        out: &mut Vec<Utf8PathBuf>,
    ) -> io::Result<()> {
        for entry in dir.read_dir_utf8()? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                Self::collect_files(entry.path(), extensions, out)?;
            } else if has_extension(entry.path(), extensions) {
                out.push(entry.into_path());
            }
        }
        Ok(())
    }
}

impl Default for OsEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for OsEnvironment {
    fn read_file(&self, path: &Utf8Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write_file(&mut self, path: &Utf8Path, contents: &str) -> io::Result<()> {
        std::fs::write(path, contents)
    }

    fn delete_file(&mut self, path: &Utf8Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }

    fn file_exists(&self, path: &Utf8Path) -> bool {
        path.is_file()
    }

    fn list_files(&self, dir: &Utf8Path, extensions: &[&str]) -> io::Result<Vec<Utf8PathBuf>> {
        let mut files = Vec::new();
        Self::collect_files(dir, extensions, &mut files)?;
        files.sort();
        Ok(files)
    }

    fn arguments(&self) -> Vec<String> {
        std::env::args().collect()
    }

    fn stdout(&mut self) -> &mut dyn io::Write {
        &mut self.stdout
    }

    fn stderr(&mut self) -> &mut dyn io::Write {
        &mut self.stderr
    }
}

/// In-memory file system with captured output.
#[derive(Debug, Default)]
pub struct MemoryEnvironment {
    files: BTreeMap<Utf8PathBuf, String>,
    arguments: Vec<String>,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

impl MemoryEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<Utf8PathBuf>, text: impl Into<String>) -> Self {
        self.files.insert(path.into(), text.into());
        self
    }

    pub fn with_arguments<I, S>(mut self, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.arguments = arguments.into_iter().map(Into::into).collect();
        self
    }

    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

impl Environment for MemoryEnvironment {
    fn read_file(&self, path: &Utf8Path) -> io::Result<String> {
        self.files.get(path).cloned().ok_or_else(|| io::ErrorKind::NotFound.into())
    }

    fn write_file(&mut self, path: &Utf8Path, contents: &str) -> io::Result<()> {
        self.files.insert(path.to_owned(), contents.to_owned());
        Ok(())
    }

    fn delete_file(&mut self, path: &Utf8Path) -> io::Result<()> {
        match self.files.remove(path) {
            Some(_) => Ok(()),
            None => Err(io::ErrorKind::NotFound.into()),
        }
    }

    fn file_exists(&self, path: &Utf8Path) -> bool {
        self.files.contains_key(path)
    }

    fn list_files(&self, dir: &Utf8Path, extensions: &[&str]) -> io::Result<Vec<Utf8PathBuf>> {
        Ok(self
            .files
            .keys()
            .filter(|path| path.starts_with(dir) && has_extension(path, extensions))
            .cloned()
            .collect())
    }

    fn arguments(&self) -> Vec<String> {
        self.arguments.clone()
    }

    fn stdout(&mut self) -> &mut dyn io::Write {
        &mut self.stdout
    }

    fn stderr(&mut self) -> &mut dyn io::Write {
        &mut self.stderr
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    #[test]
    fn memory_environment_behaves_like_a_file_system() {
        let mut env = MemoryEnvironment::new()
            .with_file("src/a.ts", "a")
            .with_file("src/nested/b.ts", "b")
            .with_file("src/readme.md", "")
            .with_file("srcx/c.ts", "c");

        let files = env.list_files(Utf8Path::new("src"), &["ts", "js"]).unwrap();
        assert_eq!(files, [Utf8PathBuf::from("src/a.ts"), "src/nested/b.ts".into()]);

        let out = Utf8Path::new("out.ts");
        env.write_file(out, "x").unwrap();
        assert_eq!(env.read_file(out).unwrap(), "x");
        env.delete_file(out).unwrap();
        assert!(!env.file_exists(out));
        assert_eq!(env.read_file(out).unwrap_err().kind(), io::ErrorKind::NotFound);

        writeln!(env.stdout(), "out").unwrap();
        writeln!(env.stderr(), "err").unwrap();
        assert_eq!(env.stdout_text(), "out\n");
        assert_eq!(env.stderr_text(), "err\n");
    }
}
