use std::io::Write as _;

use anyhow::{Context, bail};
use camino::{Utf8Path, Utf8PathBuf};
use fidelity_db::{RootDatabase, SourceFile, check_file};
use fidelity_emit::{Emitter, IoWriter, StringWriter};
use fidelity_errors::Renderer;
use fidelity_syntax::{
    Element as _, IdentifierCollector, InvariantChecker, ancestors_at_position, token_at_position,
};
use text_size::{TextRange, TextSize};

use crate::{Config, Environment};

const SOURCE_EXTENSIONS: &[&str] = &["ts", "js"];

pub struct Driver<E> {
    env: E,
    db: RootDatabase,
    config: Config,
    renderer: Renderer,
}

impl<E: Environment> Driver<E> {
    pub fn new(env: E, config: Config, renderer: Renderer) -> Self {
        Self { env, db: RootDatabase::default(), config, renderer }
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    fn load(&self, path: &Utf8Path) -> anyhow::Result<SourceFile> {
        let text = self.env.read_file(path).with_context(|| format!("failed to read `{path}`"))?;
        Ok(SourceFile::new(&self.db, path.to_owned(), text, self.config.parse.clone()))
    }

    /// Prints the tree of `path`, with every trivia piece when `trivia` is set.
    pub fn dump(&mut self, path: &Utf8Path, trivia: bool) -> anyhow::Result<()> {
        let file = self.load(path)?;
        let parse = file.parse(&self.db);
        if trivia {
            self.env.stdout().write_all(parse.debug_tree().as_bytes())?;
            return Ok(());
        }

        let writer = IoWriter::new(self.env.stdout(), self.config.format.new_line.as_str());
        Emitter::new(&self.config.format, writer).emit_tree(parse.root())?;
        Ok(())
    }

    /// Reports diagnostics for every file under `paths` and returns how many
    /// were found.
    pub fn check(&mut self, paths: &[Utf8PathBuf]) -> anyhow::Result<usize> {
        let mut files = Vec::new();
        for path in paths {
            if self.env.file_exists(path) {
                files.push(path.clone());
                continue;
            }
            let listed = self
                .env
                .list_files(path, SOURCE_EXTENSIONS)
                .with_context(|| format!("failed to list `{path}`"))?;
            if listed.is_empty() {
                bail!("no source files found at `{path}`");
            }
            files.extend(listed);
        }

        let mut count = 0;
        for path in &files {
            let file = self.load(path)?;
            let root = file.parse(&self.db).root();
            if let Err(violation) = InvariantChecker::check(root) {
                bail!("malformed tree for `{path}`: {violation}");
            }

            let text = file.text(&self.db);
            let diagnostics = check_file(&self.db, file);
            for diagnostic in diagnostics {
                let rendered = diagnostic.render(&self.renderer, path.as_str(), text);
                writeln!(self.env.stderr(), "{rendered}")?;
            }
            count += diagnostics.len();
        }

        tracing::info!(files = files.len(), diagnostics = count, "checked");
        Ok(count)
    }

    /// Prints the distinct identifiers of `path`, sorted.
    pub fn identifiers(&mut self, path: &Utf8Path) -> anyhow::Result<()> {
        let file = self.load(path)?;
        let mut identifiers: Vec<_> =
            IdentifierCollector::collect(file.parse(&self.db).root()).into_iter().collect();
        identifiers.sort();

        let out = self.env.stdout();
        for identifier in identifiers {
            writeln!(out, "{identifier}")?;
        }
        Ok(())
    }

    /// Prints the nodes enclosing byte `offset` of `path`, outermost first,
    /// followed by the token there.
    pub fn locate(&mut self, path: &Utf8Path, offset: u32) -> anyhow::Result<()> {
        let file = self.load(path)?;
        let root = file.parse(&self.db).root();
        let position = TextSize::new(offset);
        let token = token_at_position(root, position)?;
        let ancestors = ancestors_at_position(root, position)?;

        let line_col = file.line_index(&self.db).line_col(position);
        let out = self.env.stdout();
        writeln!(out, "{path}:{}:{}", line_col.line + 1, line_col.col + 1)?;

        for (depth, node) in ancestors.iter().enumerate() {
            let indent = depth * 2;
            writeln!(out, "{:indent$}{:?}@{:?}", "", node.element.kind(), node.range())?;
        }

        let start = token.start + token.element.leading_trivia().full_width();
        let range = TextRange::at(start, token.element.width());
        writeln!(
            out,
            "{:indent$}{:?}@{range:?} {:?}",
            "",
            token.element.kind(),
            token.element.text(),
            indent = ancestors.len() * 2
        )?;
        Ok(())
    }

    /// Writes the source of `path` back out to `output`, from its tree.
    pub fn emit(&mut self, path: &Utf8Path, output: &Utf8Path) -> anyhow::Result<()> {
        let file = self.load(path)?;
        let mut emitter = Emitter::new(&self.config.format, StringWriter::default());
        emitter.emit_full_text(file.parse(&self.db).root())?;

        let text = emitter.into_writer().into_string();
        self.env.write_file(output, &text).with_context(|| format!("failed to write `{output}`"))
    }
}
