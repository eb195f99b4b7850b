//! Incremental front end: source files are salsa inputs and everything
//! derived from them is memoized until the file changes.

use camino::Utf8PathBuf;
pub use fidelity_errors::Diagnostic;
use fidelity_parse::{GrammarChecker, Parse, ParseOptions};
pub use line_index::LineIndex;

#[salsa::db]
#[derive(Clone, Default)]
pub struct RootDatabase {
    storage: salsa::Storage<Self>,
}

#[salsa::db]
impl salsa::Database for RootDatabase {}

#[salsa::input(debug)]
pub struct SourceFile {
    #[returns(ref)]
    pub path: Utf8PathBuf,
    #[returns(deref)]
    pub text: String,
    #[returns(ref)]
    pub options: ParseOptions,
}

#[salsa::tracked]
impl SourceFile {
    #[salsa::tracked(returns(ref), no_eq)]
    pub fn parse(self, db: &dyn salsa::Database) -> Parse {
        let text = self.text(db);
        tracing::debug!(len = text.len(), "parsing source file");
        fidelity_parse::parse(text, self.options(db))
    }

    #[salsa::tracked(returns(ref), no_eq)]
    pub fn line_index(self, db: &dyn salsa::Database) -> LineIndex {
        LineIndex::new(self.text(db))
    }
}

/// Parse diagnostics and grammar checks together, ordered by position.
#[salsa::tracked(returns(ref))]
pub fn check_file(db: &dyn salsa::Database, file: SourceFile) -> Vec<Diagnostic> {
    let parse = file.parse(db);
    let mut diagnostics = parse.diagnostics().to_vec();
    diagnostics.extend(GrammarChecker::check(parse.root()));
    diagnostics.sort_by_key(|diagnostic| diagnostic.range().start());
    diagnostics
}
