use fidelity_syntax::SyntaxKind::*;

use super::name;
use crate::parser::Parser;

/// `: Type`, with both parts stood in when absent.
pub(crate) fn type_annotation(p: &mut Parser<'_>) {
    let m = p.start();
    p.expect(COLON);
    type_reference(p);
    m.complete(p, TYPE_ANNOTATION);
}

fn type_reference(p: &mut Parser<'_>) {
    let m = p.start();
    name(p);
    m.complete(p, TYPE_REFERENCE);
}
