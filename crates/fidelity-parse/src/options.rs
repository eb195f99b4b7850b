use serde::{Deserialize, Serialize};

/// Options that select the grammar variant used by the parser.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParseOptions {
    /// Accept a missing `;` before a line break, a `}` or the end of input.
    pub allow_automatic_semicolon_insertion: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { allow_automatic_semicolon_insertion: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let options: ParseOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, ParseOptions::default());
        assert!(options.allow_automatic_semicolon_insertion);

        let options: ParseOptions =
            serde_json::from_str(r#"{ "allowAutomaticSemicolonInsertion": false }"#).unwrap();
        assert!(!options.allow_automatic_semicolon_insertion);
        assert_eq!(
            serde_json::to_string(&options).unwrap(),
            r#"{"allowAutomaticSemicolonInsertion":false}"#
        );
    }
}
