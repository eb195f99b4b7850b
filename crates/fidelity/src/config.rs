use anyhow::Context;
use camino::Utf8Path;
use fidelity_emit::FormattingOptions;
use fidelity_parse::ParseOptions;
use serde::{Deserialize, Serialize};

use crate::Environment;

/// Contents of the `--options` JSON file. Every field is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub parse: ParseOptions,
    pub format: FormattingOptions,
}

impl Config {
    pub fn load(env: &impl Environment, path: Option<&Utf8Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text =
            env.read_file(path).with_context(|| format!("failed to read options `{path}`"))?;
        serde_json::from_str(&text).with_context(|| format!("invalid options in `{path}`"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryEnvironment;

    #[test]
    fn partial_options_keep_defaults() {
        let env = MemoryEnvironment::new().with_file(
            "options.json",
            r#"{ "parse": { "allowAutomaticSemicolonInsertion": false },
                 "format": { "newLine": "\n" } }"#,
        );
        let config = Config::load(&env, Some(Utf8Path::new("options.json"))).unwrap();
        assert!(!config.parse.allow_automatic_semicolon_insertion);
        assert_eq!(config.format.new_line, "\n");
        assert_eq!(config.format.indent_spaces, 4);

        assert_eq!(Config::load(&env, None).unwrap(), Config::default());
    }

    #[test]
    fn errors_name_the_file() {
        let env = MemoryEnvironment::new().with_file("bad.json", "{ parse: 1 }");
        let err = Config::load(&env, Some(Utf8Path::new("bad.json"))).unwrap_err();
        assert_eq!(err.to_string(), "invalid options in `bad.json`");

        let err = Config::load(&env, Some(Utf8Path::new("none.json"))).unwrap_err();
        assert_eq!(err.to_string(), "failed to read options `none.json`");
    }
}
