use serde::{Deserialize, Serialize};

/// Layout settings for emitted text. Missing fields take their defaults when
/// deserialized.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormattingOptions {
    pub use_tabs: bool,
    pub spaces_per_tab: u32,
    pub indent_spaces: u32,
    pub new_line: String,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self { use_tabs: false, spaces_per_tab: 4, indent_spaces: 4, new_line: "\r\n".to_owned() }
    }
}

impl FormattingOptions {
    /// Whitespace covering `columns` columns. With tabs, as many tabs as fit
    /// and spaces for the remainder.
    pub fn indentation(&self, columns: u32) -> String {
        if !self.use_tabs || self.spaces_per_tab == 0 {
            return " ".repeat(columns as usize);
        }
        let tabs = columns / self.spaces_per_tab;
        let spaces = columns % self.spaces_per_tab;
        let mut out = "\t".repeat(tabs as usize);
        out.push_str(&" ".repeat(spaces as usize));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let options: FormattingOptions = serde_json::from_str(r#"{ "useTabs": true }"#).unwrap();
        assert_eq!(
            options,
            FormattingOptions { use_tabs: true, ..FormattingOptions::default() }
        );
        assert_eq!(options.new_line, "\r\n");
        assert_eq!(options.indent_spaces, 4);
    }

    #[test]
    fn indentation_mixes_tabs_and_spaces() {
        let mut options = FormattingOptions::default();
        assert_eq!(options.indentation(6), "      ");

        options.use_tabs = true;
        assert_eq!(options.indentation(6), "\t  ");
        assert_eq!(options.indentation(8), "\t\t");
        assert_eq!(options.indentation(0), "");
    }
}
