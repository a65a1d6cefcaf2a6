use doclet_core::ParseOptions;

use crate::config::DocletConfig;

impl DocletConfig {
    /// Parser options for this configuration.
    pub fn to_parse_options(&self) -> ParseOptions {
        ParseOptions::builder()
            .unwrap(self.unwrap)
            .allow_single_star(self.allow_single_star)
            .sloppy(self.sloppy)
            .strict(self.strict)
            .recoverable(self.recoverable)
            .line_numbers(self.line_numbers)
            .maybe_tags(self.tags.clone())
            .build()
    }
}
