use clap::ValueEnum;

/// Project template for `init`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Template {
    /// Plain JavaScript entry
    #[default]
    #[value(name = "sample-js", alias = "js")]
    SampleJs,

    /// TypeScript entry
    #[value(name = "sample-ts", alias = "ts")]
    SampleTs,
}

impl Template {
    pub fn name(self) -> &'static str {
        match self {
            Template::SampleJs => "sample-js",
            Template::SampleTs => "sample-ts",
        }
    }

    /// Extension of the entry script.
    pub fn script_extension(self) -> &'static str {
        match self {
            Template::SampleJs => "js",
            Template::SampleTs => "ts",
        }
    }
}
