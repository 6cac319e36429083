use clap::ValueEnum;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    #[value(name = "json-pretty")]
    JsonPretty,
}

/// Writes command results to stdout as colored text or as JSON lines
pub struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    pub fn is_human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn success(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }
        match self.format {
            OutputFormat::Human => println!("{} {}", "✓".green(), msg.as_ref()),
            _ => self.message("success", msg.as_ref()),
        }
    }

    pub fn error(&self, msg: impl AsRef<str>) {
        // Shown even in quiet mode
        match self.format {
            OutputFormat::Human => eprintln!("{} {}", "✗".red(), msg.as_ref()),
            _ => self.message("error", msg.as_ref()),
        }
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }
        match self.format {
            OutputFormat::Human => println!("{}", msg.as_ref()),
            _ => self.message("info", msg.as_ref()),
        }
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }
        match self.format {
            OutputFormat::Human => println!("{} {}", "⚠".yellow(), msg.as_ref()),
            _ => self.message("warning", msg.as_ref()),
        }
    }

    /// Section heading; JSON output carries titles inside the payload instead
    pub fn heading(&self, title: impl AsRef<str>) {
        if self.quiet || !self.is_human() {
            return;
        }
        println!("\n{}", title.as_ref().bold().cyan());
    }

    pub fn table(&self, table: &Table) {
        if self.quiet || !self.is_human() {
            return;
        }
        println!("{}", table);
    }

    pub fn json(&self, data: &serde_json::Value) {
        if self.quiet && !self.is_human() {
            return;
        }
        self.print_json(data);
    }

    fn message(&self, kind: &str, msg: &str) {
        self.print_json(&json!({
            "type": kind,
            "message": msg
        }));
    }

    fn print_json(&self, data: &serde_json::Value) {
        match self.format {
            OutputFormat::JsonPretty => println!("{}", serde_json::to_string_pretty(data).unwrap_or_default()),
            OutputFormat::Json | OutputFormat::Human => println!("{}", serde_json::to_string(data).unwrap_or_default()),
        }
    }
}
