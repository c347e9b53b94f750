// Status lines printed to stderr, keeping stdout for extracted messages.

pub struct Status {
    quiet: bool,
}

impl Status {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    pub fn ok(&self, message: &str) {
        self.print("OK", message);
    }

    pub fn info(&self, message: &str) {
        self.print("INFO", message);
    }

    pub fn warning(&self, message: &str) {
        self.print("WARNING", message);
    }

    /// Failures are printed even in quiet mode.
    pub fn failure(&self, message: &str) {
        eprintln!("{}", format_line("ERROR", message));
    }

    fn print(&self, label: &str, message: &str) {
        if !self.quiet {
            eprintln!("{}", format_line(label, message));
        }
    }
}

fn format_line(label: &str, message: &str) -> String {
    format!("[ {} ] {}", label, message)
}
