use std::fmt;

/// Ordered, human-readable record of what a run did.
#[derive(Debug, Default, Clone)]
pub struct Transcript {
    lines: Vec<String>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Record a non-fatal error.
    pub fn error(&mut self, err: impl fmt::Display) {
        self.lines.push(format!("Error: {}", err));
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_string(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_one_line_per_entry() {
        let mut t = Transcript::new();
        t.push("Using season: S01");
        t.error("cannot move 'a.mkv': denied");
        assert_eq!(
            t.into_string(),
            "Using season: S01\nError: cannot move 'a.mkv': denied\n"
        );
    }

    #[test]
    fn empty_transcript_is_empty_string() {
        assert_eq!(Transcript::new().into_string(), "");
    }
}
