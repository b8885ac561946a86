//! Line view over a transcript
//!
//! Field rules look at both the joined text and individual lines, and
//! often pair a keyword line with the one below it because OCR tends to
//! drop the value onto the next line.

/// Lower-cased lines plus their joined form
#[derive(Debug, Clone)]
pub struct LabelLines {
    lines: Vec<String>,
    joined: String,
}

impl LabelLines {
    pub fn new<S: AsRef<str>>(lines: &[S], separator: &str) -> Self {
        let lines: Vec<String> = lines.iter().map(|l| l.as_ref().to_lowercase()).collect();
        let joined = lines.join(separator);
        Self { lines, joined }
    }

    pub fn joined(&self) -> &str {
        &self.joined
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|l| l.trim().is_empty())
    }

    /// Line `idx` joined with the following line, if there is one
    pub fn with_next(&self, idx: usize) -> String {
        match (self.lines.get(idx), self.lines.get(idx + 1)) {
            (Some(line), Some(next)) => format!("{} {}", line, next),
            (Some(line), None) => line.clone(),
            _ => String::new(),
        }
    }

    /// Indices of lines containing any of `phrases`
    pub fn matching<'a>(&'a self, phrases: &'a [&'a str]) -> impl Iterator<Item = usize> + 'a {
        self.lines
            .iter()
            .enumerate()
            .filter(move |(_, line)| phrases.iter().any(|p| line.contains(p)))
            .map(|(idx, _)| idx)
    }
}
