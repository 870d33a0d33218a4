use std::{fs, io, path::Path, str::FromStr};

/// Fractional digits of every matrix and depth value in a cam file.
pub(crate) const FIXED_PRECISION: usize = 18;

/// Format a value in fixed-point notation, MVSNet does not parse exponents.
pub(crate) fn format_fixed(value: f64) -> String {
    format!("{value:.prec$}", prec = FIXED_PRECISION)
}

/// Format a value with the shortest decimal that reads back to the same
/// `f64`, keeping at least one fractional digit.
pub(crate) fn format_shortest(value: f64) -> String {
    let s = value.to_string();
    if value.is_finite() && !s.contains('.') {
        format!("{s}.0")
    } else {
        s
    }
}

/// Write `lines` joined by newlines, without a trailing newline.
pub(crate) fn write_lines(path: &Path, lines: &[String]) -> io::Result<()> {
    fs::write(path, lines.join("\n"))
}

/// Whitespace separated tokens of a text, with their 1-based line number.
pub(crate) struct Tokens<'a> {
    inner: Box<dyn Iterator<Item = (usize, &'a str)> + 'a>,
    line: usize,
}

impl<'a> Tokens<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        let inner = text
            .lines()
            .enumerate()
            .flat_map(|(i, line)| line.split_whitespace().map(move |token| (i + 1, token)));
        Self {
            inner: Box::new(inner),
            line: 0,
        }
    }

    /// Line of the last returned token.
    pub(crate) fn line(&self) -> usize {
        self.line
    }

    pub(crate) fn next_token(&mut self, what: &str) -> Result<&'a str, String> {
        match self.inner.next() {
            Some((line, token)) => {
                self.line = line;
                Ok(token)
            }
            None => Err(format!("unexpected end of file, expected {what}")),
        }
    }

    pub(crate) fn expect_label(&mut self, label: &str) -> Result<(), String> {
        let token = self.next_token(label)?;
        if token == label {
            Ok(())
        } else {
            Err(format!(
                "line {}: expected '{label}', found '{token}'",
                self.line
            ))
        }
    }

    pub(crate) fn next_parsed<T: FromStr>(&mut self, what: &str) -> Result<T, String>
    where
        T::Err: std::fmt::Display,
    {
        let token = self.next_token(what)?;
        parse_part(token).map_err(|e| format!("line {}: {what}: {e}", self.line))
    }

    pub(crate) fn rest(&mut self) -> Vec<&'a str> {
        self.inner.by_ref().map(|(_, token)| token).collect()
    }
}

pub(crate) fn parse_part<T: FromStr>(s: &str) -> Result<T, String>
where
    T::Err: std::fmt::Display,
{
    s.parse::<T>().map_err(|e| format!("{s}: {e}"))
}
