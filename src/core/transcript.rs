use std::sync::LazyLock;

use colored::Colorize;
use regex::Regex;
use serde::Deserialize;

const INDENT: &str = "  ";

static RICH_TEXT_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<color=[a-z]+>(.*)</color>$").expect("rich text pattern is valid")
});
static ANSI_ESCAPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*m").expect("ansi pattern is valid"));

/// How colors are encoded in the rendered transcript.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Markup {
    /// `<color=...>` tags understood by the game's text widgets.
    #[default]
    Rich,
    /// Terminal escape sequences.
    Ansi,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tone {
    Normal,
    Error,
    Success,
    Prompt,
}

impl Tone {
    fn tag(self) -> &'static str {
        match self {
            Tone::Normal => "white",
            Tone::Error => "red",
            Tone::Success => "green",
            Tone::Prompt => "yellow",
        }
    }
}

fn paint(text: &str, tone: Tone, markup: Markup) -> String {
    match markup {
        Markup::Rich => format!("<color={}>{}</color>", tone.tag(), text),
        Markup::Ansi => match tone {
            Tone::Normal => text.normal().to_string(),
            Tone::Error => text.red().to_string(),
            Tone::Success => text.green().to_string(),
            Tone::Prompt => text.yellow().to_string(),
        },
    }
}

/// Renders raw process output as indented, colored lines.
///
/// Empty lines are kept, every line gets a trailing newline.
pub fn format(text: &str, is_error: bool) -> String {
    format_with(text, is_error, Markup::Rich)
}

pub fn format_with(text: &str, is_error: bool, markup: Markup) -> String {
    let tone = if is_error { Tone::Error } else { Tone::Normal };

    text.split('\n')
        .map(|line| paint(&format!("{INDENT}{line}"), tone, markup) + "\n")
        .collect()
}

/// Undoes [`format_with`] for either markup.
pub fn strip(formatted: &str) -> String {
    let body = formatted.strip_suffix('\n').unwrap_or(formatted);

    body.split('\n')
        .map(|line| {
            let plain = ANSI_ESCAPE_RE.replace_all(line, "");
            let inner = RICH_TEXT_LINE_RE
                .captures(&plain)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| plain.to_string());
            inner
                .strip_prefix(INDENT)
                .map(str::to_string)
                .unwrap_or(inner)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Accumulates the display-ready transcript of one grading request.
#[derive(Clone, Debug)]
pub struct Transcript {
    markup: Markup,
    buf: String,
}

impl Transcript {
    pub fn new(markup: Markup) -> Self {
        Self {
            markup,
            buf: String::new(),
        }
    }

    pub fn command(&mut self, command_line: &str) {
        self.buf
            .push_str(&paint(&format!("$ {command_line}"), Tone::Prompt, self.markup));
        self.buf.push('\n');
    }

    pub fn output(&mut self, text: &str, is_error: bool) {
        self.buf.push_str(&format_with(text, is_error, self.markup));
    }

    pub fn feedback(&mut self, message: &str, success: bool) {
        if message.is_empty() {
            return;
        }
        let tone = if success { Tone::Success } else { Tone::Error };
        self.buf.push('\n');
        self.buf.push_str(&paint(message.trim_end(), tone, self.markup));
        self.buf.push('\n');
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_wraps_every_line() {
        assert_eq!(
            format("a\n\nb", false),
            "<color=white>  a</color>\n<color=white>  </color>\n<color=white>  b</color>\n"
        );
        assert_eq!(format("oops", true), "<color=red>  oops</color>\n");
    }

    #[test]
    fn test_trailing_newline_yields_trailing_empty_line() {
        assert_eq!(
            format("done\n", false),
            "<color=white>  done</color>\n<color=white>  </color>\n"
        );
    }

    #[test]
    fn test_strip_recovers_lines() {
        let inputs = [
            "",
            "single",
            "first\nsecond\n",
            "\n\n  indented\n\ttab",
            "Prístup je povolený.\nProgram ukončený!",
        ];

        for input in inputs {
            assert_eq!(strip(&format(input, false)), input);
            assert_eq!(strip(&format(input, true)), input);
        }
    }

    #[test]
    fn test_strip_ansi() {
        colored::control::set_override(true);
        let formatted = format_with("x\ny", true, Markup::Ansi);
        colored::control::unset_override();

        assert!(formatted.contains('\u{1b}'));
        assert_eq!(strip(&formatted), "x\ny");
    }

    #[test]
    fn test_ansi_output_keeps_terminal_color() {
        colored::control::set_override(true);
        let formatted = format_with("plain", false, Markup::Ansi);
        colored::control::unset_override();

        assert_eq!(formatted, "  plain\n");
    }

    #[test]
    fn test_transcript_sections() {
        let mut transcript = Transcript::new(Markup::Rich);
        transcript.command("java -jar grader.jar TempProgram.java");
        transcript.output("hello", false);
        transcript.feedback("Great job!\n", true);
        transcript.feedback("", false);

        assert_eq!(
            transcript.into_string(),
            "<color=yellow>$ java -jar grader.jar TempProgram.java</color>\n\
             <color=white>  hello</color>\n\
             \n<color=green>Great job!</color>\n"
        );
    }
}
