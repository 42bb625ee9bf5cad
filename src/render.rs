//! Terminal rendering of note documents.
//!
//! Markdown is parsed by `tui-markdown` into ratatui text, and each styled
//! span is written out with crossterm escape sequences so the result can be
//! printed straight to a terminal without entering a full-screen UI.

use std::io::{self, Write};

use crossterm::style::{Attribute, Color as TermColor, ContentStyle};
use ratatui::style::{Color, Modifier, Style};

use crate::ZetError;

/// Column at which rendered lines wrap.
pub const WRAP_WIDTH: usize = 73;

/// Writes `source` as styled terminal text, wrapped at [`WRAP_WIDTH`].
///
/// Lines break between words; a single word longer than the width is left
/// intact.
/// # Errors
///
/// Returns [`ZetError::Render`] if writing to `out` fails.
pub fn write_markdown(out: &mut impl Write, source: &str) -> Result<(), ZetError> {
    write_styled(out, source).map_err(ZetError::Render)
}

/// Writes `source` verbatim and unwrapped, for `--raw` output and
/// non-terminal stdout.
pub fn write_plain(out: &mut impl Write, source: &str) -> Result<(), ZetError> {
    out.write_all(source.as_bytes())
        .and_then(|()| out.flush())
        .map_err(ZetError::Render)
}

fn write_styled(out: &mut impl Write, source: &str) -> io::Result<()> {
    let text = tui_markdown::from_str(source);
    for line in &text.lines {
        let line_style = text.style.patch(line.style);
        let mut column = 0;
        for span in &line.spans {
            let style = to_content_style(line_style.patch(span.style));
            for word in span.content.split_inclusive(' ') {
                let visible = word.trim_end_matches(' ').chars().count();
                if column > 0 && column + visible > WRAP_WIDTH {
                    writeln!(out)?;
                    column = 0;
                }
                write!(out, "{}", style.apply(word))?;
                column += word.chars().count();
            }
        }
        writeln!(out)?;
    }
    out.flush()
}

fn to_content_style(style: Style) -> ContentStyle {
    let mut content = ContentStyle::new();
    content.foreground_color = style.fg.map(to_term_color);
    content.background_color = style.bg.map(to_term_color);

    let modifiers = style.add_modifier - style.sub_modifier;
    let mapping = [
        (Modifier::BOLD, Attribute::Bold),
        (Modifier::DIM, Attribute::Dim),
        (Modifier::ITALIC, Attribute::Italic),
        (Modifier::UNDERLINED, Attribute::Underlined),
        (Modifier::SLOW_BLINK, Attribute::SlowBlink),
        (Modifier::RAPID_BLINK, Attribute::RapidBlink),
        (Modifier::REVERSED, Attribute::Reverse),
        (Modifier::HIDDEN, Attribute::Hidden),
        (Modifier::CROSSED_OUT, Attribute::CrossedOut),
    ];
    for (modifier, attribute) in mapping {
        if modifiers.contains(modifier) {
            content.attributes.set(attribute);
        }
    }
    content
}

// ratatui's "light" colors are crossterm's bright ones.
fn to_term_color(color: Color) -> TermColor {
    match color {
        Color::Reset => TermColor::Reset,
        Color::Black => TermColor::Black,
        Color::Red => TermColor::DarkRed,
        Color::Green => TermColor::DarkGreen,
        Color::Yellow => TermColor::DarkYellow,
        Color::Blue => TermColor::DarkBlue,
        Color::Magenta => TermColor::DarkMagenta,
        Color::Cyan => TermColor::DarkCyan,
        Color::Gray => TermColor::Grey,
        Color::DarkGray => TermColor::DarkGrey,
        Color::LightRed => TermColor::Red,
        Color::LightGreen => TermColor::Green,
        Color::LightYellow => TermColor::Yellow,
        Color::LightBlue => TermColor::Blue,
        Color::LightMagenta => TermColor::Magenta,
        Color::LightCyan => TermColor::Cyan,
        Color::White => TermColor::White,
        Color::Rgb(r, g, b) => TermColor::Rgb { r, g, b },
        Color::Indexed(i) => TermColor::AnsiValue(i),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(source: &str) -> String {
        let mut out = Vec::new();
        write_markdown(&mut out, source).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn strip_ansi(s: &str) -> String {
        let mut plain = String::new();
        let mut chars = s.chars();
        while let Some(c) = chars.next() {
            if c == '\x1b' {
                for c in chars.by_ref() {
                    if c.is_ascii_alphabetic() {
                        break;
                    }
                }
            } else {
                plain.push(c);
            }
        }
        plain
    }

    #[test]
    fn rendered_markdown_keeps_the_words() {
        let out = render("# Hello World\n\nSome **bold** text #golang\n");
        let plain = strip_ansi(&out);

        assert!(plain.contains("Hello World"));
        assert!(plain.contains("bold"));
        assert!(plain.contains("#golang"));
    }

    #[test]
    fn long_paragraphs_wrap_between_words() {
        let words: Vec<String> = (0..40).map(|i| format!("word{i}")).collect();
        let source = format!("# Title\n\n{}\n", words.join(" "));

        let plain = strip_ansi(&render(&source));
        let lines: Vec<&str> = plain.lines().collect();

        assert!(lines.len() > 3, "paragraph should span several lines");
        for line in &lines {
            assert!(line.trim_end().chars().count() <= WRAP_WIDTH, "{line:?}");
        }
        let rejoined: Vec<&str> = plain.split_whitespace().collect();
        for word in &words {
            assert!(rejoined.contains(&word.as_str()), "{word} missing");
        }
    }

    #[test]
    fn overlong_words_are_not_split() {
        let word = "x".repeat(WRAP_WIDTH + 10);
        let plain = strip_ansi(&render(&format!("{word}\n")));
        assert!(plain.lines().any(|l| l.trim() == word));
    }

    #[test]
    fn plain_output_is_verbatim() {
        let mut out = Vec::new();
        write_plain(&mut out, "# Title\n\nbody\n").unwrap();
        assert_eq!(out, b"# Title\n\nbody\n");
    }

    #[test]
    fn styles_map_to_crossterm() {
        let style = Style::default()
            .fg(Color::LightBlue)
            .bg(Color::Indexed(236))
            .add_modifier(Modifier::BOLD | Modifier::ITALIC);
        let content = to_content_style(style);

        assert_eq!(content.foreground_color, Some(TermColor::Blue));
        assert_eq!(content.background_color, Some(TermColor::AnsiValue(236)));
        assert!(content.attributes.has(Attribute::Bold));
        assert!(content.attributes.has(Attribute::Italic));
        assert!(!content.attributes.has(Attribute::Underlined));
    }
}
