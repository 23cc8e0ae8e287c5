//! Parser for `.ann` fixture files.
//!
//! ```text
//! # Title
//! // comment
//! Subsemnatul «claimant+selected:Ion Popescu» solicită anularea actului.
//!
//! second paragraph of page one
//! ===
//! first paragraph of page two
//! ~
//! > claimant: <p>Ion Popescu</p>
//! > evidence: !fail
//! @threshold: 0.2
//! ```
//!
//! Blank lines separate paragraphs and `===` separates pages. A line holding
//! only `~` is an empty paragraph. Repeated `> category:` lines for the same
//! category are joined with newlines into one response.

use crate::errors::{SpecError, SpecResult};
use crate::fixture::{AnnFixture, FixturePage, FixtureParagraph, ResponseLine, SpanMark};
use layered_annotate::Category;

const EMPTY_PARAGRAPH: &str = "~";
const FAILED_RESPONSE: &str = "!fail";

fn category(name: &str, line: usize) -> SpecResult<Category> {
    Category::from_name(name.trim()).ok_or_else(|| SpecError::UnknownCategory {
        line,
        name: name.trim().to_string(),
    })
}

/// Parse span markers from text, returning the normalized text and marks.
///
/// Input text may contain `«category+category:text»` markers. Character
/// ranges refer to the normalized (marker-free) text.
pub fn parse_marks(input: &str, line: usize) -> SpecResult<(String, Vec<SpanMark>)> {
    let mut marks = Vec::new();
    let mut normalized = String::new();
    let mut chars = input.chars();

    while let Some(ch) = chars.next() {
        if ch != '«' {
            normalized.push(ch);
            continue;
        }

        let start_normalized = normalized.len();

        let mut label = String::new();
        loop {
            match chars.next() {
                Some(':') => break,
                Some(c) if c.is_alphanumeric() || c == '_' || c == '+' => label.push(c),
                Some(c) => {
                    return Err(SpecError::Parse {
                        line,
                        message: format!(
                            "Invalid span marker: expected category name or ':', found '{}'",
                            c
                        ),
                    });
                }
                None => {
                    return Err(SpecError::Parse {
                        line,
                        message: "Unclosed span marker: expected ':'".to_string(),
                    });
                }
            }
        }

        let categories = label
            .split('+')
            .map(|name| category(name, line))
            .collect::<SpecResult<Vec<_>>>()?;

        let mut text = String::new();
        loop {
            match chars.next() {
                Some('»') => break,
                Some('«') => {
                    return Err(SpecError::Parse {
                        line,
                        message: "Nested span markers are not supported".to_string(),
                    });
                }
                Some(c) => {
                    text.push(c);
                    normalized.push(c);
                }
                None => {
                    return Err(SpecError::Parse {
                        line,
                        message: "Unclosed span marker: expected '»'".to_string(),
                    });
                }
            }
        }

        marks.push(SpanMark {
            categories,
            text,
            char_range: start_normalized..normalized.len(),
        });
    }

    Ok((normalized, marks))
}

#[derive(Default)]
struct PageBuilder {
    paragraphs: Vec<FixtureParagraph>,
    /// Lines of the paragraph being read, with the line number of the first.
    current: Option<(usize, Vec<String>)>,
}

impl PageBuilder {
    fn push_line(&mut self, line_num: usize, line: &str) {
        self.current
            .get_or_insert_with(|| (line_num, Vec::new()))
            .1
            .push(line.trim().to_string());
    }

    fn push_empty(&mut self) -> SpecResult<()> {
        self.finish_paragraph()?;
        let index = self.paragraphs.len();
        self.paragraphs.push(FixtureParagraph {
            index,
            text: String::new(),
            marks: Vec::new(),
        });
        Ok(())
    }

    fn finish_paragraph(&mut self) -> SpecResult<()> {
        if let Some((line_num, lines)) = self.current.take() {
            let (text, marks) = parse_marks(&lines.join(" "), line_num)?;
            let index = self.paragraphs.len();
            self.paragraphs.push(FixtureParagraph { index, text, marks });
        }
        Ok(())
    }

    fn finish(mut self, index: usize) -> SpecResult<FixturePage> {
        self.finish_paragraph()?;
        Ok(FixturePage {
            index,
            paragraphs: self.paragraphs,
        })
    }
}

/// Parse a full `.ann` fixture file.
pub fn parse_fixture(input: &str) -> SpecResult<AnnFixture> {
    let mut fixture = AnnFixture::empty();
    let mut page = PageBuilder::default();

    for (idx, line) in input.lines().enumerate() {
        let line_num = idx + 1;
        let trimmed = line.trim();

        if let Some(title) = trimmed.strip_prefix("# ") {
            if fixture.title.is_none() {
                fixture.title = Some(title.trim().to_string());
            }
        } else if trimmed.starts_with("//") {
            continue;
        } else if trimmed == "===" {
            let index = fixture.pages.len();
            fixture.pages.push(std::mem::take(&mut page).finish(index)?);
        } else if let Some(rest) = trimmed.strip_prefix('>') {
            page.finish_paragraph()?;
            parse_response(rest, line_num, &mut fixture.responses)?;
        } else if let Some(rest) = trimmed.strip_prefix('@') {
            page.finish_paragraph()?;
            parse_directive(rest, line_num, &mut fixture)?;
        } else if trimmed == EMPTY_PARAGRAPH {
            page.push_empty()?;
        } else if trimmed.is_empty() {
            page.finish_paragraph()?;
        } else {
            page.push_line(line_num, trimmed);
        }
    }

    let index = fixture.pages.len();
    let last = page.finish(index)?;
    if !last.paragraphs.is_empty() || fixture.pages.is_empty() {
        fixture.pages.push(last);
    }

    Ok(fixture)
}

/// Parse `category: text` after the leading `>`.
fn parse_response(
    input: &str,
    line_num: usize,
    responses: &mut Vec<ResponseLine>,
) -> SpecResult<()> {
    let colon = input.find(':').ok_or_else(|| SpecError::Parse {
        line: line_num,
        message: format!("Expected 'category: response' after '>': {}", input.trim()),
    })?;
    let category = category(&input[..colon], line_num)?;
    let text = input[colon + 1..].trim();
    let text = if text == FAILED_RESPONSE {
        None
    } else {
        Some(text.to_string())
    };

    match responses.iter_mut().find(|r| r.category == category) {
        Some(existing) => match (&mut existing.text, text) {
            (Some(joined), Some(text)) => {
                joined.push('\n');
                joined.push_str(&text);
            }
            _ => {
                return Err(SpecError::Parse {
                    line: line_num,
                    message: format!("A failed response for {} cannot be combined", category),
                });
            }
        },
        None => responses.push(ResponseLine {
            category,
            text,
            source_line: line_num,
        }),
    }
    Ok(())
}

/// Parse `name: value` after the leading `@`.
fn parse_directive(input: &str, line_num: usize, fixture: &mut AnnFixture) -> SpecResult<()> {
    let (name, value) = input.split_once(':').ok_or_else(|| SpecError::Parse {
        line: line_num,
        message: format!("Expected 'name: value' after '@': {}", input.trim()),
    })?;
    match name.trim() {
        "threshold" => {
            let value: f64 = value.trim().parse().map_err(|_| SpecError::Parse {
                line: line_num,
                message: format!("Invalid threshold '{}': expected number", value.trim()),
            })?;
            fixture.threshold = Some(value);
            Ok(())
        }
        other => Err(SpecError::Parse {
            line: line_num,
            message: format!("Unknown directive '@{}'", other),
        }),
    }
}
