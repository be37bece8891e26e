//! The scrollable portfolio page shown in front of the background.
//!
//! A page file is plain text: a line starting with `# ` opens a section,
//! every other line belongs to the current section's body.

use thiserror::Error;

use super::element::slug;

#[derive(Debug, Error, PartialEq)]
pub enum PageError {
    #[error("page has no sections")]
    Empty,
    #[error("line {line}: text before the first `# ` heading")]
    TextBeforeSection { line: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub id: String,
    pub title: String,
    pub body: Vec<String>,
}

/// One rendered row of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Heading,
    Body,
    Blank,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageRow {
    pub kind: RowKind,
    pub text: String,
    /// Index of the section this row belongs to.
    pub section: usize,
}

#[derive(Debug, Clone)]
pub struct Page {
    sections: Vec<Section>,
    rows: Vec<PageRow>,
    /// First row of each section.
    starts: Vec<usize>,
}

impl Page {
    pub fn new(sections: Vec<Section>) -> Self {
        let mut rows = Vec::new();
        let mut starts = Vec::with_capacity(sections.len());
        for (i, section) in sections.iter().enumerate() {
            starts.push(rows.len());
            rows.push(PageRow {
                kind: RowKind::Heading,
                text: section.title.clone(),
                section: i,
            });
            rows.push(PageRow {
                kind: RowKind::Blank,
                text: String::new(),
                section: i,
            });
            for line in &section.body {
                let kind = if line.trim().is_empty() {
                    RowKind::Blank
                } else {
                    RowKind::Body
                };
                rows.push(PageRow {
                    kind,
                    text: line.clone(),
                    section: i,
                });
            }
            for _ in 0..3 {
                rows.push(PageRow {
                    kind: RowKind::Blank,
                    text: String::new(),
                    section: i,
                });
            }
        }
        Self {
            sections,
            rows,
            starts,
        }
    }

    pub fn parse(text: &str) -> Result<Self, PageError> {
        let mut sections: Vec<Section> = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            if let Some(title) = line.strip_prefix("# ") {
                let title = title.trim().to_string();
                sections.push(Section {
                    id: slug(&title),
                    title,
                    body: Vec::new(),
                });
                continue;
            }
            match sections.last_mut() {
                Some(section) => section.body.push(line.trim_end().to_string()),
                None if line.trim().is_empty() => {}
                None => return Err(PageError::TextBeforeSection { line: idx + 1 }),
            }
        }
        if sections.is_empty() {
            return Err(PageError::Empty);
        }
        for section in &mut sections {
            while section.body.last().is_some_and(|l| l.is_empty()) {
                section.body.pop();
            }
        }
        Ok(Self::new(sections))
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn rows(&self) -> &[PageRow] {
        &self.rows
    }

    pub fn total_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn section_start(&self, index: usize) -> Option<usize> {
        self.starts.get(index).copied()
    }

    /// Section whose heading is at or above `row`.
    pub fn section_at(&self, row: usize) -> usize {
        self.starts
            .iter()
            .rposition(|&start| start <= row)
            .unwrap_or(0)
    }

    /// Largest useful scroll offset for a viewport of `viewport_rows`.
    pub fn max_offset(&self, viewport_rows: usize) -> usize {
        self.rows.len().saturating_sub(viewport_rows)
    }
}

const DEFAULT_PAGE: &str = include_str!("default_page.txt");

impl Default for Page {
    fn default() -> Self {
        Self::parse(DEFAULT_PAGE).unwrap_or_else(|_| Self::new(Vec::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_page_has_portfolio_sections() {
        let page = Page::default();
        let ids: Vec<&str> = page.sections().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(
            ids,
            [
                "home",
                "about",
                "certifications",
                "speaking",
                "projects",
                "articles",
                "contact",
                "footer"
            ]
        );
        assert!(page.total_rows() > 100);
        assert_eq!(page.sections()[0].body[0], "Alex Morgan");
    }

    #[test]
    fn rows_and_section_starts() {
        let page = Page::parse("# One\na\nb\n\n# Two\nc\n").unwrap();
        assert_eq!(page.section_start(0), Some(0));
        // heading, blank, a, b, 3 trailing blanks
        assert_eq!(page.section_start(1), Some(7));
        assert_eq!(page.rows()[7].kind, RowKind::Heading);
        assert_eq!(page.rows()[2].text, "a");
        assert_eq!(page.section_at(0), 0);
        assert_eq!(page.section_at(6), 0);
        assert_eq!(page.section_at(7), 1);
        assert_eq!(page.section_at(500), 1);
        assert_eq!(page.section_start(2), None);
    }

    #[test]
    fn max_offset_saturates() {
        let page = Page::parse("# One\na\n").unwrap();
        assert_eq!(page.total_rows(), 6);
        assert_eq!(page.max_offset(4), 2);
        assert_eq!(page.max_offset(40), 0);
    }

    #[test]
    fn rejects_text_before_heading() {
        assert_eq!(
            Page::parse("\nhello\n# One\n").unwrap_err(),
            PageError::TextBeforeSection { line: 2 }
        );
        assert_eq!(Page::parse("\n\n").unwrap_err(), PageError::Empty);
    }
}
