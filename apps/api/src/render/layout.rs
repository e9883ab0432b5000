//! Resume layout. Positions every piece of text on A4 pages.
//!
//! Pure and deterministic: `layout_resume` turns a `Resume` into a list of pages of
//! draw operations in PDF user space (origin bottom-left, units in points). The PDF
//! writer only serializes what this module decides.
//!
//! Sections appear in a fixed order and only when non-empty:
//! header, Summary, Experience, Education, Skills, Projects.

use crate::models::resume::{Education, Experience, Project, Resume};
use crate::render::metrics::{text_width, wrap_text, Face};

pub const PAGE_WIDTH: f32 = 595.0;
pub const PAGE_HEIGHT: f32 = 842.0;
pub const MARGIN: f32 = 40.0;
pub const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

/// Baseline-to-baseline distance as a multiple of the font size.
const LEADING: f32 = 1.4;
const BULLET_INDENT: f32 = 10.0;
/// Space kept free under a section title so it never ends a page alone.
const HEADING_KEEP: f32 = 48.0;

const BLACK: f32 = 0.0;
const DARK: f32 = 0.2;
const MUTED: f32 = 0.4;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        face: Face,
        size: f32,
        gray: f32,
        x: f32,
        y: f32,
        text: String,
    },
    Rule {
        x1: f32,
        x2: f32,
        y: f32,
        width: f32,
        gray: f32,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

/// Lays out a resume. Always returns at least one page.
pub fn layout_resume(resume: &Resume) -> Vec<Page> {
    let mut cursor = Cursor::new();

    header(&mut cursor, resume);

    if let Some(summary) = &resume.summary {
        cursor.section_title("Summary");
        cursor.paragraph(summary, Face::Regular, 10.0, DARK, 0.0);
        cursor.gap(6.0);
    }

    if !resume.experience.is_empty() {
        cursor.section_title("Experience");
        for exp in &resume.experience {
            experience(&mut cursor, exp);
        }
    }

    if !resume.education.is_empty() {
        cursor.section_title("Education");
        for edu in &resume.education {
            education(&mut cursor, edu);
        }
    }

    if !resume.skills.is_empty() {
        cursor.section_title("Skills");
        cursor.paragraph(&resume.skills.join(", "), Face::Regular, 9.0, BLACK, 0.0);
        cursor.gap(6.0);
    }

    if !resume.projects.is_empty() {
        cursor.section_title("Projects");
        for project in &resume.projects {
            project_entry(&mut cursor, project);
        }
    }

    cursor.finish()
}

fn header(cursor: &mut Cursor, resume: &Resume) {
    if let Some(name) = &resume.name {
        cursor.paragraph(name, Face::Bold, 24.0, BLACK, 0.0);
    }

    let contact: Vec<&str> = [
        &resume.email,
        &resume.phone,
        &resume.website,
        &resume.location,
    ]
    .into_iter()
    .filter_map(|f| f.as_deref())
    .collect();
    if !contact.is_empty() {
        cursor.paragraph(&contact.join("   "), Face::Regular, 9.0, DARK, 0.0);
    }

    if resume.name.is_some() || !contact.is_empty() {
        cursor.gap(4.0);
        cursor.rule(2.0, BLACK);
        cursor.gap(10.0);
    }
}

fn experience(cursor: &mut Cursor, exp: &Experience) {
    let dates = exp.date_range();
    let date_width = dates
        .as_deref()
        .map(|d| text_width(d, Face::Oblique, 9.0) + 12.0)
        .unwrap_or(0.0);

    let title_lines = wrap_text(&exp.title, Face::Bold, 11.0, CONTENT_WIDTH - date_width);
    for (i, line) in title_lines.iter().enumerate() {
        cursor.line(line, Face::Bold, 11.0, BLACK, 0.0);
        if i == 0 {
            if let Some(d) = &dates {
                cursor.right_aligned(d, Face::Oblique, 9.0, MUTED);
            }
        }
    }
    if title_lines.is_empty() {
        if let Some(d) = &dates {
            cursor.line(d, Face::Oblique, 9.0, MUTED, 0.0);
        }
    }

    cursor.paragraph(&exp.company, Face::Bold, 10.0, DARK, 0.0);
    if let Some(location) = &exp.location {
        cursor.paragraph(location, Face::Regular, 9.0, MUTED, 0.0);
    }
    if let Some(description) = &exp.description {
        cursor.gap(2.0);
        cursor.paragraph(description, Face::Regular, 9.0, DARK, 0.0);
    }
    for item in exp.responsibilities.iter().flatten() {
        cursor.bullet(item);
    }
    cursor.gap(8.0);
}

fn education(cursor: &mut Cursor, edu: &Education) {
    cursor.paragraph(&edu.degree, Face::Bold, 11.0, BLACK, 0.0);

    let mut line = edu.institution.clone();
    if let Some(location) = &edu.location {
        line.push_str(&format!(", {location}"));
    }
    if let Some(year) = &edu.year {
        line.push_str(&format!(" \u{2022} {year}"));
    }
    cursor.paragraph(&line, Face::Regular, 10.0, DARK, 0.0);

    if let Some(description) = &edu.description {
        cursor.paragraph(description, Face::Regular, 9.0, DARK, 0.0);
    }
    cursor.gap(6.0);
}

fn project_entry(cursor: &mut Cursor, project: &Project) {
    cursor.paragraph(&project.name, Face::Bold, 11.0, BLACK, 0.0);
    if let Some(description) = &project.description {
        cursor.paragraph(description, Face::Regular, 9.0, DARK, 0.0);
    }
    if let Some(tech) = project.technologies.as_ref().filter(|t| !t.is_empty()) {
        let line = format!("Technologies: {}", tech.join(", "));
        cursor.paragraph(&line, Face::Regular, 9.0, DARK, 0.0);
    }
    if let Some(url) = &project.url {
        cursor.paragraph(url, Face::Regular, 9.0, MUTED, 0.0);
    }
    cursor.gap(6.0);
}

/// Top-down writing position across pages.
struct Cursor {
    pages: Vec<Page>,
    current: Page,
    /// Baseline of the last written line.
    y: f32,
}

impl Cursor {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: Page::default(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn new_page(&mut self) {
        let done = std::mem::take(&mut self.current);
        self.pages.push(done);
        self.y = PAGE_HEIGHT - MARGIN;
    }

    fn ensure_space(&mut self, height: f32) {
        if self.y - height < MARGIN && !self.current.ops.is_empty() {
            self.new_page();
        }
    }

    fn gap(&mut self, height: f32) {
        self.y -= height;
    }

    fn line(&mut self, text: &str, face: Face, size: f32, gray: f32, indent: f32) {
        let advance = size * LEADING;
        self.ensure_space(advance);
        self.y -= advance;
        self.current.ops.push(DrawOp::Text {
            face,
            size,
            gray,
            x: MARGIN + indent,
            y: self.y,
            text: text.to_string(),
        });
    }

    /// Draws on the baseline of the last line, flush with the right margin.
    fn right_aligned(&mut self, text: &str, face: Face, size: f32, gray: f32) {
        let x = PAGE_WIDTH - MARGIN - text_width(text, face, size);
        self.current.ops.push(DrawOp::Text {
            face,
            size,
            gray,
            x,
            y: self.y,
            text: text.to_string(),
        });
    }

    fn paragraph(&mut self, text: &str, face: Face, size: f32, gray: f32, indent: f32) {
        for line in wrap_text(text, face, size, CONTENT_WIDTH - indent) {
            self.line(&line, face, size, gray, indent);
        }
    }

    fn bullet(&mut self, text: &str) {
        let lines = wrap_text(text, Face::Regular, 9.0, CONTENT_WIDTH - 2.0 * BULLET_INDENT);
        for (i, line) in lines.iter().enumerate() {
            if i == 0 {
                self.line("\u{2022}", Face::Regular, 9.0, DARK, BULLET_INDENT);
                self.current.ops.push(DrawOp::Text {
                    face: Face::Regular,
                    size: 9.0,
                    gray: DARK,
                    x: MARGIN + 2.0 * BULLET_INDENT,
                    y: self.y,
                    text: line.clone(),
                });
            } else {
                self.line(line, Face::Regular, 9.0, DARK, 2.0 * BULLET_INDENT);
            }
        }
    }

    fn section_title(&mut self, title: &str) {
        self.ensure_space(HEADING_KEEP);
        self.line(&title.to_uppercase(), Face::Bold, 14.0, BLACK, 0.0);
        self.gap(3.0);
        self.rule(1.0, 0.8);
        self.gap(6.0);
    }

    fn rule(&mut self, width: f32, gray: f32) {
        self.current.ops.push(DrawOp::Rule {
            x1: MARGIN,
            x2: PAGE_WIDTH - MARGIN,
            y: self.y,
            width,
            gray,
        });
    }

    fn finish(mut self) -> Vec<Page> {
        if !self.current.ops.is_empty() || self.pages.is_empty() {
            self.new_page();
        }
        self.pages
    }
}
