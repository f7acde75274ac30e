//! Lesson pages and editor sample programs.
//!
//! Markdown pages and samples are compiled into the binary. A configured
//! pages directory replaces the built-in markdown with `<dir>/<slug>.md`
//! files read on every request.

use std::path::PathBuf;

use pulldown_cmark::{html, Options, Parser};
use shared::domain::{Lesson, LessonId};
use thiserror::Error;
use tracing::debug;

const PAGES: &[(&str, &str)] = &[
    ("assign", include_str!("../pages/assign.md")),
    ("add", include_str!("../pages/add.md")),
    ("minus", include_str!("../pages/minus.md")),
    ("multiply", include_str!("../pages/multiply.md")),
    ("divide", include_str!("../pages/divide.md")),
    ("if", include_str!("../pages/if.md")),
    ("if-else", include_str!("../pages/if-else.md")),
    ("for", include_str!("../pages/for.md")),
];

const SAMPLES: &[(&str, &str)] = &[
    ("assign", include_str!("../samples/assign.py")),
    ("add", include_str!("../samples/add.py")),
    ("minus", include_str!("../samples/minus.py")),
    ("multiply", include_str!("../samples/multiply.py")),
    ("divide", include_str!("../samples/divide.py")),
    ("if", include_str!("../samples/if.py")),
    ("if-else", include_str!("../samples/if-else.py")),
    ("for", include_str!("../samples/for.py")),
];

#[derive(Debug, Error)]
pub enum LessonError {
    #[error("Page \"{0}\" not found.")]
    UnknownPage(String),
    #[error("Markdown source for page \"{0}\" not found.")]
    MissingSource(String),
}

#[derive(Debug, Clone, Default)]
pub struct LessonLibrary {
    pages_dir: Option<PathBuf>,
}

impl LessonLibrary {
    pub fn embedded() -> Self {
        Self::default()
    }

    pub fn with_pages_dir(pages_dir: Option<PathBuf>) -> Self {
        Self { pages_dir }
    }

    pub async fn markdown(&self, slug: &str) -> Result<(&'static Lesson, String), LessonError> {
        let lesson =
            Lesson::by_slug(slug).ok_or_else(|| LessonError::UnknownPage(slug.to_string()))?;

        let source = match &self.pages_dir {
            Some(dir) => {
                let path = dir.join(format!("{}.md", lesson.slug));
                debug!(path = %path.display(), "reading lesson page");
                tokio::fs::read_to_string(&path).await.ok()
            }
            None => lookup(PAGES, lesson.slug).map(str::to_string),
        };
        let source = source.ok_or_else(|| LessonError::MissingSource(slug.to_string()))?;
        Ok((lesson, source))
    }

    pub fn sample(&self, id: LessonId) -> Option<(&'static Lesson, &'static str)> {
        let lesson = Lesson::by_id(id)?;
        let source = lookup(SAMPLES, lesson.slug)?;
        Some((lesson, source))
    }
}

fn lookup(table: &'static [(&'static str, &'static str)], slug: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(candidate, _)| *candidate == slug)
        .map(|(_, content)| *content)
}

pub fn render_markdown(source: &str) -> String {
    let parser = Parser::new_ext(source, Options::all());
    let mut rendered = String::new();
    html::push_html(&mut rendered, parser);
    rendered
}

#[cfg(test)]
#[path = "tests/lessons_tests.rs"]
mod tests;
