//! Loads `*.tmpl` liquid templates from a directory and assembles documents.
//!
//! A résumé is `header` + one template per section in the configured order +
//! `footer`. A cover letter is the single `cover` template.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::errors::AppError;
use crate::render::order::Section;

pub const TEMPLATE_EXTENSION: &str = "tmpl";

pub struct TemplateSet {
    parser: liquid::Parser,
    sources: HashMap<String, String>,
}

impl TemplateSet {
    /// Reads every `*.tmpl` file in `dir`, keyed by file stem.
    pub fn load(dir: &Path) -> Result<Self, AppError> {
        let mut sources = HashMap::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(TEMPLATE_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            debug!("Loaded template {}", path.display());
            sources.insert(stem.to_string(), fs::read_to_string(&path)?);
        }

        if sources.is_empty() {
            return Err(AppError::Template(format!(
                "no .{TEMPLATE_EXTENSION} files found in {}",
                dir.display()
            )));
        }
        info!("Parsed {} templates from {}", sources.len(), dir.display());

        Self::from_sources(sources)
    }

    pub fn from_sources(sources: HashMap<String, String>) -> Result<Self, AppError> {
        let parser = liquid::ParserBuilder::with_stdlib()
            .build()
            .map_err(|e| AppError::Template(e.to_string()))?;
        Ok(TemplateSet { parser, sources })
    }

    /// Renders one named template.
    pub fn render(&self, name: &str, globals: &liquid::Object) -> Result<String, AppError> {
        let source = self.sources.get(name).ok_or_else(|| {
            AppError::Template(format!("missing template '{name}.{TEMPLATE_EXTENSION}'"))
        })?;
        let template = self
            .parser
            .parse(source)
            .map_err(|e| AppError::Template(format!("{name}: {e}")))?;
        template
            .render(globals)
            .map_err(|e| AppError::Template(format!("{name}: {e}")))
    }

    /// Renders header, the given sections in order, and footer into one document.
    pub fn render_resume(
        &self,
        sections: &[Section],
        globals: &liquid::Object,
    ) -> Result<String, AppError> {
        let mut out = self.render("header", globals)?;
        for section in sections {
            out.push_str(&self.render(section.template_name(), globals)?);
        }
        out.push_str(&self.render("footer", globals)?);
        info!("Rendered header, {} sections and footer", sections.len());
        Ok(out)
    }

    pub fn render_cover(&self, globals: &liquid::Object) -> Result<String, AppError> {
        self.render("cover", globals)
    }
}
