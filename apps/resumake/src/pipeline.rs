//! Render pipeline: load, merge, sanitize, render, write.
//!
//! The record is decoded fresh on every run and sanitized exactly once.
//! Sanitization happens before any template sees the data; a `SecurityRisk`
//! aborts the run before a single byte of TeX is written.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_yaml_ng::{Mapping, Value};
use tracing::{debug, info, warn};

use crate::config::{Config, DEFAULT_FILE_NAME};
use crate::errors::AppError;
use crate::merge::merge_documents;
use crate::models::resume::Resume;
use crate::render::{parse_order, write_tex, DocumentView, TemplateSet};
use crate::sanitize::sanitize;
use crate::walk::walk;

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub force: bool,
    pub print: bool,
}

#[derive(Debug)]
pub enum Outcome {
    /// The sanitized record as pretty JSON (`--print`).
    Printed(String),
    /// TeX files written, résumé first.
    Written(Vec<PathBuf>),
}

/// Reads a YAML document. An empty file is an empty mapping.
pub fn read_document(path: &Path) -> Result<Value, AppError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("could not read {}: {e}", path.display())))?;
    let value: Value = serde_yaml_ng::from_str(&raw)?;
    Ok(match value {
        Value::Null => Value::Mapping(Mapping::new()),
        other => other,
    })
}

/// Decodes the résumé at `primary`, with `base` filling whatever it leaves empty.
pub fn load_resume(primary: &Path, base: Option<&Path>) -> Result<Resume, AppError> {
    let primary_doc = read_document(primary)?;
    let document = match base {
        Some(base_path) => {
            let mut merged = read_document(base_path)?;
            merge_documents(&mut merged, &primary_doc)?;
            info!(
                "Merged {} over base {}",
                primary.display(),
                base_path.display()
            );
            merged
        }
        None => {
            warn!("No base resume file provided. Skipping base resume");
            primary_doc
        }
    };

    let mut resume: Resume = serde_yaml_ng::from_value(document)?;
    resume.prepare();
    info!("Parsed resume file: {}", primary.display());
    Ok(resume)
}

/// Escapes every document-facing string in place. Fails on the first rejected leaf.
pub fn sanitize_resume(resume: &mut Resume) -> Result<(), AppError> {
    walk(resume, sanitize)?;
    debug!("Sanitized resume for {}", resume.info.name);
    Ok(())
}

/// Expands `default` output names to `<Name_With_Underscores>_<resume stem>`
/// (and `..._cvr` for the cover letter). Uses the unsanitized name, reduced to
/// a single file-name component.
pub fn output_names(config: &Config, resume_path: &Path, person: &str) -> (String, String) {
    let stem = resume_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = file_name_component(person);
    let derived = if name.is_empty() {
        stem
    } else {
        format!("{name}_{stem}")
    };

    let pdf = if config.pdf == DEFAULT_FILE_NAME {
        derived.clone()
    } else {
        config.pdf.clone()
    };
    let cover = if config.cover_file == DEFAULT_FILE_NAME {
        format!("{derived}_cvr")
    } else {
        config.cover_file.clone()
    };
    (pdf, cover)
}

/// Letters, digits, `_`, `-` and `.` are kept; anything else becomes `_`.
/// Leading dots are dropped, so the result never names a parent or hidden file.
fn file_name_component(person: &str) -> String {
    person
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect::<String>()
        .trim_start_matches('.')
        .to_string()
}

pub fn run(config: &Config, resume_path: &Path, options: RunOptions) -> Result<Outcome, AppError> {
    let mut resume = load_resume(resume_path, config.base_file())?;
    let (pdf_name, cover_name) = output_names(config, resume_path, &resume.info.name);

    sanitize_resume(&mut resume)?;

    if options.print {
        return Ok(Outcome::Printed(serde_json::to_string_pretty(&resume)?));
    }

    let sections = parse_order(&config.order)?;
    let template_dir = Path::new(&config.template);
    if !template_dir.is_dir() {
        return Err(AppError::Config(format!(
            "Template directory does not exist: {}",
            template_dir.display()
        )));
    }
    let templates = TemplateSet::load(template_dir)?;
    let globals = DocumentView::new(&resume, Utc::now().date_naive()).to_globals()?;
    let tex_dir = Path::new(&config.tex);

    let mut written = Vec::new();
    let tex = templates.render_resume(&sections, &globals)?;
    written.push(write_tex(tex_dir, &pdf_name, &tex, options.force)?);

    if config.cover {
        let letter = templates.render_cover(&globals)?;
        written.push(write_tex(tex_dir, &cover_name, &letter, options.force)?);
        info!("Generated cover letter TeX file: {cover_name}");
    }

    Ok(Outcome::Written(written))
}
