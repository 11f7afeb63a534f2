use crate::errors::AppError;

/// A résumé section, selected in the configured order by its letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Education,
    Experience,
    Projects,
    Skills,
    Certifications,
    Custom,
    Summary,
}

/// Canonical order used when the order is `all`.
pub const ALL_SECTIONS: &[Section] = &[
    Section::Education,
    Section::Experience,
    Section::Projects,
    Section::Skills,
    Section::Certifications,
    Section::Custom,
    Section::Summary,
];

impl Section {
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_lowercase() {
            'e' => Some(Section::Education),
            'x' => Some(Section::Experience),
            'p' => Some(Section::Projects),
            's' => Some(Section::Skills),
            'c' => Some(Section::Certifications),
            't' => Some(Section::Custom),
            'm' => Some(Section::Summary),
            _ => None,
        }
    }

    pub fn letter(&self) -> char {
        match self {
            Section::Education => 'e',
            Section::Experience => 'x',
            Section::Projects => 'p',
            Section::Skills => 's',
            Section::Certifications => 'c',
            Section::Custom => 't',
            Section::Summary => 'm',
        }
    }

    /// Template file stem for this section.
    pub fn template_name(&self) -> &'static str {
        match self {
            Section::Education => "education",
            Section::Experience => "experience",
            Section::Projects => "projects",
            Section::Skills => "skills",
            Section::Certifications => "certifications",
            Section::Custom => "custom",
            Section::Summary => "summary",
        }
    }
}

/// Parses an order string such as `mxes` or `all` into sections.
///
/// Duplicate letters are kept: the section is rendered twice, as requested.
pub fn parse_order(order: &str) -> Result<Vec<Section>, AppError> {
    let order = order.trim().to_lowercase();
    match order.as_str() {
        "all" => return Ok(ALL_SECTIONS.to_vec()),
        "" | "none" => {
            let legend: String = ALL_SECTIONS
                .iter()
                .map(|s| format!("[{}]{}", s.letter(), s.template_name()))
                .collect::<Vec<_>>()
                .join(" ");
            return Err(AppError::Config(format!(
                "no section order configured; pass --order using {legend}"
            )));
        }
        _ => {}
    }

    order
        .chars()
        .map(|c| {
            Section::from_letter(c)
                .ok_or_else(|| AppError::Config(format!("unknown section letter '{c}' in order")))
        })
        .collect()
}
