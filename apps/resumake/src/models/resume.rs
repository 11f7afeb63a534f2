//! The résumé record as decoded from a YAML data file.
//!
//! Field lists passed to `record!` are the document-facing contract: only
//! those fields are sanitized and merged. Everything else on a struct is
//! bookkeeping (generated ids, derived URLs and icons).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::merge::{merge_fields, Merge};
use crate::walk::{visit_fields, Walk};

const GITHUB_URL: &str = "https://www.github.com";
const LINKEDIN_URL: &str = "https://www.linkedin.com";

/// Declares the document-facing fields of a record for both traversal and merging.
macro_rules! record {
    ($ty:ident { $($field:ident),* $(,)? }) => {
        visit_fields!($ty { $($field),* });
        merge_fields!($ty { $($field),* });
    };
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resume {
    pub job: Job,
    #[serde(rename = "information")]
    pub info: Info,
    pub education: Vec<School>,
    #[serde(rename = "experience")]
    pub experiences: Vec<Experience>,
    pub projects: Vec<Project>,
    pub skills: Vec<Skill>,
    pub certifications: Vec<Certification>,
    pub custom: Custom,
    pub summary: Summary,
    pub cover_letter: CoverLetter,
}

record!(Resume {
    job,
    info,
    education,
    experiences,
    projects,
    skills,
    certifications,
    custom,
    summary,
    cover_letter,
});

impl Resume {
    /// Fills in bookkeeping fields that are derived from the document data.
    /// Runs before sanitization. Social URLs are built from raw usernames, and
    /// only from usernames that are plain URL path segments.
    pub fn prepare(&mut self) {
        if self.job.uuid.is_empty() {
            self.job.uuid = Uuid::new_v4().to_string();
        }
        for social in &mut self.info.socials {
            social.resolve();
        }
    }
}

/// The position being applied for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Job {
    pub title: String,
    pub company: String,
    pub location: String,
    pub url: String,
    pub uuid: String,
}

record!(Job {
    title,
    company,
    location,
    url,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Info {
    pub name: String,
    pub address: Address,
    pub email: String,
    pub phone: Phone,
    pub socials: Vec<Social>,
}

record!(Info {
    name,
    address,
    email,
    phone,
    socials,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

record!(Address {
    street,
    city,
    state,
    zip,
});

/// A phone number exactly as written in the data file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Phone(pub String);

impl Walk for Phone {
    fn walk_strings<E, F>(&mut self, transform: &mut F) -> Result<(), E>
    where
        F: FnMut(&str) -> Result<String, E>,
    {
        self.0.walk_strings(transform)
    }
}

impl Merge for Phone {
    fn is_unset(&self) -> bool {
        self.0.is_empty()
    }

    fn merge_from(&mut self, source: &Self) {
        self.0.merge_from(&source.0);
    }
}

impl Phone {
    /// Ten-digit numbers render as `(123) 456-7890`; anything else is returned as-is.
    pub fn display(&self) -> String {
        let n = &self.0;
        if n.len() != 10 || !n.bytes().all(|b| b.is_ascii_digit()) {
            return n.clone();
        }
        format!("({}) {}-{}", &n[0..3], &n[3..6], &n[6..])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Social {
    pub platform: String,
    pub username: String,
    #[serde(skip)]
    url: String,
    #[serde(skip)]
    icon: String,
}

record!(Social { platform, username });

impl Social {
    #[cfg(test)]
    pub fn new(platform: impl Into<String>, username: impl Into<String>) -> Self {
        Social {
            platform: platform.into(),
            username: username.into(),
            ..Default::default()
        }
    }

    /// Caches the profile URL and icon macro for known platforms.
    ///
    /// The URL is emitted verbatim into `\\href`, so a username outside
    /// [`is_url_segment`] gets no URL and renders as plain text.
    pub fn resolve(&mut self) {
        let user = self.username.to_lowercase();
        let linkable = is_url_segment(&user);
        let (url, icon) = match self.platform.to_lowercase().as_str() {
            "github" if linkable => (format!("{GITHUB_URL}/{user}"), "\\faGithub"),
            "linkedin" if linkable => (format!("{LINKEDIN_URL}/in/{user}"), "\\faLinkedin"),
            _ => (String::new(), ""),
        };
        self.url = url;
        self.icon = icon.to_string();
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    /// Short human-readable form, e.g. `github.com/jane` or `jane@mastodon`.
    pub fn display(&self) -> String {
        let user = self.username.to_lowercase();
        match self.platform.to_lowercase().as_str() {
            "github" => format!("{}/{user}", strip_www(GITHUB_URL)),
            "linkedin" => format!("{}/in/{user}", strip_www(LINKEDIN_URL)),
            platform => format!("{user}@{platform}"),
        }
    }
}

fn strip_www(url: &str) -> &str {
    url.trim_start_matches("https://www.")
}

/// ASCII letters, digits, `-`, `_` and `.`: inert inside a TeX `\\href` target.
fn is_url_segment(user: &str) -> bool {
    !user.is_empty()
        && user
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
}

/// A date field: either a calendar date (`2022-05-01`) or free text (`Present`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum Date {
    #[default]
    Unset,
    Calendar(NaiveDate),
    Text(String),
}

impl From<Option<String>> for Date {
    fn from(raw: Option<String>) -> Self {
        let Some(raw) = raw else {
            return Date::Unset;
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Date::Unset;
        }
        match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            Ok(date) => Date::Calendar(date),
            Err(_) => Date::Text(title_case(trimmed)),
        }
    }
}

impl From<Date> for Option<String> {
    fn from(date: Date) -> Self {
        match date {
            Date::Unset => None,
            Date::Calendar(d) => Some(d.format("%Y-%m-%d").to_string()),
            Date::Text(t) => Some(t),
        }
    }
}

impl Date {
    /// `Jan 2022` for calendar dates, the text itself otherwise.
    pub fn display(&self) -> String {
        match self {
            Date::Unset => String::new(),
            Date::Calendar(d) => d.format("%b %Y").to_string(),
            Date::Text(t) => t.clone(),
        }
    }

    /// Free-text dates ("Present", "Expected") and future dates count as upcoming.
    pub fn is_upcoming(&self, today: NaiveDate) -> bool {
        match self {
            Date::Unset => false,
            Date::Calendar(d) => *d > today,
            Date::Text(t) => !t.is_empty(),
        }
    }
}

impl Walk for Date {
    fn walk_strings<E, F>(&mut self, transform: &mut F) -> Result<(), E>
    where
        F: FnMut(&str) -> Result<String, E>,
    {
        match self {
            Date::Text(text) => text.walk_strings(transform),
            Date::Unset | Date::Calendar(_) => Ok(()),
        }
    }
}

impl Merge for Date {
    fn is_unset(&self) -> bool {
        match self {
            Date::Unset => true,
            Date::Calendar(_) => false,
            Date::Text(t) => t.is_empty(),
        }
    }

    fn merge_from(&mut self, source: &Self) {
        if !source.is_unset() {
            *self = source.clone();
        }
    }
}

fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct School {
    pub name: String,
    pub start_date: Date,
    pub end_date: Date,
    pub major: String,
    pub minor: String,
    pub location: String,
}

record!(School {
    name,
    start_date,
    end_date,
    major,
    minor,
    location,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    pub company: String,
    pub title: String,
    pub start_date: Date,
    pub end_date: Date,
    pub location: String,
    pub description: Vec<String>,
}

record!(Experience {
    company,
    title,
    start_date,
    end_date,
    location,
    description,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub name: String,
    pub description: String,
    pub technologies: Vec<String>,
}

record!(Project {
    name,
    description,
    technologies,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Skill {
    pub name: String,
    pub keywords: Vec<String>,
}

record!(Skill { name, keywords });

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Certification {
    pub name: String,
    pub issuing_org: String,
    pub url: String,
    pub issue_date: Date,
    pub expiration_date: Date,
}

record!(Certification {
    name,
    issuing_org,
    url,
    issue_date,
    expiration_date,
});

/// Free-form section (hobbies, languages, volunteering).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Custom {
    pub title: String,
    pub description: String,
    pub body: Vec<String>,
}

record!(Custom {
    title,
    description,
    body,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Summary {
    pub title: String,
    pub body: String,
}

record!(Summary { title, body });

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverLetter {
    pub name: String,
    pub company: String,
    pub title: String,
    pub address: Address,
    pub greeting: String,
    pub body: String,
}

record!(CoverLetter {
    name,
    company,
    title,
    address,
    greeting,
    body,
});
