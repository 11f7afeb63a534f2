//! Builds the liquid globals for a sanitized résumé.
//!
//! Templates see the record's own fields plus display-ready helpers:
//! `information.phone` is formatted, every date is `{ text, upcoming }`,
//! every social carries `url`, `display` and `icon`, and `today` is the
//! render date as `YYYY-MM-DD`.

use chrono::NaiveDate;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::resume::{
    Address, Certification, CoverLetter, Custom, Date, Experience, Info, Job, Project, Resume,
    School, Skill, Social, Summary,
};

#[derive(Debug, Serialize)]
pub struct DocumentView<'a> {
    pub job: &'a Job,
    pub information: InfoView<'a>,
    pub education: Vec<SchoolView<'a>>,
    pub experience: Vec<ExperienceView<'a>>,
    pub projects: &'a [Project],
    pub skills: &'a [Skill],
    pub certifications: Vec<CertificationView<'a>>,
    pub custom: &'a Custom,
    pub summary: &'a Summary,
    pub cover_letter: &'a CoverLetter,
    pub today: String,
}

#[derive(Debug, Serialize)]
pub struct InfoView<'a> {
    pub name: &'a str,
    pub address: &'a Address,
    pub email: &'a str,
    pub phone: String,
    pub socials: Vec<SocialView<'a>>,
}

#[derive(Debug, Serialize)]
pub struct SocialView<'a> {
    pub platform: &'a str,
    pub username: &'a str,
    pub url: &'a str,
    pub display: String,
    pub icon: &'a str,
}

#[derive(Debug, Serialize)]
pub struct DateView {
    pub text: String,
    pub upcoming: bool,
}

#[derive(Debug, Serialize)]
pub struct SchoolView<'a> {
    pub name: &'a str,
    pub major: &'a str,
    pub minor: &'a str,
    pub location: &'a str,
    pub start_date: DateView,
    pub end_date: DateView,
}

#[derive(Debug, Serialize)]
pub struct ExperienceView<'a> {
    pub company: &'a str,
    pub title: &'a str,
    pub location: &'a str,
    pub description: &'a [String],
    pub start_date: DateView,
    pub end_date: DateView,
}

#[derive(Debug, Serialize)]
pub struct CertificationView<'a> {
    pub name: &'a str,
    pub issuing_org: &'a str,
    pub url: &'a str,
    pub issue_date: DateView,
    pub expiration_date: DateView,
}

impl<'a> DocumentView<'a> {
    pub fn new(resume: &'a Resume, today: NaiveDate) -> Self {
        DocumentView {
            job: &resume.job,
            information: info_view(&resume.info),
            education: resume
                .education
                .iter()
                .map(|s| school_view(s, today))
                .collect(),
            experience: resume
                .experiences
                .iter()
                .map(|e| experience_view(e, today))
                .collect(),
            projects: &resume.projects,
            skills: &resume.skills,
            certifications: resume
                .certifications
                .iter()
                .map(|c| certification_view(c, today))
                .collect(),
            custom: &resume.custom,
            summary: &resume.summary,
            cover_letter: &resume.cover_letter,
            today: today.format("%Y-%m-%d").to_string(),
        }
    }

    /// Converts the view into liquid globals.
    pub fn to_globals(&self) -> Result<liquid::Object, AppError> {
        liquid::to_object(self).map_err(|e| AppError::Template(e.to_string()))
    }
}

fn info_view(info: &Info) -> InfoView<'_> {
    InfoView {
        name: &info.name,
        address: &info.address,
        email: &info.email,
        phone: info.phone.display(),
        socials: info.socials.iter().map(social_view).collect(),
    }
}

fn social_view(social: &Social) -> SocialView<'_> {
    SocialView {
        platform: &social.platform,
        username: &social.username,
        url: social.url(),
        display: social.display(),
        icon: social.icon(),
    }
}

fn date_view(date: &Date, today: NaiveDate) -> DateView {
    DateView {
        text: date.display(),
        upcoming: date.is_upcoming(today),
    }
}

fn school_view(school: &School, today: NaiveDate) -> SchoolView<'_> {
    SchoolView {
        name: &school.name,
        major: &school.major,
        minor: &school.minor,
        location: &school.location,
        start_date: date_view(&school.start_date, today),
        end_date: date_view(&school.end_date, today),
    }
}

fn experience_view(exp: &Experience, today: NaiveDate) -> ExperienceView<'_> {
    ExperienceView {
        company: &exp.company,
        title: &exp.title,
        location: &exp.location,
        description: &exp.description,
        start_date: date_view(&exp.start_date, today),
        end_date: date_view(&exp.end_date, today),
    }
}

fn certification_view(cert: &Certification, today: NaiveDate) -> CertificationView<'_> {
    CertificationView {
        name: &cert.name,
        issuing_org: &cert.issuing_org,
        url: &cert.url,
        issue_date: date_view(&cert.issue_date, today),
        expiration_date: date_view(&cert.expiration_date, today),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::Phone;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn test_view_formats_helpers() {
        let mut resume = Resume::default();
        resume.info.name = "Jane Doe".to_string();
        resume.info.phone = Phone("5551234567".to_string());
        resume.info.socials.push(Social::new("github", "jdoe"));
        resume.prepare();
        resume.experiences.push(Experience {
            company: "Acme".to_string(),
            start_date: Date::Calendar(NaiveDate::from_ymd_opt(2020, 1, 15).unwrap()),
            end_date: Date::Text("Present".to_string()),
            ..Default::default()
        });

        let view = DocumentView::new(&resume, today());
        assert_eq!(view.information.phone, "(555) 123-4567");
        assert_eq!(view.information.socials[0].url, "https://www.github.com/jdoe");
        assert_eq!(view.information.socials[0].display, "github.com/jdoe");
        assert_eq!(view.experience[0].start_date.text, "Jan 2020");
        assert!(!view.experience[0].start_date.upcoming);
        assert!(view.experience[0].end_date.upcoming);
        assert_eq!(view.today, "2024-03-01");
    }

    #[test]
    fn test_globals_contain_sections() {
        let mut resume = Resume::default();
        resume.summary.body = "Builder".to_string();
        let globals = DocumentView::new(&resume, today()).to_globals().unwrap();
        assert!(globals.contains_key("summary"));
        assert!(globals.contains_key("information"));
        assert!(globals.contains_key("today"));
    }
}
