use std::path::PathBuf;

use clap::Parser;

use crate::config::{Config, DEFAULT_CONFIG_FILE};

#[derive(Parser, Debug)]
#[command(
    name = "resumake",
    version,
    about = "Render a YAML résumé into TeX through liquid templates"
)]
pub struct Cli {
    /// The résumé YAML file for this application
    pub resume: PathBuf,

    #[arg(
        short = 'b',
        long,
        help = "Résumé used as a basis for missing information"
    )]
    pub base: Option<String>,

    #[arg(long, help = "Directory containing the .tmpl templates")]
    pub template: Option<String>,

    #[arg(long, help = "Directory where TeX files are written")]
    pub tex: Option<String>,

    #[arg(long, help = "Résumé output file name (\"default\" derives it)")]
    pub pdf: Option<String>,

    #[arg(long, help = "Cover letter output file name (\"default\" derives it)")]
    pub cover_file: Option<String>,

    #[arg(
        short = 'o',
        long,
        help = "Section order: [e]ducation e[x]perience [p]rojects [s]kills [c]ertifications cus[t]om su[m]mary, or all"
    )]
    pub order: Option<String>,

    #[arg(short = 'c', long, default_value_t = false, help = "Also render the cover letter")]
    pub cover: bool,

    #[arg(short = 'l', long, help = "Log level: debug, info, warn, error")]
    pub log_level: Option<String>,

    #[arg(long, default_value = DEFAULT_CONFIG_FILE, help = "Configuration file")]
    pub config_file: PathBuf,

    #[arg(short = 'f', long, default_value_t = false, help = "Overwrite existing TeX files")]
    pub force: bool,

    #[arg(
        long,
        default_value_t = false,
        help = "Print the sanitized résumé as JSON instead of rendering"
    )]
    pub print: bool,
}

impl Cli {
    /// The configuration layer set on the command line.
    pub fn overrides(&self) -> Config {
        Config {
            base: self.base.clone().unwrap_or_default(),
            template: self.template.clone().unwrap_or_default(),
            tex: self.tex.clone().unwrap_or_default(),
            pdf: self.pdf.clone().unwrap_or_default(),
            cover_file: self.cover_file.clone().unwrap_or_default(),
            order: self.order.clone().unwrap_or_default(),
            cover: self.cover,
            log_level: self.log_level.clone().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "resumake", "acme.yml", "-b", "base.yml", "-o", "xes", "-c", "-f",
        ])
        .unwrap();
        assert_eq!(cli.resume, PathBuf::from("acme.yml"));
        assert!(cli.force);
        let layer = cli.overrides();
        assert_eq!(layer.base, "base.yml");
        assert_eq!(layer.order, "xes");
        assert!(layer.cover);
        assert_eq!(layer.tex, "");
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["resumake", "acme.yml"]).unwrap();
        assert_eq!(cli.config_file, PathBuf::from(DEFAULT_CONFIG_FILE));
        assert!(!cli.print);
        assert_eq!(cli.overrides(), Config::default());
    }

    #[test]
    fn test_only_tex_output_flags() {
        // PDFs are never compiled, so there is no PDF directory to set.
        assert!(Cli::try_parse_from(["resumake", "acme.yml", "--pdf-dir", "out"]).is_err());
        let cli = Cli::try_parse_from(["resumake", "acme.yml", "--pdf", "jane", "--tex", "out"])
            .unwrap();
        assert_eq!(cli.overrides().pdf, "jane");
        assert_eq!(cli.overrides().tex, "out");
    }

    #[test]
    fn test_resume_required() {
        assert!(Cli::try_parse_from(["resumake"]).is_err());
    }
}
