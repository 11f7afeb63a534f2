// Template rendering: liquid globals from a sanitized record, section
// assembly, and .tex output. Compilation to PDF happens outside this tool.

pub mod context;
pub mod order;
pub mod output;
pub mod templates;

pub use context::DocumentView;
pub use order::parse_order;
pub use output::write_tex;
pub use templates::TemplateSet;
