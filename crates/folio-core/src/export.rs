use crate::{
    models::MetricsState,
    surface::{Card, Surface},
    Error, Result,
};
use std::path::Path;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Html,
    Json,
    Markdown,
}

impl ExportFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "html" | "htm" => Some(ExportFormat::Html),
            "json" => Some(ExportFormat::Json),
            "md" | "markdown" => Some(ExportFormat::Markdown),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Html => "html",
            ExportFormat::Json => "json",
            ExportFormat::Markdown => "md",
        }
    }
}

/// Knobs for file exports
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub title: String,
    /// HTML only: complete document instead of the bare section
    pub full_document: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            title: "Projects".to_string(),
            full_document: true,
        }
    }
}

/// Serializes a display surface
pub struct Exporter;

impl Exporter {
    /// Export with the format picked from the file extension
    pub fn export_to_file<P: AsRef<Path>>(
        surface: &Surface,
        path: P,
        options: &ExportOptions,
    ) -> Result<ExportFormat> {
        let path = path.as_ref();

        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(ExportFormat::from_extension)
            .ok_or_else(|| {
                Error::ExportError(
                    "Could not determine export format from extension. Use .html, .json, or .md"
                        .to_string(),
                )
            })?;

        Self::export_to_file_with_format(surface, path, format, options)?;
        Ok(format)
    }

    pub fn export_to_file_with_format<P: AsRef<Path>>(
        surface: &Surface,
        path: P,
        format: ExportFormat,
        options: &ExportOptions,
    ) -> Result<()> {
        let content = match format {
            ExportFormat::Html if options.full_document => {
                Self::to_html_document(surface, &options.title)
            }
            ExportFormat::Html => Self::to_html_fragment(surface),
            ExportFormat::Json => Self::to_json(surface)?,
            ExportFormat::Markdown => Self::to_markdown(surface, &options.title),
        };

        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::ExportError(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        std::fs::write(path, content)
            .map_err(|e| Error::ExportError(format!("Failed to write {}: {}", path.display(), e)))
    }

    /// Cards with their metrics state, as JSON
    pub fn to_json(surface: &Surface) -> Result<String> {
        Ok(serde_json::to_string_pretty(surface.cards())?)
    }

    /// The project section: loading indicator, error panel and card container
    pub fn to_html_fragment(surface: &Surface) -> String {
        let mut out = String::new();
        out.push_str("<section id=\"projects\" class=\"projects\">\n");

        if surface.has_loading_indicator() {
            out.push_str(&format!(
                "  <div id=\"projects-loading\" class=\"loading-indicator\"{}>Loading projects...</div>\n",
                hidden_attr(!surface.is_loading())
            ));
        }

        if let Some(panel) = surface.error_panel() {
            out.push_str("  <div class=\"projects-error\" role=\"alert\">\n");
            out.push_str(&format!("    <p>{}</p>\n", escape_html(&panel.message)));
            out.push_str(&format!(
                "    <button type=\"button\" class=\"reload-button\" onclick=\"window.location.reload()\">{}</button>\n",
                escape_html(&panel.action_label)
            ));
            out.push_str("  </div>\n");
        }

        out.push_str(&format!(
            "  <div id=\"{}\" class=\"projects-grid\">\n",
            escape_html(surface.container_id())
        ));
        for card in surface.cards() {
            let revealed = surface.reveal_watcher().is_revealed(&card.element_id);
            Self::card_html(&mut out, card, revealed);
        }
        out.push_str("  </div>\n");
        out.push_str("</section>\n");

        out
    }

    /// Minimal standalone page around the project section
    pub fn to_html_document(surface: &Surface, title: &str) -> String {
        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        out.push_str("<meta charset=\"utf-8\">\n");
        out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
        out.push_str(&format!("<title>{}</title>\n", escape_html(title)));
        out.push_str("</head>\n<body>\n");
        out.push_str(&Self::to_html_fragment(surface));
        out.push_str("</body>\n</html>\n");
        out
    }

    fn card_html(out: &mut String, card: &Card, revealed: bool) {
        out.push_str(&format!(
            "    <article class=\"project-card\" id=\"{}\" data-reveal=\"{}\">\n",
            escape_html(&card.element_id),
            if revealed { "revealed" } else { "pending" }
        ));

        let image = &card.image;
        out.push_str(&format!(
            "      <div class=\"project-image\"><img src=\"{}\" alt=\"{}\"{} data-state=\"{}\" \
             onload=\"this.dataset.state='loaded'\" onerror=\"this.dataset.state='error'\"></div>\n",
            escape_html(&image.src),
            escape_html(&image.alt),
            if image.lazy { " loading=\"lazy\"" } else { "" },
            image.state.as_str()
        ));

        out.push_str("      <div class=\"project-content\">\n");
        out.push_str(&format!(
            "        <div class=\"project-header\"><h3 class=\"project-title\">{}</h3>\
             <span class=\"status-badge {}\">{}</span></div>\n",
            escape_html(&card.title),
            escape_html(&card.status_class),
            escape_html(&card.status_label)
        ));
        out.push_str(&format!(
            "        <p class=\"project-description\">{}</p>\n",
            escape_html(&card.description)
        ));

        if !card.technologies.is_empty() {
            out.push_str("        <ul class=\"project-tech\">");
            for tech in &card.technologies {
                out.push_str(&format!("<li class=\"tech-tag\">{}</li>", escape_html(tech)));
            }
            out.push_str("</ul>\n");
        }

        let stats = &card.stats;
        out.push_str(&format!(
            "        <div class=\"project-stats\" id=\"{}\"{}>\
             <span class=\"stat\">Stars <span id=\"{}\">{}</span></span> \
             <span class=\"stat\">Forks <span id=\"{}\">{}</span></span></div>\n",
            escape_html(&stats.section_id),
            hidden_attr(stats.is_hidden()),
            escape_html(&stats.stars_id),
            escape_html(&stats.stars_text()),
            escape_html(&stats.forks_id),
            escape_html(&stats.forks_text())
        ));

        if card.source_url.is_some() || card.demo_url.is_some() {
            out.push_str("        <div class=\"project-links\">");
            if let Some(url) = &card.source_url {
                out.push_str(&format!(
                    "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">Code</a>",
                    escape_html(url)
                ));
            }
            if let Some(url) = &card.demo_url {
                out.push_str(&format!(
                    "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">Live Demo</a>",
                    escape_html(url)
                ));
            }
            out.push_str("</div>\n");
        }

        out.push_str("      </div>\n");
        out.push_str("    </article>\n");
    }

    /// Markdown listing of the cards; counts only appear once they are known
    pub fn to_markdown(surface: &Surface, title: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!("# {}\n\n", title));

        if let Some(panel) = surface.error_panel() {
            output.push_str(&format!("> {}\n", panel.message));
            return output;
        }

        output.push_str(&format!("Total projects: {}\n\n", surface.cards().len()));
        output.push_str("---\n\n");

        for card in surface.cards() {
            match &card.source_url {
                Some(url) => output.push_str(&format!("## [{}]({})\n\n", card.title, url)),
                None => output.push_str(&format!("## {}\n\n", card.title)),
            }

            output.push_str(&format!("**Status:** {}\n\n", card.status_label));
            output.push_str(&format!("{}\n\n", card.description));

            if let MetricsState::Shown(m) = card.stats.state {
                output.push_str("| Metric | Value |\n");
                output.push_str("|--------|-------|\n");
                output.push_str(&format!("| Stars | {} |\n", m.stars));
                output.push_str(&format!("| Forks | {} |\n\n", m.forks));
            }

            if !card.technologies.is_empty() {
                output.push_str("**Technologies:** ");
                for (i, tech) in card.technologies.iter().enumerate() {
                    if i > 0 {
                        output.push_str(", ");
                    }
                    output.push_str(&format!("`{}`", tech));
                }
                output.push_str("\n\n");
            }

            if let Some(demo) = &card.demo_url {
                output.push_str(&format!("[Live demo]({})\n\n", demo));
            }

            output.push_str("---\n\n");
        }

        output
    }
}

fn hidden_attr(hidden: bool) -> &'static str {
    if hidden {
        " hidden"
    } else {
        ""
    }
}

/// Escape text for element content and double-quoted attributes
fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
