use crate::error::RenderError;
use serde::Serialize;
use site_core::{NowPlayingView, Page, TrackRecord};
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    Page(Page),
    Contact,
    NotFound,
    ServerError,
}

impl Template {
    pub fn name(&self) -> &'static str {
        match self {
            Template::Page(Page::Homepage) => "pages/homepage",
            Template::Page(Page::DomainInfo) => "pages/domain-info",
            Template::Contact => "pages/contact",
            Template::NotFound => "errors/404",
            Template::ServerError => "errors/500",
        }
    }
}

/// Data handed to a template.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageContext {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastfm: Option<NowPlayingView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PageContext {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_lastfm(mut self, view: NowPlayingView) -> Self {
        self.lastfm = Some(view);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

pub trait Renderer: Send + Sync {
    fn render(&self, template: Template, context: &PageContext) -> Result<String, RenderError>;
}

pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
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

/// Built-in HTML pages.
pub struct HtmlRenderer {
    site_name: String,
}

impl HtmlRenderer {
    pub fn new(site_name: impl Into<String>) -> Self {
        Self {
            site_name: site_name.into(),
        }
    }

    fn layout(&self, title: &str, body: &str) -> Result<String, std::fmt::Error> {
        let mut html = String::new();
        writeln!(html, "<!DOCTYPE html>")?;
        writeln!(html, "<html lang=\"en\">")?;
        writeln!(html, "<head>")?;
        writeln!(html, "<meta charset=\"utf-8\">")?;
        writeln!(
            html,
            "<title>{} | {}</title>",
            escape_html(title),
            escape_html(&self.site_name)
        )?;
        writeln!(html, "</head>")?;
        writeln!(html, "<body>")?;
        writeln!(html, "<header><a href=\"/\">{}</a></header>", escape_html(&self.site_name))?;
        writeln!(html, "<main>")?;
        html.push_str(body);
        writeln!(html, "</main>")?;
        writeln!(html, "<footer><a href=\"/site.html\">about this site</a></footer>")?;
        writeln!(html, "</body>")?;
        writeln!(html, "</html>")?;
        Ok(html)
    }

    fn homepage(&self, context: &PageContext) -> Result<String, std::fmt::Error> {
        let mut body = String::new();
        writeln!(body, "<h1>Hello!</h1>")?;

        if let Some(lastfm) = &context.lastfm {
            write_now_playing(&mut body, lastfm)?;
        }

        write_contact_form(&mut body)?;
        self.layout("Home", &body)
    }

    fn domain_info(&self) -> Result<String, std::fmt::Error> {
        let mut body = String::new();
        writeln!(body, "<h1>About this site</h1>")?;
        writeln!(
            body,
            "<p>{} is a small personal site. Listening data comes from Last.fm.</p>",
            escape_html(&self.site_name)
        )?;
        self.layout("About", &body)
    }

    fn contact(&self, context: &PageContext) -> Result<String, std::fmt::Error> {
        let mut body = String::new();
        writeln!(body, "<h1>Contact</h1>")?;
        if let Some(message) = &context.message {
            writeln!(body, "<p class=\"contact-message\">{}</p>", escape_html(message))?;
        }
        write_contact_form(&mut body)?;
        self.layout("Contact", &body)
    }

    fn not_found(&self, context: &PageContext) -> Result<String, std::fmt::Error> {
        let mut body = String::new();
        writeln!(body, "<h1>Page not found</h1>")?;
        writeln!(
            body,
            "<p>Nothing lives at <code>{}</code>.</p>",
            escape_html(&context.path)
        )?;
        self.layout("Not found", &body)
    }

    fn server_error(&self, context: &PageContext) -> Result<String, std::fmt::Error> {
        let mut body = String::new();
        writeln!(body, "<h1>Something went wrong</h1>")?;
        writeln!(
            body,
            "<p>The page <code>{}</code> could not be rendered.</p>",
            escape_html(&context.path)
        )?;
        if let Some(message) = &context.message {
            writeln!(body, "<pre>{}</pre>", escape_html(message))?;
        }
        self.layout("Error", &body)
    }
}

impl Renderer for HtmlRenderer {
    fn render(&self, template: Template, context: &PageContext) -> Result<String, RenderError> {
        let rendered = match template {
            Template::Page(Page::Homepage) => self.homepage(context),
            Template::Page(Page::DomainInfo) => self.domain_info(),
            Template::Contact => self.contact(context),
            Template::NotFound => self.not_found(context),
            Template::ServerError => self.server_error(context),
        };
        rendered.map_err(|e| RenderError::Failed(format!("{}: {}", template.name(), e)))
    }
}

fn write_now_playing(body: &mut String, lastfm: &NowPlayingView) -> std::fmt::Result {
    writeln!(body, "<section class=\"lastfm\">")?;

    if let Some(error) = &lastfm.error {
        writeln!(body, "<p class=\"lastfm-error\">{}</p>", escape_html(error))?;
    }

    if let Some(track) = &lastfm.current_track {
        write!(body, "<p class=\"now-playing\">Now playing: ")?;
        write_track(body, track)?;
        writeln!(body, "</p>")?;
    }

    if !lastfm.last_played.is_empty() {
        writeln!(body, "<h2>Recently played</h2>")?;
        writeln!(body, "<ul class=\"last-played\">")?;
        for track in &lastfm.last_played {
            write!(body, "<li>")?;
            write_track(body, track)?;
            writeln!(body, " <time>{}</time></li>", escape_html(&track.date))?;
        }
        writeln!(body, "</ul>")?;
    }

    writeln!(body, "</section>")
}

fn write_track(body: &mut String, track: &TrackRecord) -> std::fmt::Result {
    write!(
        body,
        "<a href=\"{}\">{}</a> by {}",
        escape_html(&track.song_url),
        escape_html(&track.song),
        escape_html(&track.artist)
    )
}

fn write_contact_form(body: &mut String) -> std::fmt::Result {
    writeln!(body, "<form method=\"post\" action=\"/contact\">")?;
    writeln!(body, "<label>Name <input name=\"name\"></label>")?;
    writeln!(body, "<label>Email <input name=\"email\" type=\"email\"></label>")?;
    writeln!(body, "<label>Message <textarea name=\"message\"></textarea></label>")?;
    writeln!(body, "<button type=\"submit\">Send</button>")?;
    writeln!(body, "</form>")
}
