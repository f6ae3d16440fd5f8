//! Markdown rendering with syntax highlighting.
//!
//! Uses comrak for CommonMark parsing and syntect for code highlighting.
//! Finished messages are cached; partial text from a message still being
//! streamed is rendered fresh every time.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt::Write;
use std::sync::Arc;

use comrak::options::Plugins;
use comrak::plugins::syntect::SyntectAdapter;
use comrak::{Options, markdown_to_html_with_plugins};
use once_cell::sync::Lazy;
use tokio::sync::RwLock;

use crate::session::StoredSession;

// Syntect adapter for code highlighting - initialized once
static SYNTECT_ADAPTER: Lazy<SyntectAdapter> =
    Lazy::new(|| SyntectAdapter::new(Some("base16-ocean.dark")));

static RENDER_CACHE: Lazy<Arc<RwLock<MarkdownCache>>> =
    Lazy::new(|| Arc::new(RwLock::new(MarkdownCache::new(500))));

struct MarkdownCache {
    entries: HashMap<u64, (String, std::time::Instant)>,
    max_entries: usize,
}

impl MarkdownCache {
    fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            max_entries,
        }
    }

    fn get(&self, hash: u64) -> Option<String> {
        self.entries.get(&hash).map(|(html, _)| html.clone())
    }

    fn insert(&mut self, hash: u64, html: String) {
        if self.entries.len() >= self.max_entries {
            // Evict the oldest quarter
            let mut entries: Vec<_> = self.entries.iter().map(|(k, (_, t))| (*k, *t)).collect();
            entries.sort_by(|a, b| a.1.cmp(&b.1));

            for (key, _) in entries.into_iter().take(self.max_entries / 4) {
                self.entries.remove(&key);
            }
        }

        self.entries
            .insert(hash, (html, std::time::Instant::now()));
    }
}

fn hash_content(content: &str) -> u64 {
    use std::hash::{Hash, Hasher};
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    content.hash(&mut hasher);
    hasher.finish()
}

/// Render markdown to HTML with syntax highlighting.
///
/// Repeated calls with the same content return cached HTML.
pub async fn render_markdown(content: &str) -> String {
    let hash = hash_content(content);

    {
        let cache = RENDER_CACHE.read().await;
        if let Some(html) = cache.get(hash) {
            return html;
        }
    }

    let html = render_blocking(content.to_string()).await;

    {
        let mut cache = RENDER_CACHE.write().await;
        cache.insert(hash, html.clone());
    }

    html
}

/// Render the text of a message that is still streaming.
///
/// An unterminated code fence is closed first so the partial text renders
/// the same way it will once the rest arrives.
pub async fn render_streaming(partial: &str) -> String {
    render_blocking(close_open_fence(partial).into_owned()).await
}

/// Append a closing fence if `partial` ends inside a fenced code block.
pub fn close_open_fence(partial: &str) -> Cow<'_, str> {
    let mut open: Option<(char, usize)> = None;

    for line in partial.lines() {
        let trimmed = line.trim_start();
        let Some(marker) = trimmed.chars().next().filter(|c| *c == '`' || *c == '~') else {
            continue;
        };
        let run = trimmed.chars().take_while(|c| *c == marker).count();
        if run < 3 {
            continue;
        }

        match open {
            None => open = Some((marker, run)),
            Some((open_marker, open_run)) => {
                let closes = marker == open_marker
                    && run >= open_run
                    && trimmed[run * marker.len_utf8()..].trim().is_empty();
                if closes {
                    open = None;
                }
            }
        }
    }

    match open {
        None => Cow::Borrowed(partial),
        Some((marker, run)) => {
            let mut closed = partial.to_string();
            if !closed.ends_with('\n') {
                closed.push('\n');
            }
            closed.extend(std::iter::repeat_n(marker, run));
            closed.push('\n');
            Cow::Owned(closed)
        }
    }
}

/// Render a stored session as a standalone HTML document.
///
/// Follows the chat display rules: an assistant message carrying structured
/// advice shows the advice instead of its raw text.
pub async fn render_transcript(session: &StoredSession) -> String {
    let mut body = String::new();

    for message in &session.messages {
        let class = message.author();
        if message.shows_content() {
            let html = if message.is_streaming() {
                render_streaming(&message.content).await
            } else {
                render_markdown(&message.content).await
            };
            let _ = writeln!(body, "<section class=\"message {class}\">\n{html}</section>");
        }
        if let Some(ref advice) = message.advice {
            let html = render_markdown(&advice.to_markdown()).await;
            let _ = writeln!(body, "<section class=\"advice\">\n{html}</section>");
        }
    }

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Session {}</title>\n</head>\n<body>\n\
         <header><p>{}</p></header>\n{}</body>\n</html>\n",
        html_escape(&session.session_id),
        html_escape(&session.location_data.location_string),
        body
    )
}

/// Render off the async runtime (comrak/syntect are not async).
async fn render_blocking(content: String) -> String {
    let fallback = format!("<pre>{}</pre>", html_escape(&content));
    tokio::task::spawn_blocking(move || render_markdown_sync(&content))
        .await
        .unwrap_or(fallback)
}

fn render_markdown_sync(content: &str) -> String {
    let mut options = Options::default();
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.render.escape = true;

    let mut plugins = Plugins::default();
    plugins.render.codefence_syntax_highlighter = Some(&*SYNTECT_ADAPTER);

    markdown_to_html_with_plugins(content, &options, &plugins)
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
