//! HTML building blocks shared by every admin page.
//!
//! Everything here returns `String`s of markup. Text that came from users must
//! go through `escape` (the helpers below do that for their text arguments).

use actix_web::{
    http::{header, header::ContentType, StatusCode},
    HttpResponse,
};
use chrono::{DateTime, NaiveDate, Utc};

use crate::auth::AdminContext;
use crate::models::TaskStatus;

pub const SITE_TITLE: &str = "Task Admin";

/// Navigation menu, in display order.
const MENU: [(&str, &str); 5] = [
    ("Dashboard", "/admin/dashboard"),
    ("Admin Users", "/admin/admin_users"),
    ("Comments", "/admin/comments"),
    ("Projects", "/admin/projects"),
    ("Tasks", "/admin/tasks"),
];

const STYLE: &str = "body{font-family:sans-serif;margin:0;background:#f4f4f4;color:#323537}\
#header{background:#5e6469;color:#fff;padding:10px 20px;display:flex;gap:20px;align-items:center}\
#header a{color:#fff;text-decoration:none}#header .current{font-weight:bold}\
#header form{margin-left:auto}\
#main{display:flex;gap:20px;padding:20px}#main_content{flex:1}#sidebar{width:270px}\
.panel,.sidebar_section{background:#fff;border:1px solid #ddd;margin-bottom:20px}\
.panel h3,.sidebar_section h3{margin:0;padding:8px 12px;background:#efefef;font-size:1em}\
.panel_contents{padding:12px}table{width:100%;border-collapse:collapse}\
th,td{text-align:left;padding:6px 8px;border-bottom:1px solid #eee}\
.status_tag{padding:2px 8px;border-radius:3px;color:#fff;font-size:.85em}\
.status_tag.ok{background:#8daa92}.status_tag.error{background:#d45f53}\
.inline-errors{color:#d45f53;margin:4px 0}.flashes{background:#fbe3e4;padding:8px 12px}\
.scopes a{margin-right:12px}.scopes .selected{font-weight:bold}\
.blank_slate{display:block;text-align:center;padding:30px;color:#8a8a8a}";

/// Escapes text for use in element content and quoted attribute values.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
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

/// Percent-encodes a query string component.
pub fn encode_query_component(text: &str) -> String {
    let mut encoded = String::with_capacity(text.len());
    for byte in text.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            b' ' => encoded.push('+'),
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

/// Builds `a=1&b=2` from pairs, skipping empty values.
pub fn query_string(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| {
            format!(
                "{}={}",
                encode_query_component(key),
                encode_query_component(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Wraps page content in the admin layout. `ctx` is `None` on the public
/// login and password pages, which have no menu.
pub fn layout(title: &str, ctx: Option<&AdminContext>, content: &str) -> String {
    let header = match ctx {
        Some(ctx) => {
            let menu: String = MENU
                .iter()
                .map(|(label, href)| {
                    let class = if title == *label { " class=\"current\"" } else { "" };
                    format!("<a href=\"{}\"{}>{}</a>", href, class, label)
                })
                .collect();
            format!(
                "<div id=\"header\"><strong>{}</strong>{}\
                 <form method=\"post\" action=\"/admin/logout\">\
                 <span>{}</span> <button type=\"submit\">Logout</button></form></div>",
                SITE_TITLE,
                menu,
                escape(&ctx.email)
            )
        }
        None => format!("<div id=\"header\"><strong>{}</strong></div>", SITE_TITLE),
    };

    format!(
        "<!doctype html><html><head><meta charset=\"utf-8\">\
         <title>{} | {}</title><style>{}</style></head><body>\
         {}<div id=\"title_bar\" style=\"padding:10px 20px\"><h2>{}</h2></div>\
         {}</body></html>",
        escape(title),
        SITE_TITLE,
        STYLE,
        header,
        escape(title),
        content
    )
}

/// Main column plus an optional sidebar.
pub fn main_with_sidebar(main: &str, sidebar: &str) -> String {
    if sidebar.is_empty() {
        format!("<div id=\"main\"><div id=\"main_content\">{}</div></div>", main)
    } else {
        format!(
            "<div id=\"main\"><div id=\"main_content\">{}</div><div id=\"sidebar\">{}</div></div>",
            main, sidebar
        )
    }
}

pub fn panel(title: &str, contents: &str) -> String {
    format!(
        "<div class=\"panel\"><h3>{}</h3><div class=\"panel_contents\">{}</div></div>",
        escape(title),
        contents
    )
}

pub fn sidebar_section(title: &str, contents: &str) -> String {
    format!(
        "<div class=\"sidebar_section\"><h3>{}</h3><div class=\"panel_contents\">{}</div></div>",
        escape(title),
        contents
    )
}

pub fn blank_slate(message: &str) -> String {
    format!("<span class=\"blank_slate\">{}</span>", escape(message))
}

pub fn link_to(text: &str, href: &str) -> String {
    format!("<a href=\"{}\">{}</a>", escape(href), escape(text))
}

pub fn status_tag(status: TaskStatus) -> String {
    format!(
        "<span class=\"status_tag {}\">{}</span>",
        status.css_class(),
        status.label()
    )
}

/// A button that POSTs to `action`, used for destroy and logout links.
pub fn post_button(label: &str, action: &str, confirm: Option<&str>) -> String {
    let onsubmit = confirm
        .map(|message| format!(" onsubmit=\"return confirm('{}')\"", escape(message)))
        .unwrap_or_default();
    format!(
        "<form method=\"post\" action=\"{}\" style=\"display:inline\"{}>\
         <button type=\"submit\">{}</button></form>",
        escape(action),
        onsubmit,
        escape(label)
    )
}

/// Dates in long form, e.g. `October 05, 2026`; `-` when absent.
pub fn format_date_long(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => date.format("%B %d, %Y").to_string(),
        None => "-".to_string(),
    }
}

/// Timestamps in long form, e.g. `October 05, 2026 14:30`; empty when absent.
pub fn format_datetime_long(at: Option<DateTime<Utc>>) -> String {
    match at {
        Some(at) => at.format("%B %d, %Y %H:%M").to_string(),
        None => String::new(),
    }
}

pub fn page(status: StatusCode, html: String) -> HttpResponse {
    HttpResponse::build(status)
        .content_type(ContentType::html())
        .body(html)
}

pub fn ok(html: String) -> HttpResponse {
    page(StatusCode::OK, html)
}

/// 303 See Other, so a POSTed form is followed by a GET.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location.to_string()))
        .finish()
}

pub fn error_page(status: StatusCode, message: &str) -> HttpResponse {
    let title = status.canonical_reason().unwrap_or("Error");
    let content = main_with_sidebar(
        &panel(
            title,
            &format!(
                "<p>{}</p><p><a href=\"/admin/dashboard\">Back to the dashboard</a></p>",
                escape(message)
            ),
        ),
        "",
    );
    page(status, layout(title, None, &content))
}
