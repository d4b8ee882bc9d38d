//! HTML rendering of a [`ViewModel`] into the page template.

use std::fmt::Write;

use crate::engine::FilterControl;
use crate::viewer::{ColumnView, Notice, NoticeKind, Role, ViewModel};

const TEMPLATE: &str = include_str!("./static/viewer.html");

/// Render the whole viewer page
///
/// # Arguments
/// * `view` - Snapshot of the viewer state to draw
/// * `notice` - Optional one-shot message shown above the toolbar
///
/// # Returns
/// * `String` - Complete HTML document
pub fn render_page(view: &ViewModel<'_>, notice: Option<&Notice>) -> String {
    let notice_html = notice.map(render_notice).unwrap_or_default();
    let content = if view.has_data() {
        format!(
            "{}\n{}",
            render_filters(&view.columns),
            render_table(view)
        )
    } else {
        String::new()
    };

    TEMPLATE
        .replace("<!-- NOTICE -->", &notice_html)
        .replace("<!-- TOOLBAR -->", &render_toolbar(view))
        .replace("<!-- CONTENT -->", &content)
}

/// Escape text for use in element content and quoted attribute values.
///
/// # Examples
/// ```
/// use tableview::render::escape_html;
///
/// assert_eq!(escape_html("<a href=\"x\">&</a>"), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
/// ```
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn render_notice(notice: &Notice) -> String {
    let class = match notice.kind {
        NoticeKind::Info => "info",
        NoticeKind::Error => "error",
    };
    format!(
        "<div class=\"notice {}\">{}</div>",
        class,
        escape_html(&notice.text)
    )
}

fn render_toolbar(view: &ViewModel<'_>) -> String {
    let mut html = String::from("<div class=\"toolbar\">\n");

    html.push_str("<form method=\"get\" action=\"/role\">\n<select name=\"role\" onchange=\"this.form.submit()\">\n");
    for role in Role::ALL {
        let _ = writeln!(
            html,
            "<option value=\"{}\"{}>{}</option>",
            role.as_str(),
            selected(role == view.role),
            role.label()
        );
    }
    html.push_str("</select>\n<noscript><button type=\"submit\">Switch</button></noscript>\n</form>\n");

    html.push_str("<form method=\"post\" action=\"/save\"><button type=\"submit\">Save</button></form>\n");
    html.push_str("<form method=\"post\" action=\"/load\"><button type=\"submit\" class=\"secondary\">Load</button></form>\n");

    if view.show_upload {
        html.push_str(
            "<form method=\"post\" action=\"/upload\" enctype=\"multipart/form-data\">\n\
             <input type=\"file\" name=\"file\" accept=\".csv,.tsv,.txt\" onchange=\"this.form.submit()\">\n\
             <noscript><button type=\"submit\">Upload CSV File</button></noscript>\n\
             </form>\n",
        );
    }

    if view.has_data() {
        html.push_str("<a class=\"button\" href=\"/export.csv\">Export</a>\n");
    }

    html.push_str("</div>");
    html
}

fn render_filters(columns: &[ColumnView<'_>]) -> String {
    let mut html = String::from("<div class=\"paper filters\">\n");

    for column in columns {
        let name = escape_html(column.name);
        let _ = write!(
            html,
            "<form method=\"get\" action=\"/filter\">\n<label>Filter by {name}</label>\n\
             <input type=\"hidden\" name=\"column\" value=\"{name}\">\n"
        );

        match &column.control {
            FilterControl::Select(values) => {
                html.push_str("<select name=\"value\" onchange=\"this.form.submit()\">\n");
                let _ = writeln!(
                    html,
                    "<option value=\"\"{}>None</option>",
                    selected(column.value.is_empty())
                );
                for value in values {
                    let _ = writeln!(
                        html,
                        "<option value=\"{}\"{}>{}</option>",
                        escape_html(value),
                        selected(!column.value.is_empty() && column.value == value),
                        escape_html(value)
                    );
                }
                html.push_str("</select>\n");
            }
            FilterControl::Text => {
                let _ = writeln!(
                    html,
                    "<input type=\"text\" name=\"value\" value=\"{}\">",
                    escape_html(column.value)
                );
                if !column.value.is_empty() {
                    let _ = writeln!(
                        html,
                        "<a href=\"/filter?column={}&amp;value=\">clear</a>",
                        urlencoding::encode(column.name)
                    );
                }
            }
        }

        html.push_str("</form>\n");
    }

    html.push_str("</div>");
    html
}

fn render_table(view: &ViewModel<'_>) -> String {
    let mut html = String::from("<div class=\"paper\">\n<table>\n<thead><tr>");
    for column in &view.columns {
        let _ = write!(html, "<th>{}</th>", escape_html(column.name));
    }
    html.push_str("</tr></thead>\n<tbody>\n");

    for row in &view.rows {
        html.push_str("<tr>");
        for value in row.values() {
            let _ = write!(html, "<td>{}</td>", escape_html(value));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n");

    html.push_str(&render_pagination(view));
    html.push_str("</div>");
    html
}

fn render_pagination(view: &ViewModel<'_>) -> String {
    let mut html = String::from("<div class=\"pagination\">\n");

    html.push_str("<form method=\"get\" action=\"/page-size\">Rows per page: <select name=\"size\" onchange=\"this.form.submit()\">\n");
    for size in view.page_sizes {
        let _ = writeln!(
            html,
            "<option value=\"{size}\"{}>{size}</option>",
            selected(*size == view.window.size)
        );
    }
    html.push_str("</select></form>\n");

    let _ = writeln!(html, "<span>{}</span>", view.range_label());

    let page = view.window.page;
    let has_prev = page > 0;
    let has_next = page.saturating_add(1) < view.page_count;
    let _ = writeln!(
        html,
        "<a href=\"/page?page={}\"{}>&lsaquo; Prev</a>",
        page.saturating_sub(1),
        disabled(!has_prev)
    );
    let _ = writeln!(
        html,
        "<a href=\"/page?page={}\"{}>Next &rsaquo;</a>",
        page.saturating_add(1),
        disabled(!has_next)
    );

    html.push_str("</div>\n");
    html
}

fn selected(on: bool) -> &'static str {
    if on { " selected" } else { "" }
}

fn disabled(on: bool) -> &'static str {
    if on { " class=\"disabled\"" } else { "" }
}
