//! Index pages: scope tabs, the records table, pagination and the filter sidebar.

use serde_json::Value;

use crate::admin::html::{blank_slate, escape, link_to, query_string, sidebar_section};
use crate::admin::table::{index_table, Column};
use crate::queries::PageParams;

pub enum FilterKind {
    /// Case-insensitive "contains" text search.
    Contains,
    /// `(value, label)` options.
    Select(Vec<(String, String)>),
    /// Yes / No select over a boolean.
    Boolean,
    /// Two date inputs named `<name>_from` and `<name>_to`.
    DateRange,
    Number,
}

pub struct FilterField {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FilterKind,
}

impl FilterField {
    pub fn new(name: &'static str, label: &'static str, kind: FilterKind) -> Self {
        Self { name, label, kind }
    }

    /// Query parameter names this filter submits.
    pub fn param_names(&self) -> Vec<String> {
        match self.kind {
            FilterKind::DateRange => {
                vec![format!("{}_from", self.name), format!("{}_to", self.name)]
            }
            _ => vec![self.name.to_string()],
        }
    }
}

/// One tab of a scoped index.
pub struct ScopeTab {
    pub key: &'static str,
    pub label: &'static str,
    pub count: i64,
}

pub struct ScopeTabs {
    pub tabs: Vec<ScopeTab>,
    pub current: &'static str,
}

/// Everything an index page displays besides its rows.
pub struct IndexPage<T> {
    pub title: &'static str,
    pub path: &'static str,
    pub new_label: &'static str,
    pub columns: Vec<Column<T>>,
    pub row_path: fn(&T) -> String,
    pub filters: Vec<FilterField>,
    /// Current filter values, as the serialized filter struct.
    pub filter_values: Value,
    pub scopes: Option<ScopeTabs>,
}

/// Reads a filter value as a string for redisplay.
fn value_of(values: &Value, name: &str) -> String {
    match values.get(name) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn filter_input(field: &FilterField, values: &Value) -> String {
    let text_input = |name: &str, input_type: &str| {
        format!(
            "<input type=\"{}\" name=\"{}\" value=\"{}\">",
            input_type,
            name,
            escape(&value_of(values, name))
        )
    };
    let select = |options: Vec<(String, String)>| {
        let current = value_of(values, field.name);
        let options: String = std::iter::once((String::new(), "Any".to_string()))
            .chain(options)
            .map(|(value, label)| {
                let selected = if value == current { " selected" } else { "" };
                format!(
                    "<option value=\"{}\"{}>{}</option>",
                    escape(&value),
                    selected,
                    escape(&label)
                )
            })
            .collect();
        format!("<select name=\"{}\">{}</select>", field.name, options)
    };

    let input = match &field.kind {
        FilterKind::Contains => text_input(field.name, "text"),
        FilterKind::Number => text_input(field.name, "number"),
        FilterKind::Select(options) => select(options.clone()),
        FilterKind::Boolean => select(vec![
            ("true".to_string(), "Yes".to_string()),
            ("false".to_string(), "No".to_string()),
        ]),
        FilterKind::DateRange => format!(
            "{} - {}",
            text_input(&format!("{}_from", field.name), "date"),
            text_input(&format!("{}_to", field.name), "date")
        ),
    };
    format!(
        "<div class=\"filter_form_field\"><label>{}</label> {}</div>",
        escape(field.label),
        input
    )
}

/// The sidebar filter form. Submitting it keeps the current scope.
pub fn filter_sidebar(
    path: &str,
    fields: &[FilterField],
    values: &Value,
    scope: Option<&str>,
) -> String {
    if fields.is_empty() {
        return String::new();
    }
    let inputs: String = fields.iter().map(|field| filter_input(field, values)).collect();
    let scope_input = scope
        .map(|scope| format!("<input type=\"hidden\" name=\"scope\" value=\"{}\">", escape(scope)))
        .unwrap_or_default();
    sidebar_section(
        "Filters",
        &format!(
            "<form method=\"get\" action=\"{}\">{}{}\
             <button type=\"submit\">Filter</button> {}</form>",
            escape(path),
            scope_input,
            inputs,
            link_to("Clear Filters", path)
        ),
    )
}

/// Current filter values as query pairs, for links that must keep them.
pub fn filter_pairs(fields: &[FilterField], values: &Value) -> Vec<(String, String)> {
    fields
        .iter()
        .flat_map(|field| field.param_names())
        .map(|name| {
            let value = value_of(values, &name);
            (name, value)
        })
        .collect()
}

fn href(path: &str, pairs: &[(String, String)]) -> String {
    let query = query_string(pairs);
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query)
    }
}

pub fn scope_tabs(path: &str, scopes: &ScopeTabs, filters: &[(String, String)]) -> String {
    let tabs: String = scopes
        .tabs
        .iter()
        .map(|tab| {
            let mut pairs = vec![("scope".to_string(), tab.key.to_string())];
            pairs.extend(filters.iter().cloned());
            let class = if tab.key == scopes.current { " class=\"selected\"" } else { "" };
            format!(
                "<a href=\"{}\"{}>{} <span class=\"count\">({})</span></a>",
                escape(&href(path, &pairs)),
                class,
                escape(tab.label),
                tab.count
            )
        })
        .collect();
    format!("<div class=\"scopes\">{}</div>", tabs)
}

pub fn pagination(path: &str, page: &PageParams, total: i64, extra: &[(String, String)]) -> String {
    let current = page.number();
    let pages = PageParams::total_pages(total);
    let link = |number: i64, label: &str| {
        let mut pairs = extra.to_vec();
        pairs.push(("page".to_string(), number.to_string()));
        link_to(label, &href(path, &pairs))
    };

    let mut parts = Vec::new();
    if current > 1 {
        parts.push(link(current - 1, "Previous"));
    }
    parts.push(format!(
        "<span class=\"pagination_information\">Page {} of {} ({} total)</span>",
        current, pages, total
    ));
    if current < pages {
        parts.push(link(current + 1, "Next"));
    }
    format!("<div class=\"pagination\">{}</div>", parts.join(" "))
}

/// Renders an index page's main column and sidebar (without the layout).
pub fn render_index<T>(
    page: &IndexPage<T>,
    rows: &[T],
    page_params: &PageParams,
    total: i64,
) -> (String, String) {
    let filters = filter_pairs(&page.filters, &page.filter_values);
    let mut query_pairs = filters.clone();
    let current_scope = page.scopes.as_ref().map(|scopes| scopes.current);
    if let Some(scope) = current_scope {
        query_pairs.insert(0, ("scope".to_string(), scope.to_string()));
    }

    let tabs = page
        .scopes
        .as_ref()
        .map(|scopes| scope_tabs(page.path, scopes, &filters))
        .unwrap_or_default();
    let table = if rows.is_empty() {
        blank_slate(&format!(
            "There are no {} yet.",
            page.title.to_lowercase()
        ))
    } else {
        index_table(rows, &page.columns, page.row_path)
    };

    let main = format!(
        "<div class=\"action_items\">{}</div>{}{}{}",
        link_to(page.new_label, &format!("{}/new", page.path)),
        tabs,
        table,
        pagination(page.path, page_params, total, &query_pairs)
    );
    let sidebar = filter_sidebar(page.path, &page.filters, &page.filter_values, current_scope);
    (main, sidebar)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Item {
        id: i32,
    }

    fn page_config(scopes: Option<ScopeTabs>) -> IndexPage<Item> {
        IndexPage {
            title: "Items",
            path: "/admin/items",
            new_label: "New Item",
            columns: vec![Column::new("Id", |item: &Item| item.id.to_string())],
            row_path: |item| format!("/admin/items/{}", item.id),
            filters: vec![
                FilterField::new("title", "Title", FilterKind::Contains),
                FilterField::new("due_date", "Due Date", FilterKind::DateRange),
                FilterField::new("is_done", "Done", FilterKind::Boolean),
            ],
            filter_values: json!({
                "title": "roadmap",
                "due_date_from": "2026-10-01",
                "due_date_to": null,
                "is_done": false
            }),
            scopes,
        }
    }

    #[test]
    fn test_filter_sidebar_prefills_values() {
        let config = page_config(None);
        let html = filter_sidebar(
            config.path,
            &config.filters,
            &config.filter_values,
            Some("late"),
        );
        assert!(html.contains("name=\"title\" value=\"roadmap\""));
        assert!(html.contains("name=\"due_date_from\" value=\"2026-10-01\""));
        assert!(html.contains("name=\"due_date_to\" value=\"\""));
        assert!(html.contains("<option value=\"false\" selected>No</option>"));
        assert!(html.contains("<input type=\"hidden\" name=\"scope\" value=\"late\">"));
    }

    #[test]
    fn test_scope_tabs_keep_filters_and_mark_current() {
        let config = page_config(Some(ScopeTabs {
            tabs: vec![
                ScopeTab { key: "all", label: "All", count: 3 },
                ScopeTab { key: "late", label: "Late", count: 1 },
            ],
            current: "late",
        }));
        let (main, _) = render_index(&config, &[Item { id: 1 }], &PageParams::default(), 1);
        assert!(main.contains(concat!(
            "<a href=\"/admin/items?scope=all&amp;title=roadmap",
            "&amp;due_date_from=2026-10-01&amp;is_done=false\">",
            "All <span class=\"count\">(3)</span></a>"
        )));
        assert!(main.contains("class=\"selected\">Late <span class=\"count\">(1)</span>"));
    }

    #[test]
    fn test_empty_index_shows_blank_slate() {
        let config = page_config(None);
        let (main, sidebar) = render_index(&config, &[], &PageParams::default(), 0);
        assert!(main.contains("There are no items yet."));
        assert!(main.contains("<a href=\"/admin/items/new\">New Item</a>"));
        assert!(sidebar.contains("Filters"));
    }

    #[test]
    fn test_pagination_links() {
        let html = pagination("/admin/items", &PageParams { page: Some(2) }, 75, &[]);
        assert!(html.contains("<a href=\"/admin/items?page=1\">Previous</a>"));
        assert!(html.contains("Page 2 of 3 (75 total)"));
        assert!(html.contains("<a href=\"/admin/items?page=3\">Next</a>"));

        let single = pagination("/admin/items", &PageParams::default(), 5, &[]);
        assert!(!single.contains("Next"));
        assert!(!single.contains("Previous"));
    }
}
