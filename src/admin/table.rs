//! Generic tables: list tables (`table_for`, `index_table`) and the vertical
//! attribute table used on show pages.

use crate::admin::html::{escape, link_to, post_button};

/// One column of a list table. `cell` returns markup and is responsible for
/// escaping any text it includes.
pub struct Column<T> {
    pub label: &'static str,
    pub cell: fn(&T) -> String,
}

impl<T> Column<T> {
    pub fn new(label: &'static str, cell: fn(&T) -> String) -> Self {
        Self { label, cell }
    }
}

/// One row of an attributes table; same contract as `Column`.
pub type AttributeRow<T> = Column<T>;

fn header_row(labels: impl Iterator<Item = &'static str>) -> String {
    let cells: String = labels
        .map(|label| format!("<th>{}</th>", escape(label)))
        .collect();
    format!("<thead><tr>{}</tr></thead>", cells)
}

pub fn table_for<T>(rows: &[T], columns: &[Column<T>]) -> String {
    let body: String = rows
        .iter()
        .map(|row| {
            let cells: String = columns
                .iter()
                .map(|column| format!("<td>{}</td>", (column.cell)(row)))
                .collect();
            format!("<tr>{}</tr>", cells)
        })
        .collect();
    format!(
        "<table>{}<tbody>{}</tbody></table>",
        header_row(columns.iter().map(|column| column.label)),
        body
    )
}

/// A list table with a trailing View / Edit / Delete actions column.
/// `row_path` gives each record's show path, e.g. `/admin/tasks/5`.
pub fn index_table<T>(rows: &[T], columns: &[Column<T>], row_path: fn(&T) -> String) -> String {
    let body: String = rows
        .iter()
        .map(|row| {
            let path = row_path(row);
            let cells: String = columns
                .iter()
                .map(|column| format!("<td>{}</td>", (column.cell)(row)))
                .collect();
            format!(
                "<tr>{}<td class=\"table_actions\">{} {} {}</td></tr>",
                cells,
                link_to("View", &path),
                link_to("Edit", &format!("{}/edit", path)),
                post_button(
                    "Delete",
                    &format!("{}/delete", path),
                    Some("Are you sure you want to delete this?")
                )
            )
        })
        .collect();
    format!(
        "<table class=\"index_table\">{}<tbody>{}</tbody></table>",
        header_row(
            columns
                .iter()
                .map(|column| column.label)
                .chain(std::iter::once(""))
        ),
        body
    )
}

pub fn attributes_table<T>(record: &T, rows: &[AttributeRow<T>]) -> String {
    let body: String = rows
        .iter()
        .map(|row| {
            format!(
                "<tr><th>{}</th><td>{}</td></tr>",
                escape(row.label),
                (row.cell)(record)
            )
        })
        .collect();
    format!("<table class=\"attributes_table\"><tbody>{}</tbody></table>", body)
}
