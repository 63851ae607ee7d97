//! Generic create/edit forms with inline validation messages.

use validator::ValidationErrors;

use crate::admin::html::{escape, link_to};

pub enum InputKind {
    Text,
    Email,
    Password,
    Date,
    /// Rendered without a label, e.g. the reset token on the password form.
    Hidden,
    /// `(value, label)` options; a blank option is always offered first.
    Select(Vec<(String, String)>),
}

pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: InputKind,
    pub value: String,
}

impl FormField {
    pub fn new(name: &'static str, label: &'static str, kind: InputKind, value: String) -> Self {
        Self {
            name,
            label,
            kind,
            value,
        }
    }
}

/// Turns `(id, label)` pairs into select options.
pub fn id_options(options: &[(i32, String)]) -> Vec<(String, String)> {
    options
        .iter()
        .map(|(id, label)| (id.to_string(), label.clone()))
        .collect()
}

/// Messages recorded for `field`, in order.
pub fn field_messages(errors: Option<&ValidationErrors>, field: &str) -> Vec<String> {
    errors
        .and_then(|errors| errors.field_errors().get(field).cloned())
        .map(|field_errors| {
            field_errors
                .iter()
                .map(|error| {
                    error
                        .message
                        .as_ref()
                        .map(|message| message.to_string())
                        .unwrap_or_else(|| error.code.to_string())
                })
                .collect()
        })
        .unwrap_or_default()
}

fn render_input(field: &FormField) -> String {
    let id = format!("field_{}", field.name);
    match &field.kind {
        InputKind::Select(options) => {
            let options: String = std::iter::once((String::new(), String::new()))
                .chain(options.iter().cloned())
                .map(|(value, label)| {
                    let selected = if value == field.value { " selected" } else { "" };
                    format!(
                        "<option value=\"{}\"{}>{}</option>",
                        escape(&value),
                        selected,
                        escape(&label)
                    )
                })
                .collect();
            format!(
                "<select id=\"{}\" name=\"{}\">{}</select>",
                id, field.name, options
            )
        }
        kind => {
            let input_type = match kind {
                InputKind::Email => "email",
                InputKind::Password => "password",
                InputKind::Date => "date",
                InputKind::Hidden => "hidden",
                _ => "text",
            };
            // Password inputs never echo their value back.
            let value = match kind {
                InputKind::Password => String::new(),
                _ => escape(&field.value),
            };
            format!(
                "<input type=\"{}\" id=\"{}\" name=\"{}\" value=\"{}\">",
                input_type, id, field.name, value
            )
        }
    }
}

/// Renders a POST form. Fields with validation errors show their messages
/// inline, the way the admin re-renders a rejected form.
pub fn render_form(
    action: &str,
    legend: &str,
    fields: &[FormField],
    errors: Option<&ValidationErrors>,
    submit_label: &str,
    cancel_href: &str,
) -> String {
    let inputs: String = fields
        .iter()
        .map(|field| {
            if let InputKind::Hidden = field.kind {
                return render_input(field);
            }
            let messages = field_messages(errors, field.name);
            let (class, inline) = if messages.is_empty() {
                ("input", String::new())
            } else {
                (
                    "input error",
                    format!(
                        "<p class=\"inline-errors\">{}</p>",
                        escape(&messages.join(", "))
                    ),
                )
            };
            format!(
                "<li class=\"{}\"><label for=\"field_{}\">{}</label> {}{}</li>",
                class,
                field.name,
                escape(field.label),
                render_input(field),
                inline
            )
        })
        .collect();

    format!(
        "<form method=\"post\" action=\"{}\"><fieldset class=\"inputs\"><legend>{}</legend>\
         <ol>{}</ol></fieldset><fieldset class=\"actions\">\
         <button type=\"submit\">{}</button> {}</fieldset></form>",
        escape(action),
        escape(legend),
        inputs,
        escape(submit_label),
        link_to("Cancel", cancel_href)
    )
}
