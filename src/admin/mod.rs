//! The admin interface's HTML layer.
//!
//! `html`, `table`, `form` and `index` are generic renderers; `resources`
//! holds the per-entity tables (columns, detail rows, filters, form fields)
//! that route handlers feed them.

pub mod form;
pub mod html;
pub mod index;
pub mod resources;
pub mod table;
