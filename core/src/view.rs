//! Renderable snapshots of a page.
//!
//! Pages never print anything themselves. They produce a `View`, which the
//! terminal front-end prints through its `Display` impl and tests inspect
//! structurally.

use std::fmt;

use chrono::NaiveDate;

use crate::types::RecordId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Error(String),
    Success(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

impl Choice {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Text,
    Date,
    Time,
    TextArea,
    Select(Vec<Choice>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub label: &'static str,
    pub value: String,
    pub required: bool,
    pub input: Input,
}

impl Field {
    pub fn new(name: &'static str, label: &'static str, value: impl Into<String>, input: Input) -> Self {
        Self {
            name,
            label,
            value: value.into(),
            required: false,
            input,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: RecordId,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub columns: &'static [&'static str],
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotCell {
    pub start: String,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Loading(&'static str),
    /// Empty state or prompt shown in place of the content.
    Message(String),
    Table(Table),
    Form {
        fields: Vec<Field>,
        submit_label: &'static str,
    },
    Slots(Vec<SlotCell>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub title: String,
    pub notices: Vec<Notice>,
    /// Informational lines printed between the notices and the body.
    pub details: Vec<String>,
    pub body: Body,
}

impl View {
    pub fn new(title: impl Into<String>, body: Body) -> Self {
        Self {
            title: title.into(),
            notices: Vec::new(),
            details: Vec::new(),
            body,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.notices.iter().find_map(|n| match n {
            Notice::Error(msg) => Some(msg.as_str()),
            Notice::Success(_) => None,
        })
    }

    pub fn success(&self) -> Option<&str> {
        self.notices.iter().find_map(|n| match n {
            Notice::Success(msg) => Some(msg.as_str()),
            Notice::Error(_) => None,
        })
    }

    /// Rows of the table body; zero for any other body.
    pub fn row_count(&self) -> usize {
        match &self.body {
            Body::Table(table) => table.rows.len(),
            _ => 0,
        }
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        match &self.body {
            Body::Form { fields, .. } => fields.iter().find(|f| f.name == name),
            _ => None,
        }
    }
}

/// Render an ISO `YYYY-MM-DD` date as `dd/mm/yyyy`. Anything else is
/// returned unchanged.
pub fn format_date(value: &str) -> String {
    let date_part = value.get(..10).unwrap_or(value);
    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(date) => date.format("%d/%m/%Y").to_string(),
        Err(_) => value.to_string(),
    }
}

/// `-` for missing or blank optional text.
pub fn or_dash(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==", self.title)?;
        for notice in &self.notices {
            match notice {
                Notice::Error(msg) => writeln!(f, "! {msg}")?,
                Notice::Success(msg) => writeln!(f, "+ {msg}")?,
            }
        }
        for line in &self.details {
            writeln!(f, "  {line}")?;
        }
        match &self.body {
            Body::Loading(msg) => writeln!(f, "{msg}"),
            Body::Message(msg) => writeln!(f, "{msg}"),
            Body::Table(table) => write_table(f, table),
            Body::Form { fields, submit_label } => {
                for field in fields {
                    let marker = if field.required { " *" } else { "" };
                    writeln!(f, "  {}{} [{}]: {}", field.label, marker, field.name, field.value)?;
                    if let Input::Select(choices) = &field.input {
                        for choice in choices {
                            writeln!(f, "      {} = {}", choice.value, choice.label)?;
                        }
                    }
                }
                writeln!(f, "  <{submit_label}>")
            }
            Body::Slots(cells) => {
                for cell in cells {
                    let (mark, label) = if cell.available {
                        ("x", "Disponível")
                    } else {
                        (" ", "Ocupado")
                    };
                    writeln!(f, "  [{mark}] {}  {label}", cell.start)?;
                }
                Ok(())
            }
        }
    }
}

fn write_table(f: &mut fmt::Formatter<'_>, table: &Table) -> fmt::Result {
    let ids: Vec<String> = table.rows.iter().map(|r| r.id.to_string()).collect();
    let mut widths: Vec<usize> = std::iter::once("ID")
        .chain(table.columns.iter().copied())
        .map(|c| c.chars().count())
        .collect();
    for (row, id) in table.rows.iter().zip(&ids) {
        widths[0] = widths[0].max(id.chars().count());
        for (i, cell) in row.cells.iter().enumerate() {
            if let Some(w) = widths.get_mut(i + 1) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let header: Vec<&str> = std::iter::once("ID").chain(table.columns.iter().copied()).collect();
    write_cells(f, &widths, header.iter().copied())?;
    for (row, id) in table.rows.iter().zip(&ids) {
        write_cells(
            f,
            &widths,
            std::iter::once(id.as_str()).chain(row.cells.iter().map(String::as_str)),
        )?;
    }
    Ok(())
}

fn write_cells<'a>(
    f: &mut fmt::Formatter<'_>,
    widths: &[usize],
    cells: impl Iterator<Item = &'a str>,
) -> fmt::Result {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect();
    writeln!(f, "{}", line.join(" | ").trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_date_uses_day_month_year() {
        assert_eq!(format_date("2024-06-10"), "10/06/2024");
        assert_eq!(format_date("2024-06-10T00:00:00Z"), "10/06/2024");
        assert_eq!(format_date("amanhã"), "amanhã");
        assert_eq!(format_date(""), "");
    }

    #[test]
    fn or_dash_replaces_blank_values() {
        assert_eq!(or_dash(None), "-");
        assert_eq!(or_dash(Some("  ")), "-");
        assert_eq!(or_dash(Some("x")), "x");
    }

    #[test]
    fn table_renders_header_and_rows() {
        let view = View::new(
            "Pacientes",
            Body::Table(Table {
                columns: &["Nome", "CPF"],
                rows: vec![Row {
                    id: RecordId::Int(1),
                    cells: vec!["Ana".into(), "123".into()],
                }],
            }),
        );
        let text = view.to_string();
        assert!(text.starts_with("== Pacientes ==\n"));
        assert!(text.contains("ID | Nome | CPF"));
        assert!(text.contains("1  | Ana  | 123"));
        assert_eq!(view.row_count(), 1);
    }

    #[test]
    fn slot_cells_render_availability() {
        let view = View::new(
            "Agenda",
            Body::Slots(vec![
                SlotCell { start: "09:00".into(), available: true },
                SlotCell { start: "09:30".into(), available: false },
            ]),
        );
        let text = view.to_string();
        assert!(text.contains("[x] 09:00  Disponível"));
        assert!(text.contains("[ ] 09:30  Ocupado"));
    }

    #[test]
    fn notices_are_split_by_kind() {
        let mut view = View::new("Form", Body::Message(String::new()));
        view.notices.push(Notice::Success("ok".into()));
        assert_eq!(view.success(), Some("ok"));
        assert_eq!(view.error(), None);
    }
}
