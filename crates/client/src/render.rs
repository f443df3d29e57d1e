//! Plain-text rendering of [`Presentation`].

use crate::presentation::{ModalState, Presentation, SearchOutcome, StatusKind};
use api_shared::{AveragePriceRes, Medicine};
use serde_json::Value;

const UNNAMED: &str = "(unnamed)";

/// Formats a stored price with two decimals, or a placeholder for non-numeric values.
pub fn format_price(price: Option<&Value>) -> String {
    match price {
        Some(Value::Number(n)) => match n.as_f64() {
            Some(v) => format!("{v:.2}"),
            None => n.to_string(),
        },
        Some(Value::Null) | None => "price unavailable".to_string(),
        Some(other) => format!("invalid price ({other})"),
    }
}

pub fn render_average(aggregate: Option<&AveragePriceRes>) -> String {
    match aggregate {
        Some(AveragePriceRes {
            average_price: Some(avg),
            count,
        }) => format!("Average price: {avg:.2} (from {count} medicines)"),
        _ => "Average price: n/a".to_string(),
    }
}

fn render_card(index: usize, record: &Medicine, expanded: bool) -> String {
    let name = record.name.as_deref().unwrap_or(UNNAMED);
    let mut card = format!(
        "{:>3}. {}  {}",
        index + 1,
        name,
        format_price(record.price.as_ref())
    );
    if expanded {
        card.push_str("\n       [Update] [Delete]");
    }
    card
}

/// The medicine list, one card per record, followed by the aggregate line.
pub fn render_list(view: &Presentation) -> String {
    let mut lines = Vec::with_capacity(view.records().len() + 2);
    if view.records().is_empty() {
        lines.push("No medicines found.".to_string());
    }
    for (index, record) in view.records().iter().enumerate() {
        lines.push(render_card(index, record, view.is_expanded(record)));
    }
    lines.push(String::new());
    lines.push(render_average(view.aggregate()));
    lines.join("\n")
}

pub fn render_modal(view: &Presentation) -> Option<String> {
    match view.modal() {
        ModalState::Closed => None,
        ModalState::Edit { target } => Some(format!(
            "Update {target}: enter a new price and/or a new name, then save (or cancel)"
        )),
        ModalState::DeleteConfirm { target } => Some(format!(
            "Delete {target}? Confirm to delete (or cancel)"
        )),
    }
}

pub fn render_status(view: &Presentation) -> Option<String> {
    view.status().map(|status| match status.kind {
        StatusKind::Info => format!("... {}", status.text),
        StatusKind::Success => format!("ok: {}", status.text),
        StatusKind::Error => format!("error: {}", status.text),
    })
}

pub fn render_search(outcome: &SearchOutcome) -> String {
    match outcome {
        SearchOutcome::Found(record) => format!(
            "Found: {}  {}",
            record.name.as_deref().unwrap_or(UNNAMED),
            format_price(record.price.as_ref())
        ),
        SearchOutcome::NotFound => "Medicine not found".to_string(),
        SearchOutcome::EmptyQuery => "Enter a name to search for".to_string(),
    }
}
