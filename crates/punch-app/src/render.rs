//! Plain-text rendering of controller state and notices.

use std::fmt::Write as _;

use punch_core::Unit;
use punch_runtime::Notice;

/// The unit list, one line per unit with its task progress.
pub fn render_units(units: &[Unit]) -> String {
    if units.is_empty() {
        return "no units yet (try 'add <name> | <address>' or 'generate')".to_string();
    }
    let width = units.iter().map(|u| u.name.len()).max().unwrap_or(0);
    let mut out = format!("{} unit(s)\n", units.len());
    for unit in units {
        let _ = writeln!(
            out,
            "  {:<width$}  {:>5}  {}  [{}]",
            unit.name,
            unit.progress().to_string(),
            unit.address,
            unit.status,
        );
    }
    out.truncate(out.trim_end().len());
    out
}

/// One unit's checklist, trades in display order, tasks numbered from 1.
pub fn render_unit(unit: &Unit) -> String {
    let mut out = format!("{} - {}\nstatus: {}\n", unit.name, unit.address, unit.status);
    for trade in unit.trade_names() {
        let tasks = unit.tasks(trade);
        let done = tasks.iter().filter(|t| t.completed).count();
        let _ = writeln!(out, "\n{trade} ({done}/{})", tasks.len());
        if tasks.is_empty() {
            let _ = writeln!(out, "  (no tasks)");
        }
        for (i, task) in tasks.iter().enumerate() {
            let mark = if task.completed { 'x' } else { ' ' };
            let _ = writeln!(out, "  {}. [{mark}] {}", i + 1, task.task);
        }
    }
    out.truncate(out.trim_end().len());
    out
}

/// A notice as a single prefixed line.
pub fn render_notice(notice: &Notice) -> String {
    if notice.kind.is_error() {
        format!("! {}: {}", notice.kind, notice.message)
    } else {
        format!("* {}", notice.message)
    }
}
