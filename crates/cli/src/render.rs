//! Terminal output: tables, stat tiles, and the loading spinner.

use std::time::Duration;

use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, CellAlignment, ColumnConstraint, ContentArrangement, Row, Table, Width};
use indicatif::{ProgressBar, ProgressStyle};
use procura_core::RENDER_BATCH_SIZE;
use procura_service::DashboardStats;
use procura_view::{Align, RowAction, TRUNCATE_FIELDS, TableRender};

pub fn spinner(message: &'static str) -> ProgressBar {
    let bar = ProgressBar::new_spinner().with_message(message);
    bar.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

pub fn print_table(render: &TableRender) {
    println!("{}", render.title);

    if let Some(placeholder) = render.placeholder {
        println!("  {placeholder}");
        println!("{}", render.info);
        return;
    }

    let has_actions = render.rows.iter().any(|r| !r.actions.is_empty());

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED).set_content_arrangement(ContentArrangement::Dynamic);

    let mut header: Vec<Cell> = render.columns.iter().map(|c| Cell::new(&c.name)).collect();
    if has_actions {
        header.push(Cell::new("Actions"));
    }
    table.set_header(header);

    for batch in render.row_batches(RENDER_BATCH_SIZE) {
        for row in batch {
            let mut cells: Vec<Cell> = row
                .cells
                .iter()
                .map(|cell| Cell::new(&cell.text).set_alignment(alignment(cell.align)))
                .collect();
            if has_actions {
                cells.push(
                    Cell::new(action_hints(row.actions)).set_alignment(CellAlignment::Center),
                );
            }
            table.add_row(Row::from(cells));
        }
    }

    // Long free-text columns get an upper bound so rows stay on one screen.
    for (i, column) in render.columns.iter().enumerate() {
        if TRUNCATE_FIELDS.contains(&column.name.as_str()) {
            if let Some(table_column) = table.column_mut(i) {
                table_column.set_constraint(ColumnConstraint::UpperBoundary(Width::Fixed(40)));
            }
        }
    }

    println!("{table}");
    println!("{}", render.info);
}

pub fn print_stats(stats: &DashboardStats) {
    println!("  pending   {:>6}", stats.pending);
    println!("  approved  {:>6}", stats.approved);
    println!("  done      {:>6}", stats.done);
    println!("  rejected  {:>6}", stats.rejected);
}

fn alignment(align: Align) -> CellAlignment {
    match align {
        Align::Left => CellAlignment::Left,
        Align::Center => CellAlignment::Center,
        Align::Right => CellAlignment::Right,
    }
}

fn action_hints(actions: &[RowAction]) -> String {
    actions
        .iter()
        .map(|action| match action {
            RowAction::Edit => "edit",
            RowAction::Approve => "approve",
            RowAction::Reject => "reject",
            RowAction::Complete => "complete",
        })
        .collect::<Vec<_>>()
        .join(" / ")
}
