use super::store::StatsStore;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Table};

pub fn stats_table(stats: &StatsStore) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Check", "Runs", "Total", "Average"]);

    for (name, entry) in stats.entries() {
        table.add_row(vec![
            Cell::new(name),
            Cell::new(entry.count()).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1}s", entry.total().as_secs_f64()))
                .add_attribute(Attribute::Dim)
                .set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}s", entry.average().as_secs_f64()))
                .set_alignment(CellAlignment::Right),
        ]);
    }

    table
}

pub fn list_stats(stats: &StatsStore) {
    if stats.is_empty() {
        println!("No timing statistics recorded yet.");
        return;
    }
    println!("{}", stats_table(stats));
}
