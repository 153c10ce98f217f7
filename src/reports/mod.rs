use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use typoforge::api::StatisticsOutcome;
use typoforge::cache::CacheStatus;
use typoforge::model::{BuildReport, Operation, ProbabilityModel};
use typoforge::Tally;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn right_align(table: &mut Table, from: usize, to: usize) {
    for i in from..=to {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
}

/// Printable form of a character; whitespace would vanish in a table cell.
fn show(c: char) -> String {
    match c {
        ' ' => "␣".to_string(),
        '\t' => "\\t".to_string(),
        '\n' => "\\n".to_string(),
        c => c.to_string(),
    }
}

pub fn print_extraction_report(outcome: &StatisticsOutcome) {
    let stats = &outcome.statistics;
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Metric").add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
    ]);

    let source = match (outcome.cache, &outcome.cache_path) {
        (Some(CacheStatus::Hit), Some(p)) => format!("cache ({})", p.display()),
        (Some(CacheStatus::Rebuilt), Some(p)) => format!("corpus, cached to {}", p.display()),
        _ => "corpus (cache disabled)".to_string(),
    };
    table.add_row(vec![Cell::new("Source"), Cell::new(source)]);

    if let Some(load) = &outcome.load {
        table.add_row(vec![Cell::new("Lines read"), Cell::new(load.lines_read)]);
        table.add_row(vec![
            Cell::new("Malformed lines"),
            Cell::new(load.lines_skipped),
        ]);
        table.add_row(vec![
            Cell::new("Filtered by language"),
            Cell::new(load.filtered_lang),
        ]);
    }

    table.add_row(vec![Cell::new("Rows extracted"), Cell::new(stats.rows_seen)]);
    table.add_row(vec![
        Cell::new("Rows unclassifiable").fg(Color::Yellow),
        Cell::new(stats.rows_skipped).fg(Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Distinct chars"),
        Cell::new(stats.occurrences.len()),
    ]);

    table.add_row(vec![
        Cell::new("Deletions"),
        Cell::new(stats.deletions.values().sum::<u64>()),
    ]);
    table.add_row(vec![
        Cell::new("Substitutions"),
        Cell::new(stats.substitutions.values().sum::<u64>()),
    ]);
    table.add_row(vec![
        Cell::new("Insertions"),
        Cell::new(stats.insertions.values().sum::<u64>()),
    ]);
    table.add_row(vec![
        Cell::new("Transpositions"),
        Cell::new(stats.transpositions.values().sum::<u64>()),
    ]);

    right_align(&mut table, 1, 1);
    println!("\n📊 === EXTRACTION === \n{}", table);
}

pub fn print_build_report(report: &BuildReport) {
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Threshold").add_attribute(Attribute::Bold),
        Cell::new("Vocabulary").fg(Color::Green),
        Cell::new("Dropped chars").fg(Color::Red),
        Cell::new("Subs kept"),
        Cell::new("Ins kept"),
        Cell::new("Swap pairs").fg(Color::Green),
        Cell::new("Dropped pairs").fg(Color::Red),
    ]);
    table.add_row(vec![
        Cell::new(report.threshold),
        Cell::new(report.vocabulary).fg(Color::Green),
        Cell::new(report.dropped_chars).fg(Color::Red),
        Cell::new(report.substitution_events_kept),
        Cell::new(report.insertion_events_kept),
        Cell::new(report.transposition_pairs).fg(Color::Green),
        Cell::new(report.dropped_pairs).fg(Color::Red),
    ]);
    right_align(&mut table, 0, 6);
    println!("\n🧮 === MODEL === \n{}", table);
}

pub fn print_char_table(model: &ProbabilityModel, top: usize) {
    let mut rows: Vec<(char, f64)> = model
        .vocabulary()
        .map(|c| (c, model.total_probability(c)))
        .collect();
    rows.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Char").add_attribute(Attribute::Bold),
        Cell::new("Total").fg(Color::Cyan),
        Cell::new("Del"),
        Cell::new("Sub"),
        Cell::new("InsB"),
        Cell::new("InsA"),
        Cell::new("Likeliest sub"),
    ]);

    for (c, total) in rows.into_iter().take(top) {
        let likeliest = model
            .substitution_distribution(c)
            .and_then(|d| d.iter().max_by(|a, b| a.1.total_cmp(&b.1)))
            .map(|(o, p)| format!("{} ({:.0}%)", show(o), p * 100.0))
            .unwrap_or_else(|| "-".to_string());

        let pct = |op: Operation| format!("{:.3}%", model.op_probability(c, op) * 100.0);
        table.add_row(vec![
            Cell::new(show(c)).add_attribute(Attribute::Bold),
            Cell::new(format!("{:.3}%", total * 100.0)).fg(Color::Cyan),
            Cell::new(pct(Operation::Deletion)),
            Cell::new(pct(Operation::Substitution)),
            Cell::new(pct(Operation::InsertBefore)),
            Cell::new(pct(Operation::InsertAfter)),
            Cell::new(likeliest),
        ]);
    }

    right_align(&mut table, 1, 5);
    println!("\n🔤 === CHARACTERS (top {}) === \n{}", top, table);
}

pub fn print_transposition_table(model: &ProbabilityModel, top: usize) {
    let mut pairs: Vec<((char, char), f64)> = model.transpositions().collect();
    pairs.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Pair").add_attribute(Attribute::Bold),
        Cell::new("Swap prob").fg(Color::Cyan),
    ]);
    for ((a, b), p) in pairs.into_iter().take(top) {
        table.add_row(vec![
            Cell::new(format!("{}{}", show(a), show(b))),
            Cell::new(format!("{:.3}%", p * 100.0)).fg(Color::Cyan),
        ]);
    }
    right_align(&mut table, 1, 1);
    println!("\n🔁 === TRANSPOSITIONS (top {}) === \n{}", top, table);
}

pub fn print_tally(tally: &Tally) {
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Operation").add_attribute(Attribute::Bold),
        Cell::new("Count").add_attribute(Attribute::Bold),
    ]);
    for (op, n) in tally.iter() {
        let cell = Cell::new(op.to_string());
        let cell = if op.is_applied() {
            cell.fg(Color::Red)
        } else {
            cell
        };
        table.add_row(vec![cell, Cell::new(n)]);
    }
    table.add_row(vec![
        Cell::new("applied").add_attribute(Attribute::Bold),
        Cell::new(tally.applied()).add_attribute(Attribute::Bold),
    ]);
    right_align(&mut table, 1, 1);
    eprintln!("\n🎯 === TALLY === \n{}", table);
}
