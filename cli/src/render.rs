//! cli/src/render.rs
//! Table rendering for machine state.
//! description: builds `comfy-table` tables for registers, memory and step
//! traces so the CLI can show what the machine is doing.

use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use tinyvm_core::VM;

/// Memory cells per table row.
const MEMORY_COLUMNS: usize = 8;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Registers plus pc, flags and run status.
pub fn registers_table(vm: &VM) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Register", "Value"]);
    for (i, value) in vm.registers().iter().enumerate() {
        table.add_row(vec![Cell::new(format!("r{}", i)), Cell::new(value)]);
    }
    let flags = vm.flags();
    table.add_row(vec![Cell::new("PC"), Cell::new(vm.pc())]);
    table.add_row(vec![
        Cell::new("Flags"),
        Cell::new(format!("Z={} | N={}", flags.zero as u8, flags.negative as u8)),
    ]);
    table.add_row(vec![Cell::new("Cycles"), Cell::new(vm.cycle_count())]);
    table.add_row(vec![
        Cell::new("Status"),
        Cell::new(if vm.halted() { "HALTED" } else { "READY" }),
    ]);
    table
}

/// Memory as rows of eight cells, addressed by their first cell.
pub fn memory_table(vm: &VM) -> Table {
    let mut table = new_table();
    let mut header = vec!["Addr".to_string()];
    header.extend((0..MEMORY_COLUMNS).map(|i| format!("+{}", i)));
    table.set_header(header);

    for (row, chunk) in vm.memory().chunks(MEMORY_COLUMNS).enumerate() {
        let mut cells = vec![Cell::new(format!("{:03}", row * MEMORY_COLUMNS))];
        cells.extend(chunk.iter().map(Cell::new));
        table.add_row(cells);
    }
    table
}

/// Empty step-trace table with one column per register.
pub fn trace_table(register_count: usize) -> Table {
    let mut table = new_table();
    let mut header = vec!["Step".to_string(), "PC".to_string(), "Line".to_string(), "Instruction".to_string()];
    header.extend((0..register_count).map(|i| format!("r{}", i)));
    header.push("Z".to_string());
    header.push("N".to_string());
    table.set_header(header);
    table
}

/// Appends the state after a step to a trace table.
pub fn push_trace_row(table: &mut Table, step: usize, pc: usize, line: usize, text: &str, vm: &VM) {
    let flags = vm.flags();
    let mut cells = vec![Cell::new(step), Cell::new(pc), Cell::new(line), Cell::new(text)];
    cells.extend(vm.registers().iter().map(Cell::new));
    cells.push(Cell::new(flags.zero as u8));
    cells.push(Cell::new(flags.negative as u8));
    table.add_row(cells);
}
