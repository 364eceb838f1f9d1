pub mod asm;
pub mod config;
pub mod error;
pub mod location;
pub mod reports;
pub mod samples;
pub mod script;
pub mod vm;

pub use asm::{Instruction, LabelTable, Program, parse_program};
pub use config::VmConfig;
pub use error::{Level, VmError, VmErrorExt};
pub use location::Location;
pub use script::Script;
pub use vm::{ResetOptions, RunStatus, Snapshot, StepStatus, VM};

pub fn generate_error_report<E: VmErrorExt + ?Sized>(error: &E) -> String {
    let level = error.level();
    let location = match error.location() {
        Some(loc) => loc.to_string(),
        None => "unknown location".to_string(),
    };
    let message = error.message();

    format!("TINYVM | {} | {} | {}", level, location, message)
}

/// Loads `source`, feeds it `input` and runs it to completion, returning the
/// output text.
pub fn run_source(source: &str, input: &str) -> Result<String, VmError> {
    let mut vm = VM::new();
    vm.load_program(source)?;
    vm.set_input(input);
    vm.run()?;
    Ok(vm.get_output())
}
