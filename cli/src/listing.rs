use tinyvm_core::asm::Program;
use tinyvm_core::config::VmConfig;
use tinyvm_core::vm::op::{self, Condition, Op, Rhs, Source};
use tinyvm_core::VmErrorExt;

/// Renders a decoded listing of `program`: one line per instruction with its
/// index and source line, labels on their own lines, jump targets resolved to
/// instruction indices. Lines that fail to decode are shown with the error.
pub fn render_listing(program: &Program, config: &VmConfig) -> String {
    let mut out = String::new();
    out.push_str(&format!("Program: {}\n", program.name()));
    out.push_str(&format!("Instructions: {}\n", program.len()));
    out.push_str(&format!("Labels: {}\n\n", program.labels().len()));

    for (i, instr) in program.instructions().iter().enumerate() {
        for name in program.labels_at(i) {
            out.push_str(&format!("{}:\n", name));
        }
        let text = match op::decode(instr, program.name(), config) {
            Ok((opcode, op)) => render_op(program, opcode.mnemonic(), &op),
            Err(e) => format!("!! {}", e.message()),
        };
        out.push_str(&format!("{:04}  L{:<4} {}\n", i, instr.line, text));
    }

    // labels defined after the last instruction
    for name in program.labels_at(program.len()) {
        out.push_str(&format!("{}:\n", name));
    }
    out
}

fn render_op(program: &Program, mnemonic: &str, op: &Op) -> String {
    match op {
        Op::Load { dest, src } => {
            let src = match src {
                Source::Register(r) => format!("r{}", r),
                Source::Memory(a) => format!("@{}", a),
                Source::Immediate(v) => v.to_string(),
            };
            format!("{} r{} <- {}", mnemonic, dest, src)
        }
        Op::Store { src, address } => format!("{} @{} <- r{} & 0xFF", mnemonic, address, src),
        Op::Add { dest, rhs } => format!("{} r{} <- r{} + r{}", mnemonic, dest, dest, rhs),
        Op::Sub { dest, rhs } => format!("{} r{} <- r{} - r{}", mnemonic, dest, dest, rhs),
        Op::Inc { target } => format!("{} r{} ++", mnemonic, target),
        Op::Dec { target } => format!("{} r{} --", mnemonic, target),
        Op::Cmp { left, right } => match right {
            Rhs::Register(r) => format!("{} r{} , r{}", mnemonic, left, r),
            Rhs::Immediate(v) => format!("{} r{} , {}", mnemonic, left, v),
        },
        Op::Jump { condition, label } => {
            let when = match condition {
                Condition::Always => "",
                Condition::Zero => " if Z",
                Condition::NotZero => " if !Z",
            };
            match program.resolve_label(label) {
                Some(target) => format!("{} {} -> {:04}{}", mnemonic, label, target, when),
                None => format!("{} {} -> ????{} (undefined label)", mnemonic, label, when),
            }
        }
        Op::Read { dest } => format!("{} r{} <- in", mnemonic, dest),
        Op::Write { src } => format!("{} out <- r{}", mnemonic, src),
        Op::Halt => mnemonic.to_string(),
    }
}
