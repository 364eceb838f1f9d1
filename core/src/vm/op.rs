use crate::asm::Instruction;
use crate::config::VmConfig;
use crate::error::VmError;
use crate::vm::err::{ExecutionError, OperandError};
use crate::vm::operand::{self, Operand, OperandFault, OperandKinds};

type Register = usize;

const REG: OperandKinds = OperandKinds::REGISTER;
const MEM: OperandKinds = OperandKinds::MEMORY;
const IMM: OperandKinds = OperandKinds::IMMEDIATE;
const LABEL: OperandKinds = OperandKinds::LABEL;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Load,
    Store,
    Add,
    Sub,
    Inc,
    Dec,
    Cmp,
    Jmp,
    Jz,
    Jnz,
    Read,
    Write,
    Halt,
}

impl Opcode {
    pub const ALL: [Opcode; 13] = [
        Opcode::Load,
        Opcode::Store,
        Opcode::Add,
        Opcode::Sub,
        Opcode::Inc,
        Opcode::Dec,
        Opcode::Cmp,
        Opcode::Jmp,
        Opcode::Jz,
        Opcode::Jnz,
        Opcode::Read,
        Opcode::Write,
        Opcode::Halt,
    ];

    /// Looks up an upper-cased mnemonic.
    pub fn from_mnemonic(mnemonic: &str) -> Option<Opcode> {
        Opcode::ALL.into_iter().find(|op| op.mnemonic() == mnemonic)
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Load => "LOAD",
            Opcode::Store => "STORE",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Inc => "INC",
            Opcode::Dec => "DEC",
            Opcode::Cmp => "CMP",
            Opcode::Jmp => "JMP",
            Opcode::Jz => "JZ",
            Opcode::Jnz => "JNZ",
            Opcode::Read => "READ",
            Opcode::Write => "WRITE",
            Opcode::Halt => "HALT",
        }
    }

    /// Operand kinds legal at each position; the slice length is the arity.
    pub fn operand_kinds(self) -> &'static [OperandKinds] {
        const REG_OR_MEM_OR_IMM: OperandKinds = REG.or(MEM).or(IMM);
        const REG_OR_IMM: OperandKinds = REG.or(IMM);
        match self {
            Opcode::Load => &[REG, REG_OR_MEM_OR_IMM],
            Opcode::Store => &[REG, MEM],
            Opcode::Add | Opcode::Sub => &[REG, REG],
            Opcode::Inc | Opcode::Dec | Opcode::Read | Opcode::Write => &[REG],
            Opcode::Cmp => &[REG, REG_OR_IMM],
            Opcode::Jmp | Opcode::Jz | Opcode::Jnz => &[LABEL],
            Opcode::Halt => &[],
        }
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

/// Value source of LOAD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Register(Register),
    Memory(usize),
    Immediate(i64),
}

/// Right-hand side of CMP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rhs {
    Register(Register),
    Immediate(i64),
}

/// Condition under which a jump is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Always,
    Zero,
    NotZero,
}

// Decoded op with resolved operands. Jump targets stay symbolic until taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Load {
        dest: Register,
        src: Source,
    },
    Store {
        src: Register,
        address: usize,
    },
    Add {
        dest: Register,
        rhs: Register,
    },
    Sub {
        dest: Register,
        rhs: Register,
    },
    Inc {
        target: Register,
    },
    Dec {
        target: Register,
    },
    Cmp {
        left: Register,
        right: Rhs,
    },
    Jump {
        condition: Condition,
        label: String,
    },
    Read {
        dest: Register,
    },
    Write {
        src: Register,
    },
    Halt,
}

/// Decodes one instruction: looks up the opcode, checks the arity and
/// resolves every operand under that opcode's permission table.
pub fn decode(instr: &Instruction, file: &str, config: &VmConfig) -> Result<(Opcode, Op), VmError> {
    let Some(opcode) = Opcode::from_mnemonic(&instr.opcode) else {
        let location = instr.locate(file, Some(&instr.opcode));
        return Err(ExecutionError::unknown_opcode(&instr.opcode, location).into());
    };

    let operand_error = |token: Option<&str>, fault: OperandFault| -> VmError {
        OperandError::new(opcode.mnemonic(), token, fault, instr.locate(file, token)).into()
    };

    let kinds = opcode.operand_kinds();
    if instr.operands.len() != kinds.len() {
        let fault = OperandFault::Arity {
            expected: kinds.len(),
            found: instr.operands.len(),
        };
        return Err(operand_error(None, fault));
    }

    let mut resolved = Vec::with_capacity(kinds.len());
    for (token, allowed) in instr.operands.iter().zip(kinds) {
        let operand = operand::resolve(token, *allowed, config)
            .map_err(|fault| operand_error(Some(token.as_str()), fault))?;
        resolved.push(operand);
    }

    let op = build(opcode, resolved).map_err(|(index, fault)| {
        operand_error(instr.operands.get(index).map(String::as_str), fault)
    })?;
    Ok((opcode, op))
}

fn register(operand: &Operand, position: usize) -> Result<Register, (usize, OperandFault)> {
    match operand {
        Operand::Register(index) => Ok(*index),
        other => Err((position, not_allowed(other, REG))),
    }
}

fn not_allowed(operand: &Operand, expected: OperandKinds) -> OperandFault {
    OperandFault::NotAllowed {
        found: operand.kind(),
        expected,
    }
}

fn build(opcode: Opcode, operands: Vec<Operand>) -> Result<Op, (usize, OperandFault)> {
    let op = match (opcode, operands.as_slice()) {
        (Opcode::Load, [dest, src]) => {
            let src = match src {
                Operand::Register(index) => Source::Register(*index),
                Operand::Memory(address) => Source::Memory(*address),
                Operand::Immediate(value) => Source::Immediate(*value),
                other => return Err((1, not_allowed(other, REG.or(MEM).or(IMM)))),
            };
            Op::Load { dest: register(dest, 0)?, src }
        }
        (Opcode::Store, [src, dest]) => {
            let address = match dest {
                Operand::Memory(address) => *address,
                other => return Err((1, not_allowed(other, MEM))),
            };
            Op::Store { src: register(src, 0)?, address }
        }
        (Opcode::Add, [dest, rhs]) => Op::Add { dest: register(dest, 0)?, rhs: register(rhs, 1)? },
        (Opcode::Sub, [dest, rhs]) => Op::Sub { dest: register(dest, 0)?, rhs: register(rhs, 1)? },
        (Opcode::Inc, [target]) => Op::Inc { target: register(target, 0)? },
        (Opcode::Dec, [target]) => Op::Dec { target: register(target, 0)? },
        (Opcode::Cmp, [left, right]) => {
            let right = match right {
                Operand::Register(index) => Rhs::Register(*index),
                Operand::Immediate(value) => Rhs::Immediate(*value),
                other => return Err((1, not_allowed(other, REG.or(IMM)))),
            };
            Op::Cmp { left: register(left, 0)?, right }
        }
        (Opcode::Jmp | Opcode::Jz | Opcode::Jnz, [target]) => {
            let label = match target {
                Operand::Label(name) => name.clone(),
                other => return Err((0, not_allowed(other, LABEL))),
            };
            let condition = match opcode {
                Opcode::Jz => Condition::Zero,
                Opcode::Jnz => Condition::NotZero,
                _ => Condition::Always,
            };
            Op::Jump { condition, label }
        }
        (Opcode::Read, [dest]) => Op::Read { dest: register(dest, 0)? },
        (Opcode::Write, [src]) => Op::Write { src: register(src, 0)? },
        (Opcode::Halt, []) => Op::Halt,
        (_, found) => {
            let fault = OperandFault::Arity {
                expected: opcode.operand_kinds().len(),
                found: found.len(),
            };
            return Err((usize::MAX, fault));
        }
    };
    Ok(op)
}
