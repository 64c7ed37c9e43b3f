use std::collections::HashMap;

use lir::*;

/// Sweep A of finalization: hand every distinct pseudoregister its own
/// 4-byte stack slot, in order of first use.
#[derive(Debug)]
struct ReplacementState {
    // Offset from rbp, will be negative offset in emitted assembly
    current_offset: i32,
    offset_map: HashMap<String, i32>,
}

impl ReplacementState {
    fn new() -> Self {
        Self {
            current_offset: 0,
            offset_map: HashMap::new(),
        }
    }

    fn replace_operand(&mut self, operand: &Operand) -> Operand {
        match operand {
            Operand::Pseudo(var) => match self.offset_map.get(var) {
                None => {
                    let new_offset = self.current_offset - 4;
                    self.current_offset = new_offset;
                    self.offset_map.insert(var.clone(), new_offset);
                    Operand::Stack(new_offset)
                }
                Some(offset) => Operand::Stack(*offset),
            },
            _ => operand.clone(),
        }
    }

    fn replace_instruction(&mut self, instruction: &Instruction) -> Instruction {
        match instruction {
            Instruction::Mov { src, dest } => {
                let src = self.replace_operand(src);
                let dest = self.replace_operand(dest);
                Instruction::Mov { src, dest }
            }
            Instruction::Unary { op, dest } => {
                let dest = self.replace_operand(dest);
                Instruction::Unary {
                    op: op.clone(),
                    dest,
                }
            }
            Instruction::Binary { op, src, dest } => {
                let src = self.replace_operand(src);
                let dest = self.replace_operand(dest);
                Instruction::Binary {
                    op: op.clone(),
                    src,
                    dest,
                }
            }
            Instruction::Idiv(op) => Instruction::Idiv(self.replace_operand(op)),
            Instruction::Cdq => Instruction::Cdq,
            Instruction::AllocateStack(_) => {
                panic!("Internal Error: AllocateStack should not be present before legalization")
            }
            Instruction::Ret => Instruction::Ret,
        }
    }

    fn replace_func(&mut self, func: &Func) -> Func {
        let fixed_instructions = func
            .instructions
            .iter()
            .map(|instr| self.replace_instruction(instr))
            .collect();

        Func {
            name: func.name.clone(),
            instructions: fixed_instructions,
        }
    }
}

/// Returns the rewritten program and the total bytes of stack its
/// temporaries need.
pub fn replace_psuedos(assm_ast: &Program) -> (Program, i32) {
    let mut state = ReplacementState::new();

    let replaced = Program {
        func: state.replace_func(&assm_ast.func),
    };

    (replaced, -state.current_offset)
}
