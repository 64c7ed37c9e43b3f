use lir::*;

/// Sweep B of finalization: reserve the frame, then rewrite any instruction
/// whose operands x86-64 refuses through the scratch registers R10 and R11.
/// Runs after every pseudoregister has a stack slot, so the full frame size
/// is known here.
pub fn fix_invalid_instructions(ast: &mut Program, stack_size: i32) -> Program {
    let func = &mut ast.func;

    // the System V ABI keeps %rsp 16-byte aligned across calls
    let frame_size = (stack_size + 15) / 16 * 16;

    func.instructions
        .insert(0, Instruction::AllocateStack(frame_size));

    Program {
        func: fix_func(func),
    }
}

fn fix_func(func: &Func) -> Func {
    Func {
        name: func.name.clone(),
        instructions: fix_instructions(&func.instructions),
    }
}

fn fix_instructions(instructions: &[Instruction]) -> Vec<Instruction> {
    let mut fixed_instr = vec![];

    for i in instructions {
        match i {
            // mov can't take two memory operands
            Instruction::Mov { src, dest } if is_stack(src) && is_stack(dest) => {
                fixed_instr.push(Instruction::Mov {
                    src: src.clone(),
                    dest: Operand::Register(Register::R10),
                });
                fixed_instr.push(Instruction::Mov {
                    src: Operand::Register(Register::R10),
                    dest: dest.clone(),
                });
            }
            // neither can add/sub
            Instruction::Binary { op, src, dest }
                if matches!(op, BinaryOp::Add | BinaryOp::Sub)
                    && is_stack(src)
                    && is_stack(dest) =>
            {
                fixed_instr.push(Instruction::Mov {
                    src: src.clone(),
                    dest: Operand::Register(Register::R10),
                });
                fixed_instr.push(Instruction::Binary {
                    op: op.clone(),
                    src: Operand::Register(Register::R10),
                    dest: dest.clone(),
                });
            }
            // imul can't write to memory
            Instruction::Binary {
                op: BinaryOp::Mult,
                src,
                dest,
            } if is_stack(dest) => {
                fixed_instr.push(Instruction::Mov {
                    src: dest.clone(),
                    dest: Operand::Register(Register::R11),
                });
                fixed_instr.push(Instruction::Binary {
                    op: BinaryOp::Mult,
                    src: src.clone(),
                    dest: Operand::Register(Register::R11),
                });
                fixed_instr.push(Instruction::Mov {
                    src: Operand::Register(Register::R11),
                    dest: dest.clone(),
                });
            }
            // idiv can't divide by an immediate
            Instruction::Idiv(Operand::Imm(val)) => {
                fixed_instr.push(Instruction::Mov {
                    src: Operand::Imm(*val),
                    dest: Operand::Register(Register::R10),
                });
                fixed_instr.push(Instruction::Idiv(Operand::Register(Register::R10)));
            }
            _ => fixed_instr.push(i.clone()),
        }
    }

    fixed_instr
}

fn is_stack(op: &Operand) -> bool {
    matches!(op, Operand::Stack(_))
}
