use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use lir::*;

type IOResult = std::io::Result<()>;

pub fn output(path: &Path, assm: &Program) -> IOResult {
    let output = File::create(path)?;
    let mut writer = BufWriter::new(output);

    write_program(&mut writer, assm)?;

    writer.flush()?;

    Ok(())
}

pub fn write_program<W: Write>(writer: &mut W, assm: &Program) -> IOResult {
    emit_func(writer, &assm.func)?;
    emit_stack_note(writer)?;

    Ok(())
}

fn emit_func<W: Write>(writer: &mut W, func: &Func) -> IOResult {
    writeln!(writer, "\t.globl {}", func.name)?;
    writeln!(writer, "{}:", func.name)?;
    writeln!(writer, "\tpushq %rbp")?;
    writeln!(writer, "\tmovq %rsp, %rbp")?;

    for instruction in &func.instructions {
        emit_instruction(writer, instruction)?;
    }

    Ok(())
}

fn emit_instruction<W: Write>(writer: &mut W, instruction: &Instruction) -> IOResult {
    match instruction {
        Instruction::Mov { src, dest } => writeln!(
            writer,
            "\tmovl {}, {}",
            show_operand(src),
            show_operand(dest)
        )?,
        Instruction::Unary { op, dest } => {
            writeln!(writer, "\t{} {}", show_unary(op), show_operand(dest))?;
        }
        Instruction::Binary { op, src, dest } => {
            writeln!(
                writer,
                "\t{} {}, {}",
                show_binary(op),
                show_operand(src),
                show_operand(dest)
            )?;
        }
        Instruction::Idiv(op) => {
            writeln!(writer, "\tidivl {}", show_operand(op))?;
        }
        Instruction::Cdq => {
            writeln!(writer, "\tcdq")?;
        }
        Instruction::AllocateStack(amt) => {
            writeln!(writer, "\tsubq ${}, %rsp", amt)?;
        }
        Instruction::Ret => {
            writeln!(writer, "\tmovq %rbp, %rsp")?;
            writeln!(writer, "\tpopq %rbp")?;
            writeln!(writer, "\tret")?
        }
    }

    Ok(())
}

fn show_unary(op: &UnaryOp) -> String {
    match op {
        UnaryOp::Neg => "negl".to_string(),
        UnaryOp::Not => "notl".to_string(),
    }
}

fn show_binary(op: &BinaryOp) -> String {
    match op {
        BinaryOp::Add => "addl".to_string(),
        BinaryOp::Sub => "subl".to_string(),
        BinaryOp::Mult => "imull".to_string(),
    }
}

fn show_operand(op: &Operand) -> String {
    match op {
        Operand::Register(reg) => format!(
            "%{}",
            match reg {
                Register::AX => "eax",
                Register::DX => "edx",
                Register::R10 => "r10d",
                Register::R11 => "r11d",
            }
        ),
        Operand::Stack(amt) => format!("{}(%rbp)", amt),
        Operand::Imm(val) => format!("${}", val),
        Operand::Pseudo(_) => {
            panic!("Internal Error: no Pseudo-registers should be in tree when outputing assembly")
        }
    }
}

fn emit_stack_note<W: Write>(writer: &mut W) -> IOResult {
    writeln!(writer, ".section .note.GNU-stack,\"\",@progbits")?;
    Ok(())
}
