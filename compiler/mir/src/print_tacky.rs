use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::tacky::*;

type IOResult = std::io::Result<()>;

pub fn debug_tacky(program: &TranslationUnit, path: &Path) -> IOResult {
    let output = File::create(path)?;
    let mut writer = BufWriter::new(output);

    print_func(&mut writer, &program.func)?;

    writer.flush()?;

    Ok(())
}

fn print_func<W: Write>(writer: &mut W, func: &Func) -> IOResult {
    writeln!(writer, "{}:", func.name)?;

    for instruction in &func.instructions {
        print_instruction(writer, instruction)?;
    }

    Ok(())
}

fn print_instruction<W: Write>(writer: &mut W, instr: &Instruction) -> IOResult {
    match instr {
        Instruction::Return(val) => {
            writeln!(writer, "\tReturn({})", format_val(val))
        }
        Instruction::Unary { op, src, dest } => {
            writeln!(
                writer,
                "\t{} = {}{}",
                format_val(dest),
                format_unary(op),
                format_val(src)
            )
        }
        Instruction::Binary {
            op,
            first,
            second,
            dest,
        } => {
            writeln!(
                writer,
                "\t{} = {} {} {}",
                format_val(dest),
                format_val(first),
                format_binary(op),
                format_val(second)
            )
        }
    }
}

fn format_val(val: &Val) -> String {
    match val {
        Val::Constant(c) => format!("{}", *c),
        Val::Var(var) => var.clone(),
    }
}

fn format_unary(op: &UnaryOp) -> String {
    match op {
        UnaryOp::Complement => "~".to_string(),
        UnaryOp::Negate => "-".to_string(),
    }
}

fn format_binary(op: &BinaryOp) -> String {
    match op {
        BinaryOp::Add => "+".to_string(),
        BinaryOp::Subtract => "-".to_string(),
        BinaryOp::Multiply => "*".to_string(),
        BinaryOp::Divide => "/".to_string(),
        BinaryOp::Modulo => "%".to_string(),
    }
}
