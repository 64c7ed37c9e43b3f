use crate::tacky;
use crate::tacky::{Instruction, Val};

/// Allocates fresh `tmp.<n>` names. One allocator is created per compilation,
/// so independent compilations number their temporaries from zero.
#[derive(Debug, Default)]
struct TempGen {
    counter: u32,
}

impl TempGen {
    fn make_temp(&mut self) -> String {
        let name = format!("tmp.{}", self.counter);
        self.counter += 1;
        name
    }
}

pub fn gen_tacky(ast: ast::TranslationUnit) -> tacky::TranslationUnit {
    let mut temps = TempGen::default();

    match ast {
        ast::TranslationUnit { func } => tacky::TranslationUnit {
            func: tacky_func(func, &mut temps),
        },
    }
}

fn tacky_func(func: ast::Func, temps: &mut TempGen) -> tacky::Func {
    tacky::Func {
        name: func.ident,
        instructions: tacky_stmt(func.body, temps),
    }
}

fn tacky_stmt(stmt: ast::Stmt, temps: &mut TempGen) -> Vec<Instruction> {
    match stmt {
        ast::Stmt::Return { expr } => {
            let (mut instructions, value) = tacky_expr(expr, temps);

            instructions.push(Instruction::Return(value));

            instructions
        }
    }
}

/// Post-order walk: emit the instructions computing each operand first, then
/// the instruction combining them, and hand the result value back up.
fn tacky_expr(expr: ast::Expr, temps: &mut TempGen) -> (Vec<Instruction>, Val) {
    match expr {
        ast::Expr::Constant(val) => (vec![], Val::Constant(val)),
        ast::Expr::Unary { op, expr } => {
            let (mut instructions, inner) = tacky_expr(*expr, temps);
            let dest = Val::Var(temps.make_temp());

            instructions.push(Instruction::Unary {
                op: tacky_unop(op),
                src: inner,
                dest: dest.clone(),
            });

            (instructions, dest)
        }
        ast::Expr::Binary { op, left, right } => {
            let (mut instructions, first) = tacky_expr(*left, temps);
            let (mut second_instr, second) = tacky_expr(*right, temps);
            instructions.append(&mut second_instr);

            let dest = Val::Var(temps.make_temp());

            instructions.push(Instruction::Binary {
                op: tacky_binop(op),
                first,
                second,
                dest: dest.clone(),
            });

            (instructions, dest)
        }
    }
}

fn tacky_unop(op: ast::UnaryOp) -> tacky::UnaryOp {
    match op {
        ast::UnaryOp::Complement => tacky::UnaryOp::Complement,
        ast::UnaryOp::Negate => tacky::UnaryOp::Negate,
    }
}

fn tacky_binop(op: ast::BinaryOp) -> tacky::BinaryOp {
    match op {
        ast::BinaryOp::Add => tacky::BinaryOp::Add,
        ast::BinaryOp::Subtract => tacky::BinaryOp::Subtract,
        ast::BinaryOp::Multiply => tacky::BinaryOp::Multiply,
        ast::BinaryOp::Divide => tacky::BinaryOp::Divide,
        ast::BinaryOp::Modulo => tacky::BinaryOp::Modulo,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    macro_rules! binary {
        ($op:expr, $left:expr, $right:expr) => {
            ast::Expr::Binary {
                op: $op,
                left: Box::new($left),
                right: Box::new($right),
            }
        };
    }

    macro_rules! unary {
        ($op:expr, $expr:expr) => {
            ast::Expr::Unary {
                op: $op,
                expr: Box::new($expr),
            }
        };
    }

    fn return_program(expr: ast::Expr) -> ast::TranslationUnit {
        ast::TranslationUnit {
            func: ast::Func {
                ident: "main".to_string(),
                body: ast::Stmt::Return { expr },
            },
        }
    }

    #[test]
    fn constant_return_emits_no_temporaries() {
        let tacky = gen_tacky(return_program(ast::Expr::Constant(2)));

        assert_eq!(
            tacky.func.instructions,
            vec![Instruction::Return(Val::Constant(2))]
        )
    }

    #[test]
    fn unary_lowering() {
        let tacky = gen_tacky(return_program(unary!(
            ast::UnaryOp::Negate,
            ast::Expr::Constant(5)
        )));

        assert_eq!(
            tacky.func.instructions,
            vec![
                Instruction::Unary {
                    op: tacky::UnaryOp::Negate,
                    src: Val::Constant(5),
                    dest: Val::Var("tmp.0".to_string()),
                },
                Instruction::Return(Val::Var("tmp.0".to_string())),
            ]
        )
    }

    #[test]
    fn binary_lowering_is_left_to_right() {
        // 1 + 2 * 3: the multiply is emitted first, then the add consumes it
        let tacky = gen_tacky(return_program(binary!(
            ast::BinaryOp::Add,
            ast::Expr::Constant(1),
            binary!(
                ast::BinaryOp::Multiply,
                ast::Expr::Constant(2),
                ast::Expr::Constant(3)
            )
        )));

        assert_eq!(
            tacky.func.instructions,
            vec![
                Instruction::Binary {
                    op: tacky::BinaryOp::Multiply,
                    first: Val::Constant(2),
                    second: Val::Constant(3),
                    dest: Val::Var("tmp.0".to_string()),
                },
                Instruction::Binary {
                    op: tacky::BinaryOp::Add,
                    first: Val::Constant(1),
                    second: Val::Var("tmp.0".to_string()),
                    dest: Val::Var("tmp.1".to_string()),
                },
                Instruction::Return(Val::Var("tmp.1".to_string())),
            ]
        )
    }

    #[test]
    fn each_temporary_is_written_once() {
        let tacky = gen_tacky(return_program(binary!(
            ast::BinaryOp::Subtract,
            binary!(
                ast::BinaryOp::Divide,
                ast::Expr::Constant(10),
                ast::Expr::Constant(3)
            ),
            unary!(ast::UnaryOp::Complement, ast::Expr::Constant(0))
        )));

        let mut defined = HashSet::new();

        for instruction in &tacky.func.instructions {
            let (sources, dest) = match instruction {
                Instruction::Return(val) => (vec![val], None),
                Instruction::Unary { src, dest, .. } => (vec![src], Some(dest)),
                Instruction::Binary {
                    first,
                    second,
                    dest,
                    ..
                } => (vec![first, second], Some(dest)),
            };

            // every source is either a constant or an already-defined temporary
            for src in sources {
                if let Val::Var(name) = src {
                    assert!(defined.contains(name), "use of undefined {}", name);
                }
            }

            if let Some(Val::Var(name)) = dest {
                assert!(defined.insert(name.clone()), "{} written twice", name);
            }
        }
    }

    #[test]
    fn return_is_last() {
        let tacky = gen_tacky(return_program(binary!(
            ast::BinaryOp::Modulo,
            ast::Expr::Constant(10),
            ast::Expr::Constant(3)
        )));

        assert!(matches!(
            tacky.func.instructions.last(),
            Some(Instruction::Return(_))
        ))
    }

    #[test]
    fn compilations_number_temporaries_independently() {
        let program = || return_program(unary!(ast::UnaryOp::Negate, ast::Expr::Constant(1)));

        let first = gen_tacky(program());
        let second = gen_tacky(program());

        assert_eq!(first, second)
    }
}
