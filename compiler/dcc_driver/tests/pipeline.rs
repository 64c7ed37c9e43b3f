//! Drives source text through every compiler stage and checks the emitted
//! assembly, without touching the filesystem or an external assembler.

use codegen::gen_assm;
use lexer::Lexer;
use mir::gen_tacky;
use parser::Parser;

fn compile_to_assembly(src: &str) -> String {
    let tokens = Lexer::new(src).tokenize().collect();
    let ast = Parser::new(tokens).parse().unwrap();
    let tacky = gen_tacky(ast);
    let assm = gen_assm(&tacky);

    let mut out = Vec::new();
    emission::write_program(&mut out, &assm).unwrap();

    String::from_utf8(out).unwrap()
}

#[test]
fn return_constant() {
    let text = compile_to_assembly("int main(void) { return 2; }");

    let expected = "\
\t.globl main
main:
\tpushq %rbp
\tmovq %rsp, %rbp
\tsubq $0, %rsp
\tmovl $2, %eax
\tmovq %rbp, %rsp
\tpopq %rbp
\tret
.section .note.GNU-stack,\"\",@progbits
";

    assert_eq!(text, expected)
}

#[test]
fn negation() {
    let text = compile_to_assembly("int main(void) { return -5; }");

    assert!(text.contains("\tmovl $5, -4(%rbp)\n"));
    assert!(text.contains("\tnegl -4(%rbp)\n"));
    assert!(text.contains("\tmovl -4(%rbp), %eax\n"));
}

#[test]
fn complement() {
    let text = compile_to_assembly("int main(void) { return ~0; }");

    assert!(text.contains("\tnotl -4(%rbp)\n"));
}

#[test]
fn addition_and_multiplication() {
    let text = compile_to_assembly("int main(void) { return 1 + 2 * 3; }");

    // the multiply runs before the add and feeds it
    let mul = text.find("imull").expect("no imull emitted");
    let add = text.find("addl").expect("no addl emitted");

    assert!(mul < add);
}

#[test]
fn division_uses_idiv() {
    let text = compile_to_assembly("int main(void) { return 10 / 3; }");

    assert!(text.contains("\tcdq\n"));
    assert!(text.contains("\tidivl %r10d\n"));
    // quotient comes back from %eax
    assert!(text.contains("\tmovl %eax, -4(%rbp)\n"));
}

#[test]
fn modulo_reads_remainder_from_edx() {
    let text = compile_to_assembly("int main(void) { return 10 % 3; }");

    assert!(text.contains("\tmovl %edx, -4(%rbp)\n"));
}

#[test]
fn composite_expression() {
    let text = compile_to_assembly("int main(void) { return -(1 + 2) * ~0 / 3; }");

    assert!(text.contains("negl"));
    assert!(text.contains("notl"));
    assert!(text.contains("imull"));
    assert!(text.contains("idivl"));
}

#[test]
fn emitted_text_has_no_pseudoregisters() {
    let text = compile_to_assembly("int main(void) { return (1 + 2) * 3 - 4 / 2; }");

    assert!(!text.contains("tmp."));
}

#[test]
fn frame_reservation_is_aligned() {
    let text = compile_to_assembly("int main(void) { return 1 + 2 + 3 + 4 + 5; }");

    let amount: i32 = text
        .lines()
        .find_map(|line| line.trim().strip_prefix("subq $")?.strip_suffix(", %rsp"))
        .expect("no stack reservation emitted")
        .parse()
        .unwrap();

    assert!(amount >= 16, "four temporaries need at least 16 bytes");
    assert_eq!(amount % 16, 0);
}

#[test]
fn deepest_stack_slot_is_within_frame() {
    let text = compile_to_assembly("int main(void) { return 1 + 2 + 3 + 4 + 5; }");

    let frame: i32 = text
        .lines()
        .find_map(|line| line.trim().strip_prefix("subq $")?.strip_suffix(", %rsp"))
        .unwrap()
        .parse()
        .unwrap();

    let deepest = text
        .match_indices("(%rbp)")
        .filter_map(|(at, _)| {
            let prefix = &text[..at];
            let start = prefix.rfind(|c: char| c.is_whitespace() || c == ',')? + 1;
            prefix[start..].parse::<i32>().ok()
        })
        .min()
        .unwrap();

    assert!(-deepest <= frame);
}
