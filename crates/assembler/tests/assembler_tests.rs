//! Integration tests for the ibssbi assembler.
//!
//! Tests cover:
//! - Small complete programs (assemble, execute, check output)
//! - Roundtrip properties (disassemble → assemble, assemble → disassemble → assemble)
//! - Binary encoding through the loader
//! - Error cases (unknown opcode, missing operand, labels, etc.)

use ibssbi_assembler::{assemble, disassemble, listing, AsmError};
use ibssbi_common::{Loader, Program, Version, Word, WORD_SIZE};
use ibssbi_vm::{run_with_io, RuntimeError};

// ---- Test helpers ----

/// Assemble `text`, run it with `input`, and return what it printed.
fn run_text(text: &str, input: &[u8]) -> Result<String, RuntimeError> {
    let program = assemble(text).unwrap();
    run_program(&program, input)
}

fn run_program(program: &Program, input: &[u8]) -> Result<String, RuntimeError> {
    let mut input = input;
    let mut output = Vec::new();
    run_with_io(program, &mut input, &mut output)?;
    Ok(String::from_utf8(output).unwrap())
}

/// Check `assemble(disassemble(p)) == p` and that canonical text is a fixpoint.
fn assert_roundtrip(text: &str) {
    let first = assemble(text).unwrap();
    let canonical = disassemble(&first).unwrap();
    let second = assemble(&canonical).unwrap();
    assert_eq!(first, second);
    assert_eq!(disassemble(&second).unwrap(), canonical);
}

const HELLO: &str = "\
; Print a greeting one byte at a time.
    push 'H'
    print
    push 'i'
    print
    push '\\n'
    print
    halt
";

const COUNTDOWN: &str = "\
        PUSH 3
loop:   DUP
        PRINT_INT
        PUSH 1
        SUB
        DUP
        JMP_IF_TRUE loop
        POP
        HALT
";

const ECHO: &str = "\
; Copy input to output until end of input.
loop:   INPUT
        DUP
        PUSH -1             ; end-of-input marker
        EQ
        JMP_IF_TRUE done
        PRINT
        JMP loop
done:   POP
        HALT
";

const FACTORIAL: &str = "\
        INPUT_INT           ; n
        PUSH 1              ; n acc
loop:   SWAP                ; acc n
        DUP
        JMP_IF_FALSE done
        DUP                 ; acc n n
        ROT                 ; n n acc
        MULT                ; n acc*n
        SWAP
        PUSH 1
        SUB                 ; acc n-1
        SWAP                ; n-1 acc
        JMP loop
done:   POP
        PRINT_INT
        HALT
";

/// Store three values in a heap block, then sum them back.
fn heap_sum_source() -> String {
    let w = WORD_SIZE;
    format!(
        "\
        ALLOC 3
        DUP
        PUSH 10
        STO
        DUP
        PUSH {w}
        ADD
        PUSH 20
        STO
        DUP
        PUSH {two}
        ADD
        PUSH 30
        STO
        DUP
        RET             ; p a
        SWAP
        DUP
        PUSH {w}
        ADD
        RET             ; a p b
        ROT             ; p b a
        ADD             ; p a+b
        SWAP
        DUP
        PUSH {two}
        ADD
        RET             ; a+b p c
        ROT             ; p c a+b
        ADD
        PRINT_INT
        FREE
        HALT
",
        two = 2 * w
    )
}

// ---- Programs ----

#[test]
fn hello() {
    assert_eq!(run_text(HELLO, b"").unwrap(), "Hi\n");
}

#[test]
fn countdown() {
    assert_eq!(run_text(COUNTDOWN, b"").unwrap(), "3\n2\n1\n");
}

#[test]
fn echo_until_eof() {
    assert_eq!(run_text(ECHO, b"echo me").unwrap(), "echo me");
    assert_eq!(run_text(ECHO, b"").unwrap(), "");
}

#[test]
fn factorial() {
    assert_eq!(run_text(FACTORIAL, b"5\n").unwrap(), "120\n");
    assert_eq!(run_text(FACTORIAL, b"0").unwrap(), "1\n");
    assert_eq!(run_text(FACTORIAL, b"  10 ").unwrap(), "3628800\n");
}

#[test]
fn factorial_without_input() {
    assert_eq!(
        run_text(FACTORIAL, b"seven"),
        Err(RuntimeError::InvalidInput { at: 0 })
    );
}

#[test]
fn heap_sum() {
    assert_eq!(run_text(&heap_sum_source(), b"").unwrap(), "60\n");
}

#[test]
fn division_by_zero_reports_offset() {
    let push = 1 + WORD_SIZE;
    assert_eq!(
        run_text("PUSH 1\nPUSH 0\nDIV\nHALT\n", b""),
        Err(RuntimeError::DivisionByZero { at: 2 * push })
    );
}

#[test]
fn aliases_assemble_to_canonical_opcodes() {
    let short = assemble("PUSH 6\nPUSH 3\nB_AND\nPUSH 1\nSHL\nL_NOT\nHALT\n").unwrap();
    let long = assemble("PUSH 6\nPUSH 3\nBITWISE_AND\nPUSH 1\nSHIFT_LEFT\nNOT\nHALT\n").unwrap();
    assert_eq!(short, long);
}

#[test]
fn negative_immediate_wraps() {
    let out = run_text("PUSH -2\nPUSH 3\nADD\nPRINT_INT\nHALT\n", b"").unwrap();
    assert_eq!(out, "1\n");
}

// ---- Roundtrips ----

#[test]
fn programs_roundtrip() {
    assert_roundtrip(HELLO);
    assert_roundtrip(COUNTDOWN);
    assert_roundtrip(ECHO);
    assert_roundtrip(FACTORIAL);
    assert_roundtrip(&heap_sum_source());
}

#[test]
fn disassembly_keeps_behaviour() {
    let program = assemble(FACTORIAL).unwrap();
    let again = assemble(&disassemble(&program).unwrap()).unwrap();
    assert_eq!(run_program(&again, b"6").unwrap(), "720\n");
}

#[test]
fn encoded_binary_loads_back() {
    let program = assemble(COUNTDOWN).unwrap();
    let bytes = program.encode();
    let loaded = Loader::default().load_bytes(&bytes).unwrap();
    assert_eq!(loaded, program);
    assert_eq!(run_program(&loaded, b"").unwrap(), "3\n2\n1\n");
}

#[test]
fn canonical_text_for_labels_and_chars() {
    let program = assemble("top: PUSH 'a'\nJMP top\n").unwrap();
    assert_eq!(disassemble(&program).unwrap(), "PUSH 97\nJMP 0\n");
}

#[test]
fn listing_starts_with_header_comment() {
    let program = assemble(COUNTDOWN).unwrap();
    let text = listing(&program).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some(format!("; ibssbi {} ({} bytes)", Version::CURRENT, program.len()).as_str())
    );
    assert_eq!(lines.next(), Some("0000  PUSH 3"));
    assert_eq!(text.lines().count(), 1 + 9);
}

#[test]
fn max_word_literal() {
    let text = format!("PUSH {}\nHALT\n", Word::MAX);
    assert_roundtrip(&text);
    let hex = format!("PUSH 0x{:x}\nHALT\n", Word::MAX);
    assert_eq!(assemble(&text).unwrap(), assemble(&hex).unwrap());
}

// ---- Errors ----

#[test]
fn unknown_opcode() {
    assert_eq!(
        assemble("PUSH 1\nfrob\n").unwrap_err(),
        AsmError::UnknownOpcode {
            line: 2,
            token: "frob".to_string()
        }
    );
}

#[test]
fn missing_operand() {
    assert_eq!(
        assemble("HALT\n\nJMP_IF_TRUE\n").unwrap_err(),
        AsmError::MissingOperand {
            line: 3,
            opcode: "JMP_IF_TRUE"
        }
    );
}

#[test]
fn operand_not_allowed() {
    assert!(matches!(
        assemble("ADD 1\n").unwrap_err(),
        AsmError::OperandNotAllowed { line: 1, opcode: "ADD", .. }
    ));
}

#[test]
fn invalid_number() {
    assert!(matches!(
        assemble("PUSH 0x\n").unwrap_err(),
        AsmError::InvalidNumber { line: 1, .. }
    ));
}

#[test]
fn undefined_label_reports_use_site() {
    assert_eq!(
        assemble("PUSH 1\nJMP_IF_TRUE missing\nHALT\n").unwrap_err(),
        AsmError::UndefinedLabel {
            line: 2,
            label: "missing".to_string()
        }
    );
}

#[test]
fn duplicate_label_reports_both_lines() {
    let err = assemble("x: HALT\ny: HALT\nx: HALT\n").unwrap_err();
    assert_eq!(err.line(), 3);
    assert!(err.to_string().contains("line 1"));
}
