//! Whole programs written directly against the abstract machine, below
//! the IR layer: the six instructions plus the machine expression
//! language are enough for real work.

use imp_core::machine::{Expr, Instr};
use imp_core::value::Value;
use imp_interp::machine::execute;
use imp_interp::{Options, RuntimeError};

fn str_lit(s: &str) -> Expr {
    Expr::lit(Value::Str(s.as_bytes().to_vec()))
}

/// `Puts`: emit a sequence one element at a time through an index
/// variable.
fn puts(string: Expr) -> Instr {
    Instr::block([
        Instr::set("index", Expr::lit(0)),
        Instr::while_(
            Expr::var("index").lt_(Expr::len(string.clone())),
            Instr::block([
                Instr::put([string.at(Expr::var("index"))]),
                Instr::set("index", Expr::var("index") + 1),
            ]),
        ),
    ])
}

/// Machine-level greeter: skip whitespace, read up to the newline into
/// `name`, print `Hello, <name>!`.
fn greeter() -> Vec<Instr> {
    let skip = Instr::while_(
        Expr::peek0()
            .eq_(' ')
            .or_(Expr::peek0().eq_('\n'))
            .or_(Expr::peek0().eq_('\t')),
        Instr::advance1(),
    );
    let read = Instr::block([
        Instr::set("name", Expr::lit(Value::Str(Vec::new()))),
        Instr::while_(
            Expr::peek0()
                .ne_('\n')
                .and_(Expr::peek0().ne_(Value::Unit)),
            Instr::block([
                Instr::set("name", Expr::var("name") + Expr::peek0()),
                Instr::advance1(),
            ]),
        ),
    ]);
    let greet = puts(str_lit("Hello, ") + Expr::var("name") + str_lit("!"));
    vec![skip, read, greet, Instr::put([Expr::lit('\n')])]
}

#[test]
fn greeter_end_to_end() {
    let opts = Options::default();
    assert_eq!(
        execute(&greeter(), "  Ada\n", &opts).unwrap(),
        "Hello, Ada!\n"
    );
    assert_eq!(
        execute(&greeter(), "Grace", &opts).unwrap(),
        "Hello, Grace!\n"
    );
}

#[test]
fn greeter_with_empty_input() {
    let opts = Options::default();
    assert_eq!(execute(&greeter(), "", &opts).unwrap(), "Hello, !\n");
}

#[test]
fn machine_var_reads_are_plain_values() {
    // No bound handles below the IR layer: Set then Put sees the value.
    let opts = Options::default();
    let out = execute(
        &[
            Instr::set("x", Expr::lit('q')),
            Instr::set("y", Expr::var("x")),
            Instr::put([Expr::var("y")]),
        ],
        "",
        &opts,
    )
    .unwrap();
    assert_eq!(out, "q");
}

#[test]
fn machine_unset_variable_reads_as_unit() {
    let opts = Options::default();
    let out = execute(
        &[Instr::if_else(
            Expr::var("missing").eq_(Value::Unit),
            Instr::put([Expr::lit('u')]),
            Instr::put([Expr::lit('v')]),
        )],
        "",
        &opts,
    )
    .unwrap();
    assert_eq!(out, "u");
}

#[test]
fn machine_while_respects_the_step_budget() {
    let spin = Instr::while_(Expr::lit(1), Instr::block([]));
    let err = execute(&[spin], "", &Options::with_max_steps(64)).unwrap_err();
    assert_eq!(err, RuntimeError::StepLimitExceeded { limit: 64 });
}
