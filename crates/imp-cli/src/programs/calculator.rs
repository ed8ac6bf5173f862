//! A one-expression calculator: `<int> <op> <int>` on stdin, result (or
//! a complaint) on stdout. Division and modulo guard their divisor
//! before the operator ever sees it.

use imp_core::builder::{case_, default_, if_, none, putc_, str_, switch_, var_};
use imp_core::ir::Ir;
use imp_std::io;
use imp_std::strings;

pub fn calculator() -> Ir {
    Ir::Seq(vec![
        var_("lhs").assign(io::read_int()),
        var_("op").assign(io::read_char()),
        var_("rhs").assign(io::read_int()),
        switch_(
            var_("op"),
            [
                case_('+', [var_("res").assign(var_("lhs") + var_("rhs"))]),
                case_('-', [var_("res").assign(var_("lhs") - var_("rhs"))]),
                case_('*', [var_("res").assign(var_("lhs") * var_("rhs"))]),
                case_(
                    '/',
                    [if_(
                        var_("rhs").ne_(0),
                        [var_("res").assign(var_("lhs") / var_("rhs"))],
                    )
                    .else_([strings::puts(str_("Division by zero!\n"))])],
                ),
                case_(
                    '%',
                    [if_(
                        var_("rhs").ne_(0),
                        [var_("res").assign(var_("lhs") % var_("rhs"))],
                    )
                    .else_([strings::puts(str_("Modulo zero!\n"))])],
                ),
                default_([
                    strings::puts(str_("Invalid OP: ")),
                    putc_(var_("op")),
                    putc_('\n'),
                ]),
            ],
        ),
        if_(
            var_("res").ne_(none()),
            [io::write_int(var_("res")), putc_('\n')],
        ),
    ])
}
