//! String fragments.
//!
//! Strings come in two shapes and every helper here works over both:
//! literal byte sequences (`str_`), and per-cell strings stored under
//! indexed variable names (`s[0]`, `s[1]`, ...). A string ends at the
//! first `Unit` cell (unset name, or out-of-range literal index) or NUL
//! byte.

use imp_core::builder::{break_, break_with, for_, global_, if_, lit, none, putc_};
use imp_core::ir::Ir;
use imp_core::value::Marker;

/// Loop index shared by the string fragments.
fn idx() -> Ir {
    global_(Marker::new("str-idx"))
}

/// Whether `ch` terminates a string. Evaluates `ch` up to twice.
pub fn end_of(ch: Ir) -> Ir {
    ch.clone().eq_(none()).or_(ch.eq_('\0'))
}

/// Writes a string to stdout, stopping at its terminator.
pub fn puts(s: Ir) -> Ir {
    for_(
        idx().assign(0),
        !end_of(s.clone().at(idx().deref_())),
        idx().pre_inc(),
        [putc_(s.at(idx().deref_()))],
    )
}

/// The length of a string: index of its first terminator.
pub fn strlen(s: Ir) -> Ir {
    for_(
        idx().assign(0),
        lit(true),
        idx().pre_inc(),
        [if_(
            end_of(s.at(idx().deref_())),
            [break_with(idx().deref_())],
        )],
    )
}

/// Copies a cell-backed string, terminator included.
pub fn strcpy(dst: Ir, src: Ir) -> Ir {
    for_(
        idx().assign(0),
        lit(true),
        idx().pre_inc(),
        [
            dst.at(idx().deref_())
                .assign(src.clone().at(idx().deref_()).deref_()),
            if_(end_of(src.at(idx().deref_())), [break_()]),
        ],
    )
}

/// Copies exactly `size` cells from `src` to `dst`.
pub fn memcpy(dst: Ir, src: Ir, size: Ir) -> Ir {
    for_(
        idx().assign(0),
        idx().lt_(size),
        idx().pre_inc(),
        [dst.at(idx().deref_()).assign(src.at(idx().deref_()))],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use imp_core::builder::{str_, var_};
    use imp_core::ir::Ir;
    use imp_interp::run;

    use crate::io::write_int;

    #[test]
    fn puts_writes_a_literal() {
        let p = Ir::Seq(vec![puts(str_("Hello!"))]);
        assert_eq!(run(&p, "").unwrap(), "Hello!");
    }

    #[test]
    fn puts_stops_at_a_nul() {
        let p = Ir::Seq(vec![puts(str_("ab\0cd"))]);
        assert_eq!(run(&p, "").unwrap(), "ab");
    }

    #[test]
    fn puts_writes_a_cell_backed_string() {
        let p = Ir::Seq(vec![
            var_("s").at(0).assign('h'),
            var_("s").at(1).assign('i'),
            puts(var_("s")),
        ]);
        assert_eq!(run(&p, "").unwrap(), "hi");
    }

    #[test]
    fn strlen_of_literals_and_cells() {
        let p = Ir::Seq(vec![write_int(strlen(str_("abcd")))]);
        assert_eq!(run(&p, "").unwrap(), "4");

        let p = Ir::Seq(vec![
            var_("s").at(0).assign('x'),
            write_int(strlen(var_("s"))),
        ]);
        assert_eq!(run(&p, "").unwrap(), "1");
    }

    #[test]
    fn strcpy_copies_cells() {
        let p = Ir::Seq(vec![
            var_("a").at(0).assign('o'),
            var_("a").at(1).assign('k'),
            strcpy(var_("b"), var_("a")),
            puts(var_("b")),
        ]);
        assert_eq!(run(&p, "").unwrap(), "ok");
    }

    #[test]
    fn memcpy_copies_a_prefix() {
        let p = Ir::Seq(vec![
            var_("a").at(0).assign('x'),
            var_("a").at(1).assign('y'),
            var_("a").at(2).assign('z'),
            memcpy(var_("b"), var_("a"), lit(2)),
            puts(var_("b")),
        ]);
        assert_eq!(run(&p, "").unwrap(), "xy");
    }
}
