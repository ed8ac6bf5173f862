//! Reading and writing elementary values on the standard streams.
//!
//! All readers skip leading whitespace and evaluate to the value read,
//! or to `Unit` when the input has nothing suitable. Scratch state lives
//! under reserved marker names (`io-tmp` and its indexed cells), shared
//! across helpers the way a register file would be -- each fragment
//! initializes what it uses.

use imp_core::builder::{
    advance_, block_, break_, break_with, cast_, for_, getc_, global_, if_, lit, loop_, none,
    peek_, peek_at, putc_, while_,
};
use imp_core::ir::{CastTo, Ir};
use imp_core::value::Marker;

/// Scratch variable shared by the io fragments.
fn tmp() -> Ir {
    global_(Marker::new("io-tmp"))
}

/// Sign flag cell (`io-tmp[0]`), used while parsing integers.
fn is_neg() -> Ir {
    tmp().at(0)
}

/// Success flag cell (`io-tmp[1]`), set once a digit has been seen.
fn succ() -> Ir {
    tmp().at(1)
}

/// Whether `ch` is an ASCII whitespace byte. Evaluates `ch` once.
pub fn is_space(ch: Ir) -> Ir {
    block_([
        tmp().assign(ch),
        break_with(
            tmp()
                .eq_(' ')
                .or_(tmp().eq_('\t'))
                .or_(tmp().eq_('\n'))
                .or_(tmp().eq_('\x0B'))
                .or_(tmp().eq_('\x0C'))
                .or_(tmp().eq_('\r')),
        ),
    ])
}

/// Consumes input up to the next non-whitespace byte (or end of input).
pub fn skip_whitespace() -> Ir {
    loop_([if_(is_space(peek_()), [advance_()]).else_([break_()])])
}

/// Skips whitespace, then reads one byte (`Unit` at end of input).
pub fn read_char() -> Ir {
    block_([skip_whitespace(), break_with(getc_())])
}

/// Writes one byte.
pub fn write_char(ch: Ir) -> Ir {
    putc_(ch)
}

/// Skips whitespace, then reads an optionally signed decimal integer.
/// Evaluates to the integer, or to `Unit` when no digits are present
/// (in which case only the whitespace is consumed).
pub fn read_int() -> Ir {
    // While a sign is pending, digits are read one position ahead; the
    // sign byte itself is consumed by the first advance.
    let digit_ahead = || peek_at(is_neg().deref_());
    block_([
        skip_whitespace(),
        is_neg().assign(peek_().eq_('-')),
        succ().assign(false),
        tmp().assign(0),
        loop_([if_(
            digit_ahead()
                .ne_(none())
                .and_(digit_ahead().le_('9'))
                .and_(digit_ahead().ge_('0')),
            [
                tmp().assign(tmp() * 10 + cast_(CastTo::Int, digit_ahead() - lit('0'))),
                advance_(),
                succ().assign(true),
            ],
        )
        .else_([break_()])]),
        if_(
            succ(),
            [
                if_(is_neg(), [advance_(), tmp().mul_assign(-1)]),
                break_with(tmp().deref_()),
            ],
        ),
    ])
}

/// Writes a decimal integer: zero as `0`, a leading `-` for negatives,
/// then most-significant digits first via a magnitude scan.
pub fn write_int(value: Ir) -> Ir {
    let magnitude = || tmp().at(1);
    block_([
        tmp().assign(value),
        if_(tmp().eq_(0), [putc_('0'), break_()]),
        if_(tmp().lt_(0), [putc_('-'), tmp().mul_assign(-1)]),
        for_(
            magnitude().assign(1),
            magnitude().le_(tmp()),
            magnitude().mul_assign(10),
            [],
        ),
        while_(
            magnitude().div_assign(10).gt_(0),
            [
                putc_(cast_(CastTo::Char, tmp() / magnitude()) + lit('0')),
                tmp().rem_assign(magnitude()),
            ],
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use imp_core::builder::var_;
    use imp_core::ir::Ir;
    use imp_interp::run;

    fn roundtrip(input: &str) -> String {
        let p = Ir::Seq(vec![
            var_("x").assign(read_int()),
            write_int(var_("x")),
        ]);
        run(&p, input).unwrap()
    }

    #[test]
    fn read_int_parses_unsigned() {
        assert_eq!(roundtrip("42"), "42");
        assert_eq!(roundtrip("  007  "), "7");
    }

    #[test]
    fn read_int_parses_signed() {
        assert_eq!(roundtrip("-17"), "-17");
        assert_eq!(roundtrip("   -9000"), "-9000");
    }

    #[test]
    fn read_int_without_digits_yields_unit() {
        let p = Ir::Seq(vec![
            var_("x").assign(read_int()),
            if_(var_("x").eq_(none()), [putc_('n')])
                .else_([putc_('y')]),
        ]);
        assert_eq!(run(&p, "abc").unwrap(), "n");
        assert_eq!(run(&p, "").unwrap(), "n");
        // A lone minus is not a number either.
        assert_eq!(run(&p, "-x").unwrap(), "n");
    }

    #[test]
    fn read_int_stops_at_the_first_non_digit() {
        let p = Ir::Seq(vec![
            var_("x").assign(read_int()),
            write_int(var_("x")),
            putc_(getc_()),
        ]);
        assert_eq!(run(&p, "12,").unwrap(), "12,");
    }

    #[test]
    fn write_int_zero_and_negatives() {
        let p = |n: i64| Ir::Seq(vec![write_int(lit(n))]);
        assert_eq!(run(&p(0), "").unwrap(), "0");
        assert_eq!(run(&p(-305), "").unwrap(), "-305");
        assert_eq!(run(&p(1), "").unwrap(), "1");
        assert_eq!(run(&p(120), "").unwrap(), "120");
    }

    #[test]
    fn read_char_skips_whitespace() {
        let p = Ir::Seq(vec![putc_(read_char()), putc_(read_char())]);
        assert_eq!(run(&p, "  a\n\t b").unwrap(), "ab");
    }

    #[test]
    fn is_space_classifies() {
        let p = |c: char| {
            Ir::Seq(vec![if_(is_space(lit(c)), [putc_('1')])
                .else_([putc_('0')])])
        };
        assert_eq!(run(&p(' '), "").unwrap(), "1");
        assert_eq!(run(&p('\t'), "").unwrap(), "1");
        assert_eq!(run(&p('x'), "").unwrap(), "0");
    }

    #[test]
    fn skip_whitespace_stops_at_end_of_input() {
        let p = Ir::Seq(vec![skip_whitespace(), putc_('.')]);
        assert_eq!(run(&p, "   ").unwrap(), ".");
    }
}
