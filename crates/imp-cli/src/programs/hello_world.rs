//! Greets whoever stdin names: skips leading whitespace with an IMP
//! lambda, reads the name into per-cell storage, trims trailing
//! whitespace, and prints a localized greeting.

use imp_core::builder::{
    block_, break_with, call, fn_, for_, getc_, none, str_, var_, while_,
};
use imp_core::ir::Ir;
use imp_std::strings::puts;

/// Greeting language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Francais,
    Chinese,
}

fn greeting(language: Language, name: Ir) -> Ir {
    match language {
        Language::English => block_([
            puts(str_("Hello, ")),
            puts(name),
            puts(str_("!\n")),
        ]),
        Language::Francais => block_([
            puts(str_("Bonjour, ")),
            puts(name),
            puts(str_(" !\n")),
        ]),
        Language::Chinese => block_([puts(name), puts(str_("好。\n"))]),
    }
}

pub fn hello_world(language: Language) -> Ir {
    let is_ws = || var_("is-whitespace");
    let name = || var_("name");
    let index = || var_("index");
    Ir::Seq(vec![
        is_ws().assign(fn_(
            ["ch"],
            [break_with(
                var_("ch")
                    .eq_(' ')
                    .or_(var_("ch").eq_('\t'))
                    .or_(var_("ch").eq_('\n')),
            )],
        )),
        // Drop whitespace; the first real byte lands in name[0].
        while_(
            call(is_ws().deref_(), [name().at(0).assign(getc_())]),
            [],
        ),
        index().assign(1),
        while_(
            name().at(index().deref_()).assign(getc_()).ne_(none()),
            [index().pre_inc()],
        ),
        // Trim trailing whitespace back to a Unit terminator.
        for_(
            index().pre_dec(),
            index()
                .ge_(0)
                .and_(call(is_ws().deref_(), [name().at(index().deref_())])),
            index().pre_dec(),
            [name().at(index().deref_()).assign(none())],
        ),
        greeting(language, name()),
    ])
}
