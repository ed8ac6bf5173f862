//! Sorts a comma-separated integer list from stdin and prints it as
//! `[a, b, ...]`.
//!
//! The sort is a recursive IMP lambda. The array lives in per-cell
//! compound names at the top scope; the lambda receives a *reference*
//! to it, so every recursion level reaches the same cells while its
//! own locals (bounds, cursors, merge buffer) stay isolated under its
//! scope depth.

use imp_core::builder::{
    block_, call, fn_, for_, global_, if_, lit, none, putc_, str_, var_, while_,
};
use imp_core::ir::Ir;
use imp_core::value::Marker;
use imp_std::io;
use imp_std::strings;

fn read_array(array: Ir, len: Ir) -> Ir {
    block_([
        array.clone().at(0).assign(io::read_int()),
        if_(array.clone().at(0).eq_(none()), [len.clone().assign(0)]).else_([for_(
            len.clone().assign(1),
            io::read_char().eq_(','),
            len.clone().pre_inc(),
            [array.at(len.deref_()).assign(io::read_int())],
        )]),
    ])
}

fn write_array(array: Ir, len: Ir) -> Ir {
    let i = || var_(Marker::new("array-io")).at(0);
    block_([
        putc_('['),
        for_(
            i().assign(0),
            i().lt_(len),
            i().pre_inc(),
            [
                if_(i().gt_(0), [strings::puts(str_(", "))]),
                io::write_int(array.at(i().deref_())),
            ],
        ),
        putc_(']'),
        putc_('\n'),
    ])
}

pub fn mergesort() -> Ir {
    let array = || var_("array");
    let lo = || var_("lo");
    let hi = || var_("hi");
    let mid = || var_("mid");
    let tmp = || var_("tmp");
    let i = || var_("i");
    let j = || var_("j");
    let k = || var_("k");
    let sort = || global_("mergesort");
    // The caller's cells, reached through the passed-in reference.
    let cells = || array().deref_().deref_();

    let body = if_(
        (lo() + 1).lt_(hi()),
        [
            mid().assign((lo() + hi()) / 2),
            call(
                sort().deref_(),
                [array().deref_(), lo().deref_(), mid().deref_()],
            ),
            call(
                sort().deref_(),
                [array().deref_(), mid().deref_(), hi().deref_()],
            ),
            i().assign(lo().deref_()),
            j().assign(mid().deref_()),
            for_(
                k().assign(0),
                i().lt_(mid()).and_(j().lt_(hi())),
                k().pre_inc(),
                [if_(
                    cells().at(i().deref_()).lt_(cells().at(j().deref_())),
                    [tmp()
                        .at(k().deref_())
                        .assign(cells().at(i().post_inc()).deref_())],
                )
                .else_([tmp()
                    .at(k().deref_())
                    .assign(cells().at(j().post_inc()).deref_())])],
            ),
            while_(
                i().lt_(mid()),
                [tmp()
                    .at(k().post_inc())
                    .assign(cells().at(i().post_inc()).deref_())],
            ),
            while_(
                j().lt_(hi()),
                [tmp()
                    .at(k().post_inc())
                    .assign(cells().at(j().post_inc()).deref_())],
            ),
            for_(
                block_([k().assign(0), i().assign(lo().deref_())]),
                i().lt_(hi()),
                block_([k().pre_inc(), i().pre_inc()]),
                [cells()
                    .at(i().deref_())
                    .assign(tmp().at(k().deref_()).deref_())],
            ),
        ],
    );

    Ir::Seq(vec![
        global_("mergesort").assign(fn_(["array", "lo", "hi"], [body])),
        read_array(var_("array"), var_("len")),
        call(
            global_("mergesort").deref_(),
            [var_("array").addr_(), lit(0), var_("len").deref_()],
        ),
        write_array(var_("array"), var_("len")),
    ])
}
