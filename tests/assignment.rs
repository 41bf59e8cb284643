#[macro_use]
mod common;

#[cfg(test)]
mod assignment {
    tests! {
        syntax in assignment is OK
        "var"
        "var"
    }

    tests! {
        associativity in assignment is OK
        "c"
        "c"
        "c"
    }

    tests! {
        global in assignment is OK
        "before"
        "after"
        "arg"
        "arg"
    }

    tests! {
        local in assignment is OK
        "before"
        "after"
        "arg"
        "arg"
    }

    tests! {
        grouping in assignment is ERR(65)
        "[line 2] Error at '=': Invalid assignment target."
    }

    tests! {
        infix_operator in assignment is ERR(65)
        "[line 3] Error at '=': Invalid assignment target."
    }

    tests! {
        prefix_operator in assignment is ERR(65)
        "[line 2] Error at '=': Invalid assignment target."
    }

    tests! {
        to_this in assignment is ERR(65)
        "[line 3] Error at '=': Invalid assignment target."
    }

    tests! {
        undefined in assignment is ERR(70)
        "[line 1] Error at 'unknown': Undefined variable 'unknown'."
    }
}
