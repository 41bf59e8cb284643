#[macro_use]
mod common;

#[cfg(test)]
mod _while {
    tests! {
        syntax in while is OK
        "1"
        "2"
        "3"
    }

    tests! {
        statement_bodies in while is OK
        "ok"
    }

    tests! {
        return_inside in while is OK
        "i"
    }

    tests! {
        closure_in_body in while is OK
        "1"
        "2"
        "3"
    }

    tests! {
        var_in_body in while is ERR(65)
        "[line 1] Error at 'var': Expect expression."
    }

    tests! {
        class_in_body in while is ERR(65)
        "[line 1] Error at 'class': Expect expression."
    }
}
