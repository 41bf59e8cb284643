#[macro_use]
mod common;

#[cfg(test)]
mod method {
    tests! {
        call in method is OK
        "method call"
    }

    tests! {
        print_bound_method in method is OK
        "<fn bar>"
    }

    tests! {
        arity in method is ERR(70)
        "[line 5] Error at ')': Expected 2 arguments but got 1."
    }

    tests! {
        not_found in method is ERR(70)
        "[line 2] Error at 'unknown': Undefined property 'unknown'."
    }

    tests! {
        refer_to_name in method is ERR(70)
        "[line 3] Error at 'method': Undefined variable 'method'."
    }
}
