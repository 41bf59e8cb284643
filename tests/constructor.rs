#[macro_use]
mod common;

#[cfg(test)]
mod constructor {
    tests! {
        default in constructor is OK
        "Foo instance"
    }

    tests! {
        arguments in constructor is OK
        "init"
        "1"
        "2"
    }

    tests! {
        call_init_explicitly in constructor is OK
        "Foo.init(one)"
        "Foo.init(two)"
        "Foo instance"
        "init"
    }

    tests! {
        early_return in constructor is OK
        "init"
        "Foo instance"
    }

    tests! {
        returns_this in constructor is OK
        "Foo instance"
    }

    tests! {
        return_value in constructor is ERR(65)
        "[line 3] Error at 'return': Can't return a value from an initializer."
    }

    tests! {
        default_arguments in constructor is ERR(70)
        "[line 3] Error at ')': Expected 0 arguments but got 3."
    }

    tests! {
        extra_arguments in constructor is ERR(70)
        "[line 8] Error at ')': Expected 2 arguments but got 4."
    }

    tests! {
        missing_arguments in constructor is ERR(70)
        "[line 5] Error at ')': Expected 2 arguments but got 1."
    }
}
