#[macro_use]
mod common;

#[cfg(test)]
mod function {
    tests! {
        print_function in function is OK
        "<fn foo>"
        "<native fn>"
    }

    tests! {
        parameters in function is OK
        "0"
        "1"
        "6"
    }

    tests! {
        recursion in function is OK
        "21"
    }

    tests! {
        mutual_recursion in function is OK
        "true"
        "true"
    }

    tests! {
        local_recursion in function is OK
        "21"
    }

    tests! {
        nested_call_with_arguments in function is OK
        "hello world"
    }

    tests! {
        missing_arguments in function is ERR(70)
        "[line 2] Error at ')': Expected 2 arguments but got 1."
    }

    tests! {
        extra_arguments in function is ERR(70)
        "[line 4] Error at ')': Expected 2 arguments but got 4."
    }

    tests! {
        body_must_be_block in function is ERR(65)
        "[line 1] Error at '123': Expect '{' before function body."
    }

    tests! {
        missing_comma_in_parameters in function is ERR(65)
        "[line 1] Error at 'c': Expect ')' after parameters."
    }

    tests! {
        too_many_arguments in function is ERR(65)
        "[line 257] Error at '256': Can't have more than 255 arguments."
    }

    tests! {
        too_many_parameters in function is ERR(65)
        "[line 257] Error at 'p256': Can't have more than 255 parameters."
    }
}
