#[macro_use]
mod common;

#[cfg(test)]
mod variable {
    tests! {
        early_bound in variable is OK
        "outer"
        "outer"
    }

    tests! {
        in_middle_of_block in variable is OK
        "a"
        "a b"
        "a c"
        "a b d"
    }

    tests! {
        in_nested_block in variable is OK
        "outer"
    }

    tests! {
        scope_reuse_in_different_blocks in variable is OK
        "first"
        "second"
    }

    tests! {
        shadow_and_local in variable is OK
        "outer"
        "inner"
    }

    tests! {
        shadow_global in variable is OK
        "shadow"
        "global"
    }

    tests! {
        redefine_global in variable is OK
        "2"
    }

    tests! {
        uninitialized in variable is OK
        "nil"
    }

    tests! {
        duplicate_local in variable is ERR(65)
        "[line 3] Error at 'a': Already a variable with this name in this scope."
    }

    tests! {
        duplicate_parameter in variable is ERR(65)
        "[line 1] Error at 'arg': Already a variable with this name in this scope."
    }

    tests! {
        use_local_in_initializer in variable is ERR(65)
        "[line 3] Error at 'a': Can't read local variable in its own initializer."
    }

    tests! {
        undefined_global in variable is ERR(70)
        "[line 1] Error at 'notDefined': Undefined variable 'notDefined'."
    }

    tests! {
        undefined_local in variable is ERR(70)
        "[line 1] Error at 'notDefined': Undefined variable 'notDefined'."
    }

    tests! {
        use_nil_as_var in variable is ERR(65)
        "[line 1] Error at 'nil': Expect variable name."
    }

    tests! {
        use_false_as_var in variable is ERR(65)
        "[line 1] Error at 'false': Expect variable name."
    }
}
