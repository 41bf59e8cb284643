#[macro_use]
mod common;

#[cfg(test)]
mod _super {
    tests! {
        call_other_method in super is OK
        "Derived.bar()"
        "Base.foo()"
    }

    tests! {
        call_same_method in super is OK
        "Derived.foo()"
        "Base.foo()"
    }

    tests! {
        super_in_inherited_method in super is OK
        "A"
    }

    tests! {
        super_in_closure_in_inherited_method in super is OK
        "A"
    }

    tests! {
        constructor in super is OK
        "Derived.init()"
        "Base.init(a, b)"
    }

    tests! {
        bound_method in super is OK
        "A.method(arg)"
    }

    tests! {
        indirectly_inherited in super is OK
        "C.foo()"
        "A.foo()"
    }

    tests! {
        reassign_superclass in super is OK
        "Base.method()"
        "Base.method()"
    }

    tests! {
        this_in_superclass_method in super is OK
        "a"
        "b"
    }

    tests! {
        no_superclass_call in super is ERR(65)
        "[line 3] Error at 'super': Can't use 'super' in a class with no superclass."
    }

    tests! {
        no_superclass_method in super is ERR(70)
        "[line 5] Error at 'doesNotExist': Undefined property 'doesNotExist'."
    }

    tests! {
        super_at_top_level in super is ERR(65)
        "[line 1] Error at 'super': Can't use 'super' outside of a class."
        "[line 2] Error at 'super': Can't use 'super' outside of a class."
    }

    tests! {
        super_in_top_level_function in super is ERR(65)
        "[line 2] Error at 'super': Can't use 'super' outside of a class."
    }

    tests! {
        super_without_dot in super is ERR(65)
        "[line 5] Error at ';': Expect '.' after 'super'."
        "[line 6] Error at '}': Expect expression."
    }
}
