#[macro_use]
mod common;

#[cfg(test)]
mod inheritance {
    tests! {
        inherit_methods in inheritance is OK
        "foo"
        "bar"
        "bar"
    }

    tests! {
        set_fields_from_base_class in inheritance is OK
        "foo 1"
        "foo 2"
        "bar 1"
        "bar 2"
    }

    tests! {
        constructors_are_inherited in inheritance is OK
        "inherited"
    }

    tests! {
        inherit_from_nil in inheritance is ERR(70)
        "[line 2] Error at 'Nil': Superclass must be a class."
    }

    tests! {
        inherit_from_number in inheritance is ERR(70)
        "[line 2] Error at 'Number': Superclass must be a class."
    }

    tests! {
        inherit_from_self in inheritance is ERR(65)
        "[line 1] Error at 'Foo': A class can't inherit from itself."
    }
}
