#[macro_use]
mod common;

#[cfg(test)]
mod logical_operator {
    tests! {
        and in logical_operator is OK
        "false"
        "1"
        "false"
        "true"
        "3"
    }

    tests! {
        or in logical_operator is OK
        "1"
        "1"
        "true"
        "false"
        "false"
    }

    tests! {
        and_truth in logical_operator is OK
        "false"
        "nil"
        "ok"
        "ok"
        "ok"
    }

    tests! {
        or_truth in logical_operator is OK
        "true"
        "0"
        "s"
        "ok"
        "ok"
    }
}
