#[macro_use]
mod common;

#[cfg(test)]
mod comment {
    tests! {
        line_at_eof in comment is OK
        "ok"
    }

    tests! {
        only_line_comment in comment is OK
    }

    tests! {
        block in comment is OK
        "ok"
    }

    tests! {
        block_mid_line in comment is OK
        "3"
    }

    tests! {
        unterminated_block in comment is ERR(65)
        "[line 1] Error: Unterminated block comment."
    }
}
