use std::{env, io, process};

use basalt_lang::basalt;

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut stdout = io::stdout();
    let mut basalt = basalt::new(&mut stdout);

    match args.len() {
        n if n > 2 => {
            println!("Usage: basalt [script]");
            process::exit(64);
        },
        2 => basalt.run_file(args[1].clone()),
        _ => basalt.run_prompt(),
    };
}
