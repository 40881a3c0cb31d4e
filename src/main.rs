//! fencemark CLI - Markdown with fenced containers to HTML

use std::io::{self, Read, Write};

fn main() -> io::Result<()> {
    let mut options = fencemark::Options::default();
    let mut path = None;

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--no-containers" => options.containers = false,
            "-" => path = None,
            _ => path = Some(arg),
        }
    }

    // Read from the given file, or stdin
    let input = match path {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let html = fencemark::to_html_with_options(&input, &options);
    io::stdout().write_all(html.as_bytes())?;

    Ok(())
}
