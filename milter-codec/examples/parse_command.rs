//! Reads milter frames from stdin and prints the decoded messages.
//!
//! Feed it raw wire bytes, e.g. a capture of a filter's traffic:
//!
//! ```sh
//! cargo run --example parse_command < capture.bin
//! ```

use std::io::Read;

use milter_codec::Decoder;

fn main() {
    let mut input = Vec::new();
    std::io::stdin()
        .read_to_end(&mut input)
        .expect("failed to read stdin");

    let mut decoder = Decoder::with_default_limit();
    decoder.feed(&input);

    loop {
        match decoder.read_one() {
            Ok(Some(message)) => println!("{message:#?}"),
            Ok(None) => {
                if decoder.buffered_len() > 0 {
                    eprintln!(
                        "{} trailing byte(s) do not form a complete frame",
                        decoder.buffered_len()
                    );
                }
                break;
            }
            Err(err) => {
                eprintln!("framing error: {err}");
                break;
            }
        }
    }
}
