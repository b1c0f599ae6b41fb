use std::process::exit;

fn main() {
    println!("gambit v{}, by {}", env!("CARGO_PKG_VERSION"), env!("CARGO_PKG_AUTHORS"));

    let perft_mode = std::env::args().nth(1).as_deref() == Some("perft");

    // Launches a perft test
    if perft_mode {
        let expected_format = "Expected : perft <depth> [<FEN>]";
        let depth = match std::env::args().nth(2).and_then(|d| d.parse::<usize>().ok()) {
            Some(d) => d,
            None => {
                eprintln!("{}", expected_format);
                exit(2);
            }
        };
        // The FEN may be passed quoted or as separate words
        let fen_words: Vec<String> = std::env::args().skip(3).collect();
        let fen = if fen_words.is_empty() {
            None
        } else {
            Some(fen_words.join(" "))
        };

        if let Err(e) = gambit::perft(depth, fen) {
            eprintln!("{}", e);
            exit(1);
        }
    } else {
        gambit::cli::Cli::default().run()
    }
}
