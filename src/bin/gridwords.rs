extern crate clap;
use clap::{App, Arg};
use gridwords::Board;
use log::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let matches = App::new("gridwords")
        .arg(
            Arg::with_name("board")
                .short("b")
                .long("board")
                .value_name("FILE")
                .help("Board letters, row-major; whitespace is ignored")
                .required(true),
        )
        .arg(
            Arg::with_name("width")
                .short("w")
                .long("width")
                .value_name("WIDTH")
                .help("Board width. Required if the board is not a square"),
        )
        .arg(
            Arg::with_name("height")
                .short("h")
                .long("height")
                .value_name("HEIGHT")
                .help("Board height. Required if the board is not a square"),
        )
        .arg(
            Arg::with_name("dict")
                .short("d")
                .long("dict")
                .value_name("FILE")
                .help("Word list, one candidate word per line")
                .required(true),
        )
        .arg(
            Arg::with_name("min-length")
                .short("m")
                .long("min-length")
                .value_name("N")
                .help("Minimum word length (default 4)"),
        )
        .arg(
            Arg::with_name("case-sensitive")
                .short("c")
                .long("case-sensitive")
                .help("Match letter case exactly instead of folding")
                .takes_value(false),
        )
        .get_matches();

    let board_path = matches.value_of("board").expect("board not included");
    let contents = std::fs::read_to_string(board_path)?;
    let letters: Vec<char> = contents.chars().filter(|c| !c.is_whitespace()).collect();

    let board = match (matches.value_of("width"), matches.value_of("height")) {
        (Some(width), Some(height)) => {
            Board::new(width.parse()?, height.parse()?, letters)?
        }
        (None, None) => {
            let width = (letters.len() as f64).sqrt() as usize;
            Board::new(width, width, letters)?
        }
        _ => return Err("width and height must be given together".into()),
    };

    let min_word_length = match matches.value_of("min-length") {
        Some(value) => value.parse()?,
        None => 4,
    };
    let case_sensitive = matches.is_present("case-sensitive");

    info!("solving {}x{} board", board.width(), board.height());

    let mut words = board.solve_file(
        matches.value_of("dict").expect("dict not included"),
        min_word_length,
        case_sensitive,
    )?;
    words.sort();

    info!("found {} words", words.len());
    for word in words {
        println!("{}", word);
    }

    Ok(())
}
