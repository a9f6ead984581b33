
extern crate clap;
#[macro_use] extern crate log;
extern crate fern;
extern crate chrono;
extern crate term_grid;
extern crate thiserror;

pub mod assembler;

use clap::{Arg, ArgMatches, App};
use term_grid::{Grid, GridOptions, Direction, Filling, Cell};

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::assembler::arena::Arena;
use crate::assembler::lexer;
use crate::assembler::validator::Validator;

/// Fixed capacity for the source arena, released whole at the end.
const ARENA_CAPACITY: usize = 4 * 1024 * 1024;

fn main() {
    let args = process_arguments();
    initialize_logging(args.occurrences_of("verbose"));

    debug!("Arguments:\n\tVerbosity: {}\n\tOutfile: {}\n\tInfile: {}",
        match args.occurrences_of("verbose") {
            0 => log::LevelFilter::Error.to_string(),
            1 => log::LevelFilter::Warn.to_string(),
            2 => log::LevelFilter::Info.to_string(),
            3 | _ => log::LevelFilter::Debug.to_string(),
        },
        args.value_of("output").unwrap_or("None"),
        args.value_of("INPUT").unwrap()
    );

    let ifile = args.value_of("INPUT").unwrap();
    // Read the specified input file.
    let ipath = Path::new(ifile);

    // Open the path in read-only mode, returns `io::Result<File>`
    let mut ifile = match File::open(&ipath) {
        Err(err) => {
            error!("fatal: unable to open input file `{}`: {}", ipath.display(), err);
            std::process::exit(1);
        },
        Ok(file) => file,
    };

    let mut raw: Vec<u8> = Vec::new();
    if let Err(err) = ifile.read_to_end(&mut raw) {
        error!("fatal: unable to read input file `{}`: {}", ipath.display(), err);
        std::process::exit(1);
    }

    // Everything downstream of here is a view into the arena.
    let mut arena = match Arena::with_capacity(ARENA_CAPACITY) {
        Err(err) => {
            error!("fatal: {}", err);
            std::process::exit(1);
        },
        Ok(arena) => arena,
    };
    let source = match arena.alloc_copy(&raw) {
        Err(err) => {
            error!("fatal: {}", err);
            std::process::exit(1);
        },
        Ok(span) => span,
    };
    let src = arena.bytes(source);

    let mut lines = lexer::split_lines(src);
    let tokens = match lexer::tokenize(src, &mut lines) {
        Err(err) => {
            error!("fatal: {}", err);
            std::process::exit(1);
        },
        Ok(tokens) => tokens,
    };
    info!("tokenized {} line(s) into {} token(s)", lines.len(), tokens.len());

    let state = match Validator::new(src, &tokens).run() {
        Err(err) => {
            error!("fatal: {}", err);
            std::process::exit(1);
        },
        Ok(state) => state,
    };
    info!("structure ok: data section {}, code section {}",
        if state.data_section.is_some() { "declared" } else { "absent" },
        if state.code_section.is_some() { "declared" } else { "absent" }
    );

    if args.is_present("print-debug") {
        println!("{}", render_listing(src, &tokens));
    }

    if let Some(filename) = args.value_of("output") {
        let opath = Path::new(filename);

        let mut ofile = match File::create(&opath) {
            Err(err) => {
                error!("fatal: unable to open output file `{}`: {}", opath.display(), err);
                std::process::exit(1);
            },
            Ok(file) => file,
        };

        if let Err(err) = ofile.write_all(render_listing(src, &tokens).as_bytes()) {
            error!("fatal: unable to write to output file `{}`: {}", opath.display(), err);
            std::process::exit(1);
        }
    }

    arena.release();
}

/// Renders the token listing: position, kind, and source text per token.
fn render_listing(src: &[u8], tokens: &[lexer::Token]) -> String {
    let mut grid = Grid::new(GridOptions {
        filling:     Filling::Spaces(1),
        direction:   Direction::LeftToRight,
    });

    for token in tokens.iter() {
        grid.add(Cell::from(format!("{}:{}:", token.line, token.column)));
        grid.add(Cell::from(token.kind.name().to_string()));
        grid.add(Cell::from(format!("`{}`", token.text(src))));
    }

    grid.fit_into_columns(3).to_string()
}

fn process_arguments() -> ArgMatches<'static> {
    App::new(option_env!("CARGO_PKG_NAME").unwrap())
        .version(option_env!("CARGO_PKG_VERSION").unwrap())
        .author(option_env!("CARGO_PKG_AUTHORS").unwrap())
        .about(option_env!("CARGO_PKG_DESCRIPTION").unwrap())
        .arg(Arg::with_name("INPUT")
            .help("Sets the input file to use")
            .required(true)
            .multiple(false)
            .index(1))
        .arg(Arg::with_name("verbose")
            .short("v")
            .multiple(true)
            .takes_value(false)
            .help("Sets the level of verbosity"))
        .arg(Arg::with_name("output")
            .short("o")
            .takes_value(true)
            .help("write the token listing to an outfile"))
        .arg(Arg::with_name("print-debug")
            .short("d")
            .alias("show")
            .alias("s")
            .takes_value(false)
            .help("prints the token listing to STDOUT"))
        .get_matches()
}

fn initialize_logging(verbosity: u64) {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(match verbosity {
            0 => log::LevelFilter::Error,
            1 => log::LevelFilter::Warn,
            2 => log::LevelFilter::Info,
            3 | _ => log::LevelFilter::Debug,
        })
        .chain(std::io::stdout())
        .apply().ok();
}
