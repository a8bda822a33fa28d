extern crate clap;
extern crate env_logger;
extern crate log;
extern crate shardbrot;

use clap::{App, Arg, ArgMatches};
use log::info;
use shardbrot::config::{
    check_dimensions, default_workers, DEFAULT_HEIGHT, DEFAULT_ITERATIONS, DEFAULT_WIDTH,
    MAX_WORKERS,
};
use shardbrot::{render_mandelbrot, write_image, write_text, RenderConfig, RenderError};
use std::io;
use std::str::FromStr;

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn validate_size(s: &str) -> Result<(), String> {
    match parse_pair::<usize>(s, 'x') {
        Some((w, h)) if w == 0 || h == 0 => Err("Image dimensions must be positive".to_string()),
        Some((w, h)) => check_dimensions(w, h).map_err(|_| "Image is too large".to_string()),
        None => Err("Could not parse output image size".to_string()),
    }
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const THREADS: &str = "threads";
const ITERATIONS: &str = "iterations";
const ASCII: &str = "ascii";

fn args<'a>(
    default_size: &'a str,
    default_iterations: &'a str,
    default_threads: &'a str,
) -> ArgMatches<'a> {
    App::new("shardbrot")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Sharded Mandelbrot renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(false)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .default_value("image.png")
                .help("Output file; .pgm and .pnm write a binary graymap"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value(default_size)
                .validator(|s| validate_size(&s))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(THREADS)
                .required(false)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .default_value(default_threads)
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        MAX_WORKERS,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", MAX_WORKERS),
                    )
                })
                .help("Number of shards to render in parallel"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value(default_iterations)
                .validator(|s| {
                    validate_range(
                        &s,
                        1u32,
                        200_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 200000",
                    )
                })
                .help("Iteration cap per pixel"),
        )
        .arg(
            Arg::with_name(ASCII)
                .long(ASCII)
                .help("Print the image as text on stdout instead of writing a file"),
        )
        .get_matches()
}

fn run(matches: &ArgMatches) -> Result<(), RenderError> {
    // The validators have already vetted these.
    let (width, height) =
        parse_pair::<usize>(matches.value_of(SIZE).unwrap_or_default(), 'x').unwrap_or((0, 0));
    let threads = matches
        .value_of(THREADS)
        .and_then(|s| usize::from_str(s).ok())
        .unwrap_or(0);
    let iterations = matches
        .value_of(ITERATIONS)
        .and_then(|s| u32::from_str(s).ok())
        .unwrap_or(0);

    let config = RenderConfig::new(width, height, iterations, threads)?;
    let canvas = render_mandelbrot(&config)?;

    if matches.is_present(ASCII) {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        return write_text(&mut handle, &canvas);
    }

    let output = matches.value_of(OUTPUT).unwrap_or("image.png");
    info!("Saving image to {}", output);
    write_image(output, &canvas)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let default_size = format!("{}x{}", DEFAULT_WIDTH, DEFAULT_HEIGHT);
    let default_iterations = DEFAULT_ITERATIONS.to_string();
    let default_threads = default_workers().to_string();
    let matches = args(&default_size, &default_iterations, &default_threads);

    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
