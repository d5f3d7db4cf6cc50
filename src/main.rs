extern crate clap;
extern crate crossbeam;
extern crate env_logger;
#[macro_use]
extern crate failure;
extern crate image;
extern crate itertools;
extern crate juliabrot;
#[macro_use]
extern crate log;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use env_logger::Env;
use failure::Error;
use image::pnm::PNMEncoder;
use image::pnm::{PNMSubtype, SampleEncoding};
use image::ColorType;
use itertools::Itertools;
use juliabrot::explorer::ViewportField;
use juliabrot::{
    ColourMode, Delivery, Explorer, RenderScheduler, SchedulerConfig, SessionOutcome, View,
};
use std::fs::File;
use std::path::PathBuf;
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

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
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

fn validate_float(s: &str, err: &str) -> Result<(), String> {
    match f64::from_str(s) {
        Ok(f) if f.is_finite() => Ok(()),
        _ => Err(err.to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const ITERATIONS: &str = "iterations";
const POWER: &str = "power";
const MANDELBROT_X: &str = "mandelbrot-x";
const MANDELBROT_Y: &str = "mandelbrot-y";
const MANDELBROT_ZOOM: &str = "mandelbrot-zoom";
const JULIA_X: &str = "julia-x";
const JULIA_Y: &str = "julia-y";
const JULIA_ZOOM: &str = "julia-zoom";
const COLOUR_MODE: &str = "colour-mode";
const THREADS: &str = "threads";

// Camera arguments: which view and field each one sets.
const CAMERA: [(&str, View, ViewportField); 6] = [
    (MANDELBROT_X, View::Mandelbrot, ViewportField::CenterX),
    (MANDELBROT_Y, View::Mandelbrot, ViewportField::CenterY),
    (MANDELBROT_ZOOM, View::Mandelbrot, ViewportField::Zoom),
    (JULIA_X, View::Julia, ViewportField::CenterX),
    (JULIA_Y, View::Julia, ViewportField::CenterY),
    (JULIA_ZOOM, View::Julia, ViewportField::Zoom),
];

fn camera_arg<'a, 'b>(name: &'static str, help: &'static str) -> Arg<'a, 'b> {
    Arg::with_name(name)
        .required(false)
        .long(name)
        .takes_value(true)
        .allow_hyphen_values(true)
        .default_value("0")
        .validator(|s| validate_float(&s, "Could not parse camera coordinate"))
        .help(help)
}

fn args<'a>() -> ArgMatches<'a> {
    let colour_help = format!(
        "Colouring of both views: {}",
        ColourMode::ALL.iter().map(|mode| mode.name()).join(", ")
    );

    App::new("juliabrot")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Mandelbrot and Julia set renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file prefix; writes PREFIX-mandelbrot.ppm and PREFIX-julia.ppm"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("800x600")
                .validator(|s| validate_pair::<u16>(&s, 'x', "Could not parse output image size"))
                .help("Size of each output image"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("128")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        1_000_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 1000000",
                    )
                })
                .help("Maximum iterations per pixel"),
        )
        .arg(
            Arg::with_name(POWER)
                .required(false)
                .long(POWER)
                .short("p")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("2")
                .validator(|s| validate_float(&s, "Could not parse power"))
                .help("Exponent of the iterated map"),
        )
        .arg(camera_arg(MANDELBROT_X, "Real part of the Mandelbrot view's center"))
        .arg(camera_arg(MANDELBROT_Y, "Imaginary part of the Mandelbrot view's center"))
        .arg(camera_arg(MANDELBROT_ZOOM, "Zoom of the Mandelbrot view"))
        .arg(camera_arg(JULIA_X, "Real part of the Julia view's center"))
        .arg(camera_arg(JULIA_Y, "Imaginary part of the Julia view's center"))
        .arg(camera_arg(JULIA_ZOOM, "Zoom of the Julia view"))
        .arg(
            Arg::with_name(COLOUR_MODE)
                .required(false)
                .long(COLOUR_MODE)
                .short("c")
                .takes_value(true)
                .case_insensitive(true)
                .possible_values(&["BLACK_WHITE", "GRAY_SCALE", "COLOUR_FADE"])
                .default_value("BLACK_WHITE")
                .help(&colour_help),
        )
        .arg(
            Arg::with_name(THREADS)
                .required(false)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        usize::max_value(),
                        "Could not parse thread count",
                        "Thread count must be at least 1",
                    )
                })
                .help("Number of fragments each render is split into [default: CPU count]"),
        )
        .get_matches()
}

fn explorer_from(matches: &ArgMatches) -> Result<Explorer, Error> {
    let mut explorer = Explorer::default();
    explorer.set_iterations_text(matches.value_of(ITERATIONS).unwrap_or_default())?;
    explorer.set_power_text(matches.value_of(POWER).unwrap_or_default())?;
    for &(name, view, field) in CAMERA.iter() {
        explorer.set_viewport_text(view, field, matches.value_of(name).unwrap_or_default())?;
    }
    if let Some(mode) = matches.value_of(COLOUR_MODE) {
        explorer.colour_mode = ColourMode::from_str(mode).map_err(|e| format_err!("{}", e))?;
    }
    Ok(explorer)
}

fn write_image(path: &PathBuf, delivery: &Delivery) -> Result<(), Error> {
    let output = File::create(path)?;
    let mut encoder =
        PNMEncoder::new(output).with_subtype(PNMSubtype::Pixmap(SampleEncoding::Binary));
    encoder.encode(
        delivery.image.as_bytes(),
        delivery.image.width() as u32,
        delivery.image.height() as u32,
        ColorType::RGB(8),
    )?;
    Ok(())
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    let (width, height) = parse_pair::<u16>(matches.value_of(SIZE).unwrap_or_default(), 'x')
        .ok_or_else(|| format_err!("Error parsing image dimensions"))?;
    let threads = match matches.value_of(THREADS) {
        Some(threads) => usize::from_str(threads)?,
        None => num_cpus::get(),
    };
    let prefix = matches.value_of(OUTPUT).unwrap_or_default();
    let explorer = explorer_from(matches)?;

    let (sender, receiver) = crossbeam::channel::unbounded();
    let scheduler = RenderScheduler::new(
        SchedulerConfig::with_fragments(threads),
        move |delivery: Delivery| {
            // The receiver outlives every session; a failed send only
            // means main has already given up.
            let _ = sender.send(delivery);
        },
    );

    let tickets = [View::Mandelbrot, View::Julia]
        .iter()
        .map(|&view| {
            scheduler.request_render(explorer.snapshot(view, width as usize, height as usize))
        })
        .collect::<Result<Vec<_>, _>>()?;

    for ticket in tickets {
        let view = ticket.view();
        match ticket.wait() {
            SessionOutcome::Delivered => (),
            SessionOutcome::Cancelled => bail!("{} render was cancelled", view),
            SessionOutcome::Failed(e) => bail!("{} render failed: {}", view, e),
        }
    }

    for delivery in receiver.try_iter() {
        let path = PathBuf::from(format!("{}-{}.ppm", prefix, delivery.view));
        write_image(&path, &delivery)?;
        info!("wrote {}", path.display());
    }
    Ok(())
}

fn main() {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let matches = args();
    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
