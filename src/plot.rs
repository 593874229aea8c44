use super::{PlotConfig, VERSION};
use clap::{App, Arg};
use std::path::PathBuf;

/// Takes the CLI arguments that control the plotting of the workout timings.
/// All arguments have defaults, running with none reads data.csv and
/// writes figure.png in the current directory.
pub fn parse_cli() -> (PathBuf, PathBuf, PlotConfig) {
    let arg_csvin = Arg::with_name("input_csvfile")
        .help("name of the csv file with the workout timings")
        .short("f")
        .long("csvfile")
        .takes_value(true)
        .required(true)
        .default_value("data.csv");
    let arg_pngout = Arg::with_name("output_pngfile")
        .help("name of the output png file")
        .short("o")
        .long("pngfile")
        .takes_value(true)
        .default_value("figure.png");
    let arg_days = Arg::with_name("tick_days")
        .help("days between two date ticks on the x axis")
        .short("d")
        .long("days")
        .takes_value(true)
        .default_value("2");
    let arg_marker = Arg::with_name("marker_size")
        .help("radius of the data point markers, in pixels")
        .short("m")
        .long("marker")
        .takes_value(true)
        .default_value("4");
    let cli_args = App::new("Workout_plot")
        .version(VERSION.unwrap_or("unknown"))
        .about("cli app to plot the workout timing progression")
        .arg(arg_csvin)
        .arg(arg_pngout)
        .arg(arg_days)
        .arg(arg_marker)
        .get_matches();
    let csvin = PathBuf::from(cli_args.value_of("input_csvfile").unwrap_or_default());
    let pngout = PathBuf::from(cli_args.value_of("output_pngfile").unwrap_or_default());
    let tick_days = cli_args
        .value_of("tick_days")
        .unwrap_or_default()
        .parse::<i64>()
        .unwrap();
    let marker_size = cli_args
        .value_of("marker_size")
        .unwrap_or_default()
        .parse::<i32>()
        .unwrap();
    let config = PlotConfig {
        tick_days,
        marker_size,
    };
    return (csvin, pngout, config);
}
