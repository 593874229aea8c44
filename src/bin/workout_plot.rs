use workout_plot::plot::parse_cli;
use workout_plot::{TimeReps, TimingError};

fn main() -> Result<(), TimingError> {
    let (csvin, pngout, config) = parse_cli();
    println!(
        "read workout timings from {} and plot to {}",
        csvin.display(),
        pngout.display()
    );
    let tr = TimeReps::from_csv(csvin)?;
    tr.plot_timings(pngout, &config)?;
    Ok(())
}
