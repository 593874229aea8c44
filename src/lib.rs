use chrono::prelude::*;
use plotters::prelude::*;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
pub mod error;
pub mod plot;

pub use error::TimingError;

pub const VERSION: Option<&'static str> = option_env!("CARGO_PKG_VERSION");

/// Format of the date column and of the x axis labels.
pub const DATE_FMT: &str = "%d/%m/%Y";

pub const CHART_TITLE: &str = "100 push-ups and squats every 2 days: timing progression";

const COL_DATE: &str = "date";
const COL_PUSHUPS: &str = "pushups_time";
const COL_SQUATS: &str = "squats_time";

/// Options for the rendered chart, the values that used to differ
/// between runs: spacing of the date ticks and size of the markers.
#[derive(Debug, Clone)]
pub struct PlotConfig {
    /// days between two date ticks on the x axis
    pub tick_days: i64,
    /// radius of the data point markers, in pixels
    pub marker_size: i32,
}

impl Default for PlotConfig {
    fn default() -> PlotConfig {
        PlotConfig {
            tick_days: 2,
            marker_size: 4,
        }
    }
}

/// The main struct for the workout time series: for each training day,
/// the date and the seconds taken to complete the 100 push-ups and the
/// 100 squats. The three vectors are index-aligned and always have the
/// same length. Rows are kept in file order, dates are not reordered.
#[derive(Debug, Clone)]
pub struct TimeReps {
    pub date: Vec<NaiveDate>,
    pub pushups: Vec<i64>,
    pub squats: Vec<i64>,
}

impl TimeReps {
    /// Initiate a new TimeReps instance
    /// using the given capacity for the three vectors.
    pub fn new(capacity: usize) -> TimeReps {
        let date: Vec<NaiveDate> = Vec::with_capacity(capacity);
        let pushups: Vec<i64> = Vec::with_capacity(capacity);
        let squats: Vec<i64> = Vec::with_capacity(capacity);
        TimeReps {
            date,
            pushups,
            squats,
        }
    }

    /// Reads the workout log from a csv file with a header line.
    /// The date, pushups_time and squats_time columns are found by
    /// header name, their order in the file does not matter.
    /// The load is all or nothing: the first row that fails to parse
    /// aborts it, reporting the offending line.
    pub fn from_csv<P>(fin: P) -> Result<TimeReps, TimingError>
    where
        P: AsRef<Path>,
    {
        let file = File::open(fin)?;
        let mut rdr = csv::Reader::from_reader(BufReader::new(file));
        let headers = rdr.headers()?.clone();
        let idate = column_index(&headers, COL_DATE)?;
        let ipushups = column_index(&headers, COL_PUSHUPS)?;
        let isquats = column_index(&headers, COL_SQUATS)?;
        let mut timereps = TimeReps::new(365);
        for (i, record) in rdr.records().enumerate() {
            let record = record?;
            let line = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(i + 2);
            let date_str = record.get(idate).unwrap_or_default();
            let date =
                NaiveDate::parse_from_str(date_str, DATE_FMT).map_err(|e| TimingError::Date {
                    line,
                    value: date_str.to_string(),
                    source: e,
                })?;
            let pushups = duration_seconds(record.get(ipushups).unwrap_or_default()).map_err(
                |e| TimingError::Row {
                    line,
                    source: Box::new(e),
                },
            )?;
            let squats = duration_seconds(record.get(isquats).unwrap_or_default()).map_err(
                |e| TimingError::Row {
                    line,
                    source: Box::new(e),
                },
            )?;
            timereps.date.push(date);
            timereps.pushups.push(pushups);
            timereps.squats.push(squats);
        }
        Ok(timereps)
    }

    /// Plots the push-ups and squats timings to a png file,
    /// overwriting it if present.
    /// An empty series is not an error: the chart falls back to a
    /// default axis span and is drawn with no data points.
    pub fn plot_timings<P>(&self, fout: P, config: &PlotConfig) -> Result<(), TimingError>
    where
        P: AsRef<Path>,
    {
        self.draw_png(fout.as_ref(), config)
            .map_err(|e| TimingError::Render(e.to_string()))
    }

    fn draw_png(&self, fout: &Path, config: &PlotConfig) -> Result<(), Box<dyn std::error::Error>> {
        let (xmin, xmax) = match min_and_max(self.date.iter().copied()) {
            Some((a, b)) if a == b => (a, b + chrono::Duration::days(1)),
            Some((a, b)) => (a, b),
            None => {
                let d = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
                (d, d + chrono::Duration::days(14))
            }
        };
        let seconds = self
            .pushups
            .iter()
            .chain(self.squats.iter())
            .map(|&s| s as f64);
        let (ymin, ymax) = match min_and_max(seconds) {
            Some((a, b)) => {
                let margin = ((b - a) / 10f64).max(1f64);
                ((a - margin).max(0f64), b + margin)
            }
            None => (0f64, 360f64),
        };
        let xspan: chrono::Duration = xmax - xmin;
        let xlabels = (xspan.num_days() / config.tick_days.max(1) + 1) as usize;
        let root = BitMapBackend::new(fout, (1600, 800)).into_drawing_area();
        root.fill(&WHITE)?;
        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .caption(CHART_TITLE, ("sans-serif", 32))
            .x_label_area_size(120)
            .y_label_area_size(90)
            .build_cartesian_2d(xmin..xmax, ymin..ymax)?;
        chart
            .configure_mesh()
            .light_line_style(&TRANSPARENT)
            .bold_line_style(RGBColor(150, 150, 150).stroke_width(1))
            .set_all_tick_mark_size(2)
            .label_style(("sans-serif", 20))
            .x_label_style(
                ("sans-serif", 20)
                    .into_font()
                    .transform(FontTransform::Rotate90),
            )
            .x_labels(xlabels)
            .y_labels(10)
            .x_label_formatter(&|d: &NaiveDate| d.format(DATE_FMT).to_string())
            .y_label_formatter(&|y: &f64| seconds_label(*y))
            .y_desc("time to 100 reps")
            .x_desc(format!("date [{}]", DATE_FMT.replace('%', "").to_lowercase()))
            .draw()?;
        let series: [(&str, &[i64], RGBColor); 2] = [
            ("push-ups", &self.pushups, BLUE),
            ("squats", &self.squats, RED),
        ];
        for &(name, seconds, color) in series.iter() {
            let points: Vec<(NaiveDate, f64)> = self
                .date
                .iter()
                .zip(seconds.iter())
                .map(|(&d, &s)| (d, s as f64))
                .collect();
            chart
                .draw_series(LineSeries::new(
                    points.iter().copied(),
                    color.stroke_width(2),
                ))?
                .label(name)
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });
            chart.draw_series(
                points
                    .iter()
                    .map(|&(d, s)| Circle::new((d, s), config.marker_size, color.filled())),
            )?;
        }
        chart
            .configure_series_labels()
            .border_style(&BLACK)
            .background_style(&WHITE.mix(0.8))
            .label_font(("sans-serif", 22))
            .draw()?;
        root.present()?;
        Ok(())
    }
}

impl std::fmt::Display for TimeReps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "date,pushups_s,squats_s\n")?;
        for ((d, p), s) in self
            .date
            .iter()
            .zip(self.pushups.iter())
            .zip(self.squats.iter())
        {
            write!(f, "{},{},{}\n", d.format(DATE_FMT), p, s)?
        }
        Ok(())
    }
}

/// Parses a duration given as minutes and seconds separated by an
/// apostrophe, e.g. "3'45", to the total number of seconds.
/// Both parts must be non-negative integers and the separator must
/// appear exactly once.
pub fn duration_seconds(s: &str) -> Result<i64, TimingError> {
    let mut parts = s.split('\'');
    let minutes = parts.next().unwrap_or_default();
    let seconds = match parts.next() {
        Some(p) => p,
        None => {
            return Err(TimingError::Duration {
                value: s.to_string(),
                reason: String::from("missing ' separator"),
            })
        }
    };
    if parts.next().is_some() {
        return Err(TimingError::Duration {
            value: s.to_string(),
            reason: String::from("more than one ' separator"),
        });
    }
    let minutes = duration_part(s, minutes)?;
    let seconds = duration_part(s, seconds)?;
    Ok(minutes * 60 + seconds)
}

fn duration_part(full: &str, part: &str) -> Result<i64, TimingError> {
    match part.trim().parse::<u32>() {
        Ok(v) => Ok(i64::from(v)),
        Err(e) => Err(TimingError::Duration {
            value: full.to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Renders a y tick value, a number of seconds, as minutes and seconds,
/// e.g. 90.0 becomes "01m30s". The tick values are picked by the chart
/// mesh, they need not be values present in the data.
pub fn seconds_label(x: f64) -> String {
    let minutes = (x / 60f64).floor();
    let seconds = x % 60f64;
    format!("{:02.0}m{:02.0}s", minutes, seconds)
}

fn column_index(headers: &csv::StringRecord, name: &'static str) -> Result<usize, TimingError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or(TimingError::MissingColumn(name))
}

/// Smallest and largest value yielded by the iterator,
/// None when the iterator is empty.
pub fn min_and_max<T, I>(mut iter: I) -> Option<(T, T)>
where
    T: std::cmp::PartialOrd + Copy,
    I: Iterator<Item = T>,
{
    let first = iter.next()?;
    let (mut min, mut max) = (first, first);
    for v in iter {
        if v > max {
            max = v
        }
        if v < min {
            min = v
        }
    }
    Some((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;
    // run tests with:
    // cargo test -- --nocapture
    // to allow println! to stdout

    #[test]
    fn duration_parsing() {
        assert_eq!(duration_seconds("3'45").unwrap(), 225);
        assert_eq!(duration_seconds("0'59").unwrap(), 59);
        assert_eq!(duration_seconds("0'0").unwrap(), 0);
        assert_eq!(duration_seconds("120'05").unwrap(), 7205);
    }

    #[test]
    fn duration_roundtrip() {
        for m in &[0i64, 1, 3, 59, 120] {
            for s in &[0i64, 5, 30, 59] {
                let txt = format!("{}'{:02}", m, s);
                assert_eq!(duration_seconds(&txt).unwrap(), m * 60 + s);
            }
        }
    }

    #[test]
    fn duration_rejects_malformed() {
        for bad in &["3-45", "345", "3'4'5", "x'10", "3'x", "3'-45", "'", ""] {
            assert!(
                matches!(duration_seconds(bad), Err(TimingError::Duration { .. })),
                "accepted malformed duration {:?}",
                bad
            );
        }
    }

    #[test]
    fn seconds_label_minutes_and_seconds() {
        assert_eq!(seconds_label(90.0), "01m30s");
        assert_eq!(seconds_label(0.0), "00m00s");
        assert_eq!(seconds_label(125.0), "02m05s");
        assert_eq!(seconds_label(59.0), "00m59s");
    }

    #[test]
    fn seconds_label_above_two_digits() {
        assert_eq!(seconds_label(6000.0), "100m00s");
    }

    #[test]
    fn seconds_label_rounds_arbitrary_ticks() {
        assert_eq!(seconds_label(90.4), "01m30s");
        assert_eq!(seconds_label(124.6), "02m05s");
    }

    #[test]
    fn load_csv_keeps_rows_aligned() {
        let tr = TimeReps::from_csv("./test/workouts.csv").unwrap();
        assert_eq!(
            tr.date,
            vec![
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
            ]
        );
        assert_eq!(tr.pushups, vec![225, 200]);
        assert_eq!(tr.squats, vec![250, 240]);
    }

    #[test]
    fn load_csv_any_column_order() {
        let tr = TimeReps::from_csv("./test/workouts_shuffled.csv").unwrap();
        assert_eq!(tr.pushups, vec![225, 200]);
        assert_eq!(tr.squats, vec![250, 240]);
    }

    #[test]
    fn load_csv_missing_column() {
        let err = TimeReps::from_csv("./test/missing_column.csv").unwrap_err();
        assert!(matches!(err, TimingError::MissingColumn("squats_time")));
    }

    #[test]
    fn load_csv_bad_duration_reports_line() {
        let err = TimeReps::from_csv("./test/bad_duration.csv").unwrap_err();
        match err {
            TimingError::Row { line, source } => {
                assert_eq!(line, 3);
                assert!(matches!(*source, TimingError::Duration { .. }));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn load_csv_bad_date_reports_line() {
        let err = TimeReps::from_csv("./test/bad_date.csv").unwrap_err();
        match err {
            TimingError::Date { line, value, .. } => {
                assert_eq!(line, 2);
                assert_eq!(value, "2024-01-05");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn load_csv_header_only_is_empty() {
        let tr = TimeReps::from_csv("./test/header_only.csv").unwrap();
        assert!(tr.date.is_empty());
        assert!(tr.pushups.is_empty());
        assert!(tr.squats.is_empty());
    }

    #[test]
    fn load_csv_missing_file() {
        let err = TimeReps::from_csv("./test/no_such_file.csv").unwrap_err();
        assert!(matches!(err, TimingError::Io(_)));
    }

    #[test]
    fn display_prints_rows() {
        let tr = TimeReps::from_csv("./test/workouts.csv").unwrap();
        let txt = tr.to_string();
        assert!(txt.starts_with("date,pushups_s,squats_s\n"));
        assert!(txt.contains("01/01/2024,225,250"));
        assert!(txt.contains("03/01/2024,200,240"));
    }

    #[test]
    fn min_and_max_of_values() {
        assert_eq!(min_and_max([3i64, 1, 2].iter().copied()), Some((1, 3)));
        assert_eq!(min_and_max(std::iter::empty::<i64>()), None);
    }

    #[test]
    fn plot_fixture() {
        let tr = TimeReps::from_csv("./test/workouts.csv").unwrap();
        println!("{}", tr);
        tr.plot_timings("./test/workouts.png", &PlotConfig::default())
            .unwrap();
    }

    #[test]
    fn plot_empty_dataset() {
        let tr = TimeReps::new(0);
        tr.plot_timings("./test/empty.png", &PlotConfig::default())
            .unwrap();
    }

    #[test]
    fn plot_single_day() {
        let mut tr = TimeReps::new(1);
        tr.date.push(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        tr.pushups.push(225);
        tr.squats.push(250);
        tr.plot_timings("./test/single_day.png", &PlotConfig::default())
            .unwrap();
    }
}
