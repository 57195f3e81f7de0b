use chrono::format::ParseErrorKind;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

use super::Bar;
use crate::config::ChartConfig;
use crate::error::{GanttError, GanttResult};

const MS_PER_MINUTE: f64 = 60_000.0;

/// Strict parse/format pattern for time values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeFormat(String);

impl TimeFormat {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self(pattern.into())
    }

    pub fn pattern(&self) -> &str {
        &self.0
    }

    /// Parses `value` against the pattern. Date-only patterns yield midnight.
    pub fn parse(&self, value: &str) -> GanttResult<NaiveDateTime> {
        match NaiveDateTime::parse_from_str(value, &self.0) {
            Ok(time) => Ok(time),
            Err(err) if err.kind() == ParseErrorKind::NotEnough => {
                NaiveDate::parse_from_str(value, &self.0)
                    .map(|date| date.and_time(chrono::NaiveTime::MIN))
                    .map_err(|source| self.parse_error(value, source))
            }
            Err(source) => Err(self.parse_error(value, source)),
        }
    }

    pub fn format(&self, time: NaiveDateTime) -> String {
        time.format(&self.0).to_string()
    }

    /// Drops whatever precision the pattern cannot represent.
    pub fn snap(&self, time: NaiveDateTime) -> GanttResult<NaiveDateTime> {
        self.parse(&self.format(time))
    }

    fn parse_error(&self, value: &str, source: chrono::ParseError) -> GanttError {
        GanttError::Parse {
            value: value.to_owned(),
            format: self.0.clone(),
            source,
        }
    }
}

/// Units accepted by [`add_duration`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
}

impl TimeUnit {
    fn millis(self) -> f64 {
        match self {
            TimeUnit::Millisecond => 1.0,
            TimeUnit::Second => 1_000.0,
            TimeUnit::Minute => MS_PER_MINUTE,
            TimeUnit::Hour => 60.0 * MS_PER_MINUTE,
            TimeUnit::Day => 24.0 * 60.0 * MS_PER_MINUTE,
        }
    }
}

/// Adds a possibly fractional amount of `unit` to `time`, at millisecond precision.
pub fn add_duration(time: NaiveDateTime, amount: f64, unit: TimeUnit) -> GanttResult<NaiveDateTime> {
    let millis = (amount * unit.millis()).round();
    if !millis.is_finite() {
        return Err(GanttError::Configuration(format!("duration {amount} is not finite")));
    }
    TimeDelta::try_milliseconds(millis as i64)
        .and_then(|delta| time.checked_add_signed(delta))
        .ok_or_else(|| GanttError::Configuration(format!("{time} plus {amount} is out of range")))
}

/// Milliseconds from `start` to `end`.
pub fn time_difference(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    (end - start).num_milliseconds()
}

pub fn minutes_between(start: NaiveDateTime, end: NaiveDateTime) -> f64 {
    time_difference(start, end) as f64 / MS_PER_MINUTE
}

/// Something a time can be read from. A bar is only accepted together with
/// the endpoint to read.
#[derive(Debug, Clone, Copy)]
pub enum TimeRef<'a> {
    Literal(&'a str),
    BarStart(&'a Bar),
    BarEnd(&'a Bar),
}

/// Linear mapping between pixel offsets and chart time.
///
/// The chart width is a parameter of every conversion rather than state, as
/// the surface may resize between two pointer events.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeMapping {
    chart_start: NaiveDateTime,
    chart_end: NaiveDateTime,
    format: TimeFormat,
}

impl TimeMapping {
    pub fn new(chart_start: NaiveDateTime, chart_end: NaiveDateTime, format: TimeFormat) -> GanttResult<Self> {
        if chart_end <= chart_start {
            return Err(GanttError::Configuration(format!(
                "chart end {chart_end} must be after chart start {chart_start}"
            )));
        }
        Ok(Self {
            chart_start,
            chart_end,
            format,
        })
    }

    pub fn from_config(config: &ChartConfig) -> GanttResult<Self> {
        let format = TimeFormat::new(config.date_format.clone());
        let parse = |value: &str| {
            format.parse(value).map_err(|err| {
                GanttError::Configuration(format!("chart bounds are not parseable: {err}"))
            })
        };
        let chart_start = parse(&config.chart_start)?;
        let chart_end = parse(&config.chart_end)?;
        Self::new(chart_start, chart_end, format)
    }

    pub fn chart_start(&self) -> NaiveDateTime {
        self.chart_start
    }

    pub fn chart_end(&self) -> NaiveDateTime {
        self.chart_end
    }

    pub fn format(&self) -> &TimeFormat {
        &self.format
    }

    /// Total minutes covered by the chart.
    pub fn total_minutes(&self) -> f64 {
        minutes_between(self.chart_start, self.chart_end)
    }

    /// Minutes from chart start to `time`.
    pub fn chart_minutes(&self, time: NaiveDateTime) -> f64 {
        minutes_between(self.chart_start, time)
    }

    pub fn parse_time(&self, value: &str) -> GanttResult<NaiveDateTime> {
        self.format.parse(value)
    }

    pub fn resolve(&self, time: TimeRef<'_>) -> GanttResult<NaiveDateTime> {
        match time {
            TimeRef::Literal(value) => self.parse_time(value),
            TimeRef::BarStart(bar) => Ok(bar.start),
            TimeRef::BarEnd(bar) => Ok(bar.end),
        }
    }

    /// Pixel offset of `time` on a chart `width` pixels wide, rounded up.
    pub fn time_to_position(&self, time: NaiveDateTime, width: f64) -> f64 {
        (self.chart_minutes(time) * width / self.total_minutes()).ceil()
    }

    /// Time at pixel offset `x`, snapped to the configured format.
    pub fn position_to_time(&self, x: f64, width: f64) -> GanttResult<NaiveDateTime> {
        if !(width.is_finite() && width > 0.0) {
            return Err(GanttError::Configuration(format!(
                "chart width must be positive, got {width}"
            )));
        }
        let minutes = x * self.total_minutes() / width;
        self.format
            .snap(add_duration(self.chart_start, minutes, TimeUnit::Minute)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping() -> TimeMapping {
        TimeMapping::from_config(&ChartConfig::new("2024-01-01 08:00", "2024-01-01 18:00"))
            .expect("mapping")
    }

    #[test]
    fn strict_parse_rejects_malformed_values() {
        let format = TimeFormat::new("%Y-%m-%d %H:%M");
        assert!(format.parse("2024-01-01 09:30").is_ok());
        let err = format.parse("2024-01-01T09:30").expect_err("wrong separator");
        assert!(matches!(err, GanttError::Parse { .. }));
        assert!(format.parse("2024-13-01 09:30").is_err());
    }

    #[test]
    fn date_only_format_parses_to_midnight() {
        let format = TimeFormat::new("%d.%m.%Y");
        let time = format.parse("05.02.2024").expect("date");
        assert_eq!(format.format(time), "05.02.2024");
        assert_eq!(time.format("%H:%M").to_string(), "00:00");
    }

    #[test]
    fn position_and_time_are_inverse_on_whole_minutes() {
        let mapping = mapping();
        let time = mapping.position_to_time(90.0, 600.0).expect("time");
        assert_eq!(mapping.format().format(time), "2024-01-01 09:30");
        assert_eq!(mapping.time_to_position(time, 600.0), 90.0);
    }

    #[test]
    fn time_to_position_rounds_up() {
        let mapping = mapping();
        let time = mapping.parse_time("2024-01-01 08:01").expect("time");
        // 1 minute of 600 on a 300px chart is half a pixel.
        assert_eq!(mapping.time_to_position(time, 300.0), 1.0);
    }

    #[test]
    fn position_to_time_snaps_to_format_precision() {
        let mapping = mapping();
        let time = mapping.position_to_time(10.5, 600.0).expect("time");
        assert_eq!(mapping.format().format(time), "2024-01-01 08:10");
        assert_eq!(time, mapping.parse_time("2024-01-01 08:10").expect("time"));
    }

    #[test]
    fn zero_width_is_a_configuration_error() {
        let err = mapping().position_to_time(10.0, 0.0).expect_err("no width");
        assert!(matches!(err, GanttError::Configuration(_)));
    }

    #[test]
    fn inverted_chart_bounds_are_rejected() {
        let config = ChartConfig::new("2024-01-01 18:00", "2024-01-01 08:00");
        assert!(matches!(
            TimeMapping::from_config(&config),
            Err(GanttError::Configuration(_))
        ));
    }

    #[test]
    fn duration_helpers() {
        let mapping = mapping();
        let start = mapping.parse_time("2024-01-01 09:00").expect("time");
        let later = add_duration(start, 1.5, TimeUnit::Hour).expect("later");
        assert_eq!(time_difference(start, later), 90 * 60_000);
        let days = add_duration(start, 2.0, TimeUnit::Day).expect("days");
        assert_eq!(days - start, TimeDelta::days(2));
        assert_eq!(mapping.chart_minutes(start), 60.0);
    }

    #[test]
    fn extreme_positions_are_errors_not_panics() {
        let mapping = mapping();
        for x in [f64::MAX, -f64::MAX, f64::NAN, f64::INFINITY, 1e300] {
            let err = mapping.position_to_time(x, 600.0).expect_err("out of range");
            assert!(matches!(err, GanttError::Configuration(_)));
        }
    }

    #[test]
    fn bar_endpoints_resolve_without_parsing() {
        let mapping = mapping();
        let start = mapping.parse_time("2024-01-01 09:00").expect("time");
        let end = mapping.parse_time("2024-01-01 10:00").expect("time");
        let bar = Bar::new("a", "r1", start, end).expect("bar");

        assert_eq!(mapping.resolve(TimeRef::BarStart(&bar)).expect("start"), start);
        assert_eq!(mapping.resolve(TimeRef::BarEnd(&bar)).expect("end"), end);
        assert!(mapping.resolve(TimeRef::Literal("noon")).is_err());
    }
}
