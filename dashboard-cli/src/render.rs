use chrono::NaiveDate;
use dashboard_core::{Aggregate, ChartProjection, series::relative_label};
use std::fmt::Write;

const BAR_WIDTH: f64 = 30.0;

/// Current conditions, averages and the day list.
pub fn dashboard(aggregate: &Aggregate, today: NaiveDate) -> String {
    let snapshot = &aggregate.snapshot;
    let mut out = String::new();

    let _ = writeln!(out, "{}  ({:.2}, {:.2})", snapshot.city_label, snapshot.latitude, snapshot.longitude);
    let _ = writeln!(out, "  {}°C  {}", snapshot.temperature_c, snapshot.condition);
    let _ = writeln!(
        out,
        "  Wind: {} km/h   Humidity: {}%",
        snapshot.wind_speed_kmh, snapshot.humidity_percent
    );
    if !snapshot.activity_suggestion.is_empty() {
        let _ = writeln!(out, "  {}", snapshot.activity_suggestion);
    }

    let _ = writeln!(out, "\nWeather Averages");
    let _ = writeln!(out, "  Temperature: {}°C", aggregate.summary.avg_temp_c);
    let _ = writeln!(out, "  Wind speed:  {} km/h", aggregate.summary.avg_wind_kmh);

    let _ = writeln!(out, "\n{}-Day Forecast", aggregate.series.len());
    for point in &aggregate.series.points {
        let marker = if point.is_today { '>' } else { ' ' };
        let _ = writeln!(
            out,
            "{marker} {:<14} {:<13} {:>4}° / {:>4}°  {:>4} km/h",
            relative_label(point.date, today),
            point.condition.as_str(),
            point.max_temp.round(),
            point.min_temp.round(),
            point.wind_speed.round(),
        );
    }

    out
}

/// One chart projection as text rows.
pub fn chart(projection: &ChartProjection) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", projection.kind().title());

    match projection {
        ChartProjection::Temperature(points) => {
            for p in points {
                let _ = writeln!(out, "  {:<7} max {:>5.1}°C  min {:>5.1}°C", p.date_label, p.max_temp, p.min_temp);
            }
        }
        ChartProjection::Wind(points) => {
            let max = points.iter().map(|p| p.wind_speed).fold(0.0, f64::max);
            for p in points {
                let _ = writeln!(out, "  {:<7} {:>6.1} km/h {}", p.date_label, p.wind_speed, bar(p.wind_speed, max));
            }
        }
        ChartProjection::Conditions(shares) => {
            let max = shares.iter().map(|s| s.count).max().unwrap_or(0) as f64;
            for s in shares {
                let _ = writeln!(out, "  {:<13} {:>3} {}", s.condition.as_str(), s.count, bar(s.count as f64, max));
            }
        }
        ChartProjection::Overview(points) => {
            for p in points {
                let _ = writeln!(out, "  {:<7} avg {:>4}°C  wind {:>6.1} km/h", p.date_label, p.avg_temp, p.wind_speed);
            }
        }
    }

    out
}

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    "#".repeat(((value / max) * BAR_WIDTH).round() as usize)
}
