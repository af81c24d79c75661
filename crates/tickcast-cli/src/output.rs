use std::io::{self, Write};

use tickcast_core::{ChartPoint, SeriesTag};

use crate::cli::OutputFormat;
use crate::commands::{Report, ReportData, TickerInfo};
use crate::error::CliError;

/// Actual rows shown before the forecast in table output.
const TABLE_HISTORY_ROWS: usize = 10;

pub fn render(report: &Report, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, report, format, pretty)?;
    out.flush()?;
    Ok(())
}

pub fn write_report<W: Write>(
    out: &mut W,
    report: &Report,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(report)?
            } else {
                serde_json::to_string(report)?
            };
            writeln!(out, "{payload}")?;
        }
        OutputFormat::Table => write_table(out, report)?,
        OutputFormat::Csv => write_csv(out, &report.data)?,
    }

    Ok(())
}

fn write_table<W: Write>(out: &mut W, report: &Report) -> io::Result<()> {
    writeln!(out, "request_id : {}", report.meta.request_id)?;
    writeln!(out, "source     : {}", report.meta.source)?;

    match &report.data {
        ReportData::Forecast { view, model } => {
            writeln!(out, "title      : {}", view.title)?;
            if let Some(message) = &view.message {
                writeln!(out, "message    : {message}")?;
            }
            if let Some(code) = view.error_code {
                writeln!(out, "error_code : {code}")?;
                return Ok(());
            }
            if let Some(model) = model {
                writeln!(
                    out,
                    "model      : ARIMA{} sigma2={:.4} converged={}",
                    model.order, model.sigma2, model.converged
                )?;
            }
            writeln!(out)?;

            let actual_rows = view
                .combined
                .iter()
                .filter(|point| point.tag == SeriesTag::Actual)
                .count();
            let skip = actual_rows.saturating_sub(TABLE_HISTORY_ROWS);
            write_points(out, view.combined.iter().skip(skip))?;
        }
        ReportData::History { ticker, points } => {
            writeln!(out, "ticker     : {ticker}")?;
            writeln!(out, "rows       : {}", points.len())?;
            writeln!(out)?;
            write_points(out, points.iter())?;
        }
        ReportData::Tickers { tickers } => {
            writeln!(out)?;
            write_tickers(out, tickers)?;
        }
    }

    Ok(())
}

fn write_points<'a, W: Write>(
    out: &mut W,
    points: impl Iterator<Item = &'a ChartPoint>,
) -> io::Result<()> {
    writeln!(out, "{:<10}  {:>12}  {}", "date", "price", "tag")?;
    for point in points {
        writeln!(
            out,
            "{:<10}  {:>12.4}  {}",
            point.date,
            point.price,
            point.tag.as_str()
        )?;
    }
    Ok(())
}

fn write_tickers<W: Write>(out: &mut W, tickers: &[TickerInfo]) -> io::Result<()> {
    writeln!(out, "{:<6}  {:<10}  label", "symbol", "company")?;
    for info in tickers {
        writeln!(out, "{:<6}  {:<10}  {}", info.symbol, info.company, info.label)?;
    }
    Ok(())
}

fn write_csv<W: Write>(out: &mut W, data: &ReportData) -> io::Result<()> {
    match data {
        ReportData::Forecast { view, .. } => write_csv_points(out, &view.combined),
        ReportData::History { points, .. } => write_csv_points(out, points),
        ReportData::Tickers { tickers } => {
            writeln!(out, "symbol,company,label")?;
            for info in tickers {
                writeln!(out, "{},{},\"{}\"", info.symbol, info.company, info.label)?;
            }
            Ok(())
        }
    }
}

fn write_csv_points<W: Write>(out: &mut W, points: &[ChartPoint]) -> io::Result<()> {
    writeln!(out, "date,price,tag")?;
    for point in points {
        writeln!(out, "{},{},{}", point.date, point.price, point.tag.as_str())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{Metadata, RequestId};
    use tickcast_core::{
        ForecastError, ForecastView, PipelineConfig, PipelineError, SourceId, Ticker,
        TradingDate,
    };

    fn point(date: &str, price: f64, tag: SeriesTag) -> ChartPoint {
        ChartPoint {
            date: TradingDate::parse(date).expect("date"),
            price,
            tag,
        }
    }

    fn report(data: ReportData) -> Report {
        Report {
            meta: Metadata::new(
                RequestId::new_v4(),
                "test",
                SourceId::Synthetic,
                PipelineConfig::default().history,
            ),
            data,
        }
    }

    fn render_string(report: &Report, format: OutputFormat) -> String {
        let mut buffer = Vec::new();
        write_report(&mut buffer, report, format, false).expect("renders");
        String::from_utf8(buffer).expect("utf-8")
    }

    #[test]
    fn csv_lists_tagged_rows() {
        let report = report(ReportData::History {
            ticker: Ticker::Goog,
            points: vec![
                point("2024-12-30", 190.5, SeriesTag::Actual),
                point("2024-12-31", 189.25, SeriesTag::Actual),
            ],
        });

        let csv = render_string(&report, OutputFormat::Csv);

        assert_eq!(
            csv,
            "date,price,tag\n2024-12-30,190.5,actual\n2024-12-31,189.25,actual\n"
        );
    }

    #[test]
    fn table_trims_history_but_keeps_forecast() {
        let mut combined: Vec<ChartPoint> = TradingDate::parse("2024-11-29")
            .expect("date")
            .business_days_after(20)
            .expect("in range")
            .into_iter()
            .map(|date| ChartPoint {
                date,
                price: 100.0,
                tag: SeriesTag::Actual,
            })
            .collect();
        combined.push(point("2025-01-02", 101.0, SeriesTag::Forecast));
        let view = ForecastView {
            title: String::from("Google (GOOG) closing price"),
            historical: Vec::new(),
            combined,
            message: None,
            error_code: None,
        };

        let table = render_string(
            &report(ReportData::Forecast { view, model: None }),
            OutputFormat::Table,
        );

        assert_eq!(table.matches(" actual").count(), TABLE_HISTORY_ROWS);
        assert_eq!(table.matches(" forecast").count(), 1);
    }

    #[test]
    fn error_view_renders_message_and_code() {
        let error = PipelineError::Forecast(ForecastError::empty_data("no rows"));
        let report = report(ReportData::Forecast {
            view: ForecastView::from_error(&error),
            model: None,
        });

        let json: serde_json::Value =
            serde_json::from_str(&render_string(&report, OutputFormat::Json)).expect("json");
        assert_eq!(json["data"]["error_code"], "forecast.empty_data");
        assert_eq!(json["meta"]["command"], "test");

        let table = render_string(&report, OutputFormat::Table);
        assert!(table.contains("error_code : forecast.empty_data"), "{table}");
    }
}
