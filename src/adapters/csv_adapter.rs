//! CSV file data adapter: one `{TICKER}.csv` per instrument.

use crate::domain::error::TrendSignalError;
use crate::domain::ohlcv::Bar;
use crate::domain::price_series::PriceSeries;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::debug;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }

    /// All bars with a close, sorted by date.
    fn read_bars(&self, ticker: &str) -> Result<Vec<Bar>, TrendSignalError> {
        let path = self.csv_path(ticker);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(TrendSignalError::NoData {
                    ticker: ticker.to_string(),
                });
            }
            Err(e) => {
                return Err(TrendSignalError::DataSource {
                    reason: format!("failed to read {}: {}", path.display(), e),
                });
            }
        };

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();
        let mut skipped = 0usize;

        for result in rdr.records() {
            let record = result.map_err(|e| TrendSignalError::DataSource {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;

            let date_str = field(&record, 0, "date")?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                TrendSignalError::DataSource {
                    reason: format!("invalid date '{}': {}", date_str, e),
                }
            })?;

            if field(&record, 4, "close")?.is_empty() {
                skipped += 1;
                continue;
            }

            bars.push(Bar {
                date,
                open: parse(&record, 1, "open")?,
                high: parse(&record, 2, "high")?,
                low: parse(&record, 3, "low")?,
                close: parse(&record, 4, "close")?,
                volume: parse_volume(&record)?,
            });
        }

        if skipped > 0 {
            debug!(ticker, skipped, "dropped rows without a close");
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}

fn field<'r>(
    record: &'r csv::StringRecord,
    index: usize,
    name: &str,
) -> Result<&'r str, TrendSignalError> {
    record
        .get(index)
        .map(str::trim)
        .ok_or_else(|| TrendSignalError::DataSource {
            reason: format!("missing {} column", name),
        })
}

fn parse<T>(record: &csv::StringRecord, index: usize, name: &str) -> Result<T, TrendSignalError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = field(record, index, name)?;
    raw.parse().map_err(|e| TrendSignalError::DataSource {
        reason: format!("invalid {} value '{}': {}", name, raw, e),
    })
}

/// Integer volume; an empty cell counts as zero and a fractional value is
/// rounded.
fn parse_volume(record: &csv::StringRecord) -> Result<i64, TrendSignalError> {
    let raw = field(record, 5, "volume")?;
    if raw.is_empty() {
        return Ok(0);
    }
    if let Ok(volume) = raw.parse::<i64>() {
        return Ok(volume);
    }
    parse::<f64>(record, 5, "volume").map(|v| v.round() as i64)
}

impl DataPort for CsvAdapter {
    fn fetch_series(
        &self,
        ticker: &str,
        lookback: usize,
    ) -> Result<PriceSeries, TrendSignalError> {
        let ticker = ticker.trim().to_uppercase();
        let series = PriceSeries::new(ticker.as_str(), self.read_bars(&ticker)?)?.tail(lookback);
        debug!(ticker = %ticker, bars = series.len(), lookback, "loaded series");
        Ok(series)
    }

    fn list_tickers(&self) -> Result<Vec<String>, TrendSignalError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| TrendSignalError::DataSource {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut tickers = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| TrendSignalError::DataSource {
                reason: format!("directory entry error: {}", e),
            })?;

            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("csv") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                tickers.push(stem.to_uppercase());
            }
        }

        tickers.sort();
        Ok(tickers)
    }

    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TrendSignalError> {
        let ticker = ticker.trim().to_uppercase();
        let bars = match self.read_bars(&ticker) {
            Ok(bars) => bars,
            Err(TrendSignalError::NoData { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };
        let series = PriceSeries::new(ticker.as_str(), bars)?;
        Ok(series
            .date_range()
            .map(|(first, last)| (first, last, series.len())))
    }
}
