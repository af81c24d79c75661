use tickcast_core::{PipelineConfig, Ticker};

use super::{Report, ReportData, TickerInfo};
use crate::metadata::{Metadata, RequestId};

pub fn run(config: &PipelineConfig, request_id: RequestId) -> Report {
    let tickers = Ticker::ALL
        .iter()
        .map(|ticker| TickerInfo {
            symbol: ticker.as_str(),
            company: ticker.company_name(),
            label: ticker.display_label(),
        })
        .collect();

    Report {
        meta: Metadata::new(request_id, "tickers", config.source.kind, config.history),
        data: ReportData::Tickers { tickers },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_both_supported_tickers() {
        let report = run(&PipelineConfig::default(), RequestId::new_v4());
        let ReportData::Tickers { tickers } = &report.data else {
            panic!("expected ticker list");
        };
        let labels: Vec<&str> = tickers.iter().map(|info| info.label.as_str()).collect();
        assert_eq!(labels, vec!["Google (GOOG)", "Microsoft (MSFT)"]);
    }
}
