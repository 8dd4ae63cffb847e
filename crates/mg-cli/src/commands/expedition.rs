//! `mg expedition` handlers: list and summary against a running daemon.
//!
//! The window is resolved and validated locally, so bad input never reaches
//! the network.

use anyhow::{anyhow, Result};
use chrono::Utc;
use mg_config::CliConfig;
use mg_expedition::{today_in, DateWindow, ExpeditionItem};

use crate::client::DaemonClient;

/// Window options shared by `list` and `summary`, already merged with config.
#[derive(Debug, Clone)]
pub struct WindowOpts {
    pub start: Option<String>,
    pub end: Option<String>,
    pub days: u32,
    pub tz: String,
}

impl WindowOpts {
    pub fn from_args(
        cfg: &CliConfig,
        start: Option<String>,
        end: Option<String>,
        days: Option<u32>,
        tz: Option<String>,
    ) -> Self {
        Self {
            start,
            end,
            days: days.unwrap_or(cfg.expedition.default_window_days),
            tz: tz.unwrap_or_else(|| cfg.expedition.timezone.clone()),
        }
    }

    pub fn resolve(&self) -> Result<DateWindow> {
        let today = today_in(&self.tz, Utc::now())?;
        DateWindow::with_defaults(self.start.as_deref(), self.end.as_deref(), today, self.days)
            .map_err(|e| anyhow!("{}: {}", e.code(), e))
    }
}

pub async fn expedition_list(daemon_url: &str, opts: &WindowOpts) -> Result<()> {
    let window = opts.resolve()?;
    let items = DaemonClient::new(daemon_url).expedition(&window).await?;

    for item in &items {
        println!("{}", format_item(item));
    }
    println!(
        "window={}..{} items={} blocked={}",
        window.start(),
        window.end(),
        items.len(),
        items.iter().filter(|i| i.is_blocked()).count()
    );
    Ok(())
}

pub async fn expedition_summary(daemon_url: &str, opts: &WindowOpts) -> Result<()> {
    let window = opts.resolve()?;
    let s = DaemonClient::new(daemon_url).summary(&window).await?;

    println!("window={}..{}", s.start, s.end);
    println!("total={}", s.total);
    println!("released={}", s.released);
    println!("blocked={}", s.blocked);
    for (reason, n) in &s.blocked_by_reason {
        println!("blocked_by_reason.{}={}", reason, n);
    }
    Ok(())
}

fn format_item(item: &ExpeditionItem) -> String {
    let status = match item.reason() {
        Some(reason) => format!("BLOCKED reason={}", reason),
        None => "RELEASED".to_string(),
    };
    format!(
        "date={} item_id={} contract={} customer=\"{}\" asset={} type={} {}",
        item.item.scheduled_delivery_date,
        item.item.id,
        item.item.contract_number,
        item.item.customer_name,
        item.item.asset_code,
        item.item.asset_type,
        status
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use mg_schemas::{DeliveryBlockedReason, ScheduledDeliveryItem, Verdict};

    fn opts(start: Option<&str>, end: Option<&str>) -> WindowOpts {
        WindowOpts {
            start: start.map(str::to_string),
            end: end.map(str::to_string),
            days: 30,
            tz: "America/Sao_Paulo".to_string(),
        }
    }

    #[test]
    fn explicit_window_resolves_without_clock() {
        let w = opts(Some("2024-01-01"), Some("2024-01-31")).resolve().unwrap();
        assert_eq!(w.start(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(w.end(), NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
    }

    #[test]
    fn errors_carry_machine_code() {
        let err = opts(Some("2024-01-31"), Some("2024-01-01")).resolve().unwrap_err();
        assert!(err.to_string().starts_with("INVALID_RANGE"));

        let err = opts(Some("31/01/2024"), None).resolve().unwrap_err();
        assert!(err.to_string().starts_with("INVALID_DATE"));
    }

    #[test]
    fn unknown_timezone_is_an_error() {
        let mut o = opts(None, None);
        o.tz = "Mars/Olympus_Mons".to_string();
        assert!(o.resolve().is_err());
    }

    #[test]
    fn default_window_spans_configured_days() {
        let w = opts(None, None).resolve().unwrap();
        assert_eq!((w.end() - w.start()).num_days(), 30);
    }

    #[test]
    fn item_line_shows_reason() {
        let item = ExpeditionItem {
            item: ScheduledDeliveryItem {
                id: 5,
                contract_id: 2,
                contract_number: "CT-002".to_string(),
                customer_name: "Obras Beta".to_string(),
                asset_code: "CNT-0005".to_string(),
                asset_type: "CONTAINER".to_string(),
                scheduled_delivery_date: NaiveDate::from_ymd_opt(2024, 1, 12).unwrap(),
                contract_signed_at: None,
            },
            verdict: Verdict::blocked(DeliveryBlockedReason::ContratoNaoAssinado),
        };

        let line = format_item(&item);
        assert!(line.starts_with("date=2024-01-12 item_id=5"));
        assert!(line.ends_with("BLOCKED reason=CONTRATO_NAO_ASSINADO"));
    }
}
