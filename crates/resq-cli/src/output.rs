use serde::Serialize;

use resq_core::utils::truncate_string;
use resq_core::{CacheAges, EmergencyNumber, LegalInfo, ProbeReport, QueryResult, SyncOutcome};

/// Maximum description width in list rows
const DESCRIPTION_WIDTH: usize = 60;

pub const OFFLINE_BANNER: &str = "Offline - showing cached data";

#[derive(Serialize)]
struct JsonOut<'a, T: Serialize> {
    ok: bool,
    online: bool,
    origin: resq_core::DataOrigin,
    data: &'a [T],
}

/// Print query results, with the offline banner when they did not come fresh.
pub fn print_records<T: Serialize>(
    json: bool,
    online: bool,
    result: &QueryResult<T>,
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        let out = JsonOut {
            ok: true,
            online,
            origin: result.origin,
            data: &result.records,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if !online || result.is_fallback() {
        println!("({})", OFFLINE_BANNER);
    }
    if result.records.is_empty() {
        println!("No matches.");
    }
    for record in &result.records {
        println!("{}", row(record));
    }
    Ok(())
}

pub fn number_row(n: &EmergencyNumber) -> String {
    let description = n
        .description
        .as_deref()
        .map(|d| truncate_string(d, DESCRIPTION_WIDTH))
        .unwrap_or_default();
    format!(
        "{:<15} {:<36} [{}] {}",
        n.number, n.name, n.category, description
    )
}

pub fn legal_row(info: &LegalInfo) -> String {
    format!(
        "{:>3}. {} [{}]\n     {}",
        info.id, info.title, info.category, info.description
    )
}

pub fn legal_detail(info: &LegalInfo) -> String {
    let mut out = legal_row(info);
    out.push_str(&format!("\n     {}", info.details));
    if let Some(ref source) = info.source {
        out.push_str(&format!("\n     Source: {}", source));
    }
    out.push('\n');
    out
}

pub fn print_lines(json: bool, lines: &[String]) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(lines)?);
    } else {
        for line in lines {
            println!("{}", line);
        }
    }
    Ok(())
}

pub fn outcome_line(outcome: &SyncOutcome) -> String {
    match outcome {
        SyncOutcome::Synced { store, count } => format!("{}: synced {} records", store, count),
        SyncOutcome::Skipped { store, reason } => format!("{}: skipped ({})", store, reason),
        SyncOutcome::Failed {
            store,
            attempts,
            reason,
        } => format!("{}: failed after {} attempt(s): {}", store, attempts, reason),
    }
}

pub fn print_outcomes(json: bool, outcomes: &[SyncOutcome]) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcomes)?);
    } else {
        for outcome in outcomes {
            println!("{}", outcome_line(outcome));
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct StatusOut<'a> {
    probe: Option<&'a ProbeReport>,
    offline_mode: bool,
    emergency_numbers_synced: String,
    legal_info_synced: String,
}

pub fn print_status(
    json: bool,
    probe: Option<&ProbeReport>,
    ages: &CacheAges,
) -> anyhow::Result<()> {
    if json {
        let out = StatusOut {
            probe,
            offline_mode: probe.is_none(),
            emergency_numbers_synced: ages.numbers_age(),
            legal_info_synced: ages.legal_age(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    match probe {
        None => println!("Connection:  offline mode (not checked)"),
        Some(report) if report.online => {
            let latency = report
                .latency
                .map(|l| format!(" ({}ms)", l.as_millis()))
                .unwrap_or_default();
            println!("Connection:  online, {}{}", report.quality, latency);
        }
        Some(_) => println!("Connection:  offline"),
    }
    println!("Numbers:     last synced {}", ages.numbers_age());
    println!("Legal info:  last synced {}", ages.legal_age());
    Ok(())
}
