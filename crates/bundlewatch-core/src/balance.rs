// ── Carrier balance record model and extraction ──
//
// Serde model of the carrier API's balance response. Two API generations
// are in the wild and both are modeled here: the older one nests the
// detail balances under `getBalancesOutDTO` and reports remaining
// quantities as human-readable strings; the newer one lists details at
// the top level with numeric sub-entries. Variant selection is by field
// presence and type, never by an explicit version flag.

use serde::Deserialize;
use tracing::debug;

use crate::error::CoreError;
use crate::units::kib_from_human_readable;

/// Service-type prefix identifying the off-peak bundle.
pub const OFF_PEAK_MARKER: &str = "Night Owl";

/// A remaining quantity as the carrier reports it: either a plain KiB
/// number or a human-readable string like `"1.50 GiB"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RemainingQuantity {
    Kib(f64),
    HumanReadable(String),
}

impl RemainingQuantity {
    /// The quantity in KiB, decoding the human-readable form if needed.
    pub fn kib(&self) -> Result<f64, CoreError> {
        match self {
            Self::Kib(value) => Ok(*value),
            Self::HumanReadable(text) => kib_from_human_readable(text),
        }
    }
}

/// One entry in the total-balance set.
#[derive(Debug, Clone, Deserialize)]
pub struct TotalBalance {
    #[serde(rename = "remaininginmetric")]
    pub remaining: Option<RemainingQuantity>,
}

/// A nested remaining-quantity sub-entry of a balance detail.
#[derive(Debug, Clone, Deserialize)]
pub struct BundleBalance {
    #[serde(rename = "remaininginmetric")]
    pub remaining: Option<RemainingQuantity>,
}

/// One balance detail entry, tagged with its service type.
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceDetail {
    #[serde(rename = "serviceTypeString")]
    pub service_type: Option<String>,

    /// Newer API: per-bundle sub-entries with numeric remaining fields.
    #[serde(rename = "dataBalancesBean")]
    pub bundles: Option<Vec<BundleBalance>>,

    /// Older API: a single pre-formatted remaining quantity.
    #[serde(rename = "totalBundleRemaining")]
    pub total_remaining: Option<RemainingQuantity>,
}

impl BalanceDetail {
    /// Remaining KiB for this detail entry, whichever shape it uses.
    fn remaining_kib(&self) -> Result<f64, CoreError> {
        if let Some(bundles) = &self.bundles {
            let mut total = 0.0;
            for bundle in bundles {
                total += bundle
                    .remaining
                    .as_ref()
                    .ok_or(CoreError::MissingField {
                        field: "dataBalancesBean.remaininginmetric",
                    })?
                    .kib()?;
            }
            return Ok(total);
        }
        self.total_remaining
            .as_ref()
            .ok_or(CoreError::MissingField {
                field: "totalBundleRemaining",
            })?
            .kib()
    }
}

/// Older API wrapper around the balance detail list.
#[derive(Debug, Clone, Deserialize)]
pub struct BalancesEnvelope {
    #[serde(rename = "dataBalancesOutDTO")]
    pub data_balances: Option<Vec<BalanceDetail>>,
}

/// The balance response body, as fetched once per refresh cycle.
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceRecord {
    #[serde(rename = "dataTotalBean")]
    pub data_totals: Option<Vec<TotalBalance>>,

    /// Newer API: detail balances at the top level.
    #[serde(rename = "dataBalancesOutDTO")]
    pub data_balances: Option<Vec<BalanceDetail>>,

    /// Older API: detail balances nested one level down.
    #[serde(rename = "getBalancesOutDTO")]
    pub balances_envelope: Option<BalancesEnvelope>,
}

impl BalanceRecord {
    /// The detail balance list, from whichever level this API generation
    /// put it at.
    fn balance_details(&self) -> Option<&[BalanceDetail]> {
        if let Some(details) = &self.data_balances {
            return Some(details);
        }
        self.balances_envelope
            .as_ref()
            .and_then(|envelope| envelope.data_balances.as_deref())
    }
}

/// Extract `(peak_available, off_peak_available)` in KiB from a balance
/// record.
///
/// Peak is the sum of `remaininginmetric` over every total-balance entry;
/// an absent set or an entry without the field is a
/// [`CoreError::MissingField`]. Off-peak comes from the first detail
/// entry whose service type starts with [`OFF_PEAK_MARKER`]; if none
/// exists the cycle must fail ([`CoreError::NoOffPeakBundle`]) rather
/// than silently reporting zero.
pub fn get_available_data(record: &BalanceRecord) -> Result<(f64, f64), CoreError> {
    let totals = record.data_totals.as_ref().ok_or(CoreError::MissingField {
        field: "dataTotalBean",
    })?;

    let mut peak_available = 0.0;
    for total in totals {
        peak_available += total
            .remaining
            .as_ref()
            .ok_or(CoreError::MissingField {
                field: "dataTotalBean.remaininginmetric",
            })?
            .kib()?;
    }
    debug!(peak_available, "summed total balances");

    let details = record.balance_details().ok_or(CoreError::MissingField {
        field: "dataBalancesOutDTO",
    })?;

    let off_peak_entry = details
        .iter()
        .find(|detail| {
            detail
                .service_type
                .as_deref()
                .is_some_and(|label| label.starts_with(OFF_PEAK_MARKER))
        })
        .ok_or(CoreError::NoOffPeakBundle {
            marker: OFF_PEAK_MARKER,
        })?;

    let off_peak_available = off_peak_entry.remaining_kib()?;
    debug!(off_peak_available, "resolved off-peak bundle");

    Ok((peak_available, off_peak_available))
}
