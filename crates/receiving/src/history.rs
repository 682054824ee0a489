//! Nesting of flat left-join history rows.
//!
//! The store emits one row per (point, reception, product) combination, with
//! `product: None` standing in for a reception that has no products yet.
//! [`group_rows`] folds those rows back into the nested shape in a single
//! pass, relying only on the store's grouping contract, not on ids being
//! sortable.

use serde::Serialize;

use pickpoint_core::{PickupPointId, ReceptionId};

use crate::pickup_point::PickupPoint;
use crate::product::Product;
use crate::reception::Reception;

/// One flat row off the point/reception/product left join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub pickup_point: PickupPoint,
    pub reception: Reception,
    pub product: Option<Product>,
}

/// A reception with its products, oldest product first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceptionHistory {
    pub reception: Reception,
    pub products: Vec<Product>,
}

/// A pickup point with its receptions, newest reception first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupPointHistory {
    #[serde(rename = "pvz")]
    pub pickup_point: PickupPoint,
    pub receptions: Vec<ReceptionHistory>,
}

/// One page of nested history plus paging metadata.
///
/// `total` counts pickup points matching the filter, not rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryPage {
    pub items: Vec<PickupPointHistory>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

/// Fold grouped flat rows into nested pickup-point histories.
///
/// Rows must arrive with equal pickup points adjacent and, within a point,
/// equal receptions adjacent. Order within those runs is preserved as-is. A
/// row with `product: None` contributes an empty-handed reception.
pub fn group_rows(rows: Vec<HistoryRow>) -> Vec<PickupPointHistory> {
    let mut out: Vec<PickupPointHistory> = Vec::new();
    let mut current_point: Option<PickupPointId> = None;
    let mut current_reception: Option<ReceptionId> = None;

    for row in rows {
        if current_point != Some(row.pickup_point.id) {
            current_point = Some(row.pickup_point.id);
            current_reception = None;
            out.push(PickupPointHistory {
                pickup_point: row.pickup_point,
                receptions: Vec::new(),
            });
        }
        let Some(point) = out.last_mut() else {
            continue;
        };

        if current_reception != Some(row.reception.id) {
            current_reception = Some(row.reception.id);
            point.receptions.push(ReceptionHistory {
                reception: row.reception,
                products: Vec::new(),
            });
        }

        if let Some(product) = row.product {
            if let Some(reception) = point.receptions.last_mut() {
                reception.products.push(product);
            }
        }
    }

    out
}
