//! Reception lifecycle: open, receive products, close.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pickpoint_core::{DomainError, PickupPointId, ReceptionId};

use crate::error::{ServiceError, ServiceResult};
use crate::store::{InsertOutcome, ReceptionStore};

/// Lifecycle state of a reception.
///
/// The closed wire value is `"close"`, kept verbatim for client
/// compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReceptionStatus {
    #[serde(rename = "in_progress")]
    InProgress,
    #[serde(rename = "close")]
    Closed,
}

impl ReceptionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ReceptionStatus::InProgress => "in_progress",
            ReceptionStatus::Closed => "close",
        }
    }
}

impl fmt::Display for ReceptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReceptionStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(ReceptionStatus::InProgress),
            "close" => Ok(ReceptionStatus::Closed),
            other => Err(DomainError::validation(format!(
                "unknown reception status: {other}"
            ))),
        }
    }
}

/// One goods-receiving session at a pickup point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reception {
    pub id: ReceptionId,
    pub date_time: DateTime<Utc>,
    pub pickup_point_id: PickupPointId,
    pub status: ReceptionStatus,
}

impl Reception {
    pub fn open_now(pickup_point_id: PickupPointId) -> Self {
        Self {
            id: ReceptionId::new(),
            date_time: Utc::now(),
            pickup_point_id,
            status: ReceptionStatus::InProgress,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == ReceptionStatus::InProgress
    }
}

/// Opens and closes receptions, holding the at-most-one-open invariant.
pub struct ReceptionService {
    receptions: Arc<dyn ReceptionStore>,
}

impl ReceptionService {
    pub fn new(receptions: Arc<dyn ReceptionStore>) -> Self {
        Self { receptions }
    }

    /// Open a new reception at the point.
    ///
    /// Fails with a conflict while a previous reception is still in
    /// progress. The store's conditional insert is the last word, so two
    /// racing opens cannot both succeed.
    pub async fn open(&self, point: PickupPointId) -> ServiceResult<Reception> {
        if let Some(latest) = self
            .receptions
            .latest(point)
            .await
            .map_err(ServiceError::store("reception lookup"))?
        {
            if latest.is_open() {
                return Err(DomainError::conflict("close previous receipt").into());
            }
        }

        let reception = Reception::open_now(point);
        match self
            .receptions
            .insert_open(&reception)
            .await
            .map_err(ServiceError::store("reception insert"))?
        {
            InsertOutcome::Inserted => {
                tracing::info!(reception_id = %reception.id, pickup_point_id = %point, "opened reception");
                Ok(reception)
            }
            // Lost a race with a concurrent open.
            InsertOutcome::AlreadyExists => {
                Err(DomainError::conflict("close previous receipt").into())
            }
        }
    }

    /// Close the point's in-progress reception.
    ///
    /// Conflict when there is nothing open, whether the point has no
    /// receptions at all or the latest one is already closed.
    pub async fn close_last(&self, point: PickupPointId) -> ServiceResult<Reception> {
        let closed = self
            .receptions
            .close_open(point)
            .await
            .map_err(ServiceError::store("reception close"))?
            .ok_or_else(|| DomainError::conflict("no available receptions"))?;

        tracing::info!(reception_id = %closed.id, pickup_point_id = %point, "closed reception");
        Ok(closed)
    }
}
