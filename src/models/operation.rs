//! Operation entity, lifecycle status and HTTP payloads
//!
//! Status progresses: Criada → Aprovada → Processada
//!                      ↘         ↘
//!                        Cancelada
//!
//! Processada and Cancelada are terminal. Transition guards live on
//! [`Operation`] only; repositories and services never set the status directly.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Largest number of fractional digits the `numeric(18,2)` column keeps
pub const AMOUNT_SCALE: u32 = 2;

/// Largest number of integer digits the `numeric(18,2)` column keeps
const AMOUNT_INTEGER_DIGITS: u32 = 16;

/// Lifecycle status of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OperationStatus {
    /// Initial state, set at construction
    #[serde(rename = "Criada")]
    Created,
    #[serde(rename = "Aprovada")]
    Approved,
    #[serde(rename = "Processada")]
    Processed,
    #[serde(rename = "Cancelada")]
    Cancelled,
}

impl OperationStatus {
    pub const ALL: [OperationStatus; 4] = [
        OperationStatus::Created,
        OperationStatus::Approved,
        OperationStatus::Processed,
        OperationStatus::Cancelled,
    ];

    /// Display label used on the wire
    pub fn label(self) -> &'static str {
        match self {
            OperationStatus::Created => "Criada",
            OperationStatus::Approved => "Aprovada",
            OperationStatus::Processed => "Processada",
            OperationStatus::Cancelled => "Cancelada",
        }
    }

    /// Integer code stored in the `status` column. Must never be renumbered.
    pub fn code(self) -> i16 {
        match self {
            OperationStatus::Created => 0,
            OperationStatus::Approved => 1,
            OperationStatus::Processed => 2,
            OperationStatus::Cancelled => 3,
        }
    }
}

impl std::fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for OperationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Criada" => Ok(OperationStatus::Created),
            "Aprovada" => Ok(OperationStatus::Approved),
            "Processada" => Ok(OperationStatus::Processed),
            "Cancelada" => Ok(OperationStatus::Cancelled),
            _ => Err(format!("Unknown operation status: {}", s)),
        }
    }
}

impl TryFrom<i16> for OperationStatus {
    type Error = String;

    fn try_from(code: i16) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(OperationStatus::Created),
            1 => Ok(OperationStatus::Approved),
            2 => Ok(OperationStatus::Processed),
            3 => Ok(OperationStatus::Cancelled),
            _ => Err(format!("Unknown operation status code: {}", code)),
        }
    }
}

/// State changes an operation can be asked to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Approve,
    Process,
    Cancel,
}

impl std::fmt::Display for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Transition::Approve => write!(f, "approve"),
            Transition::Process => write!(f, "process"),
            Transition::Cancel => write!(f, "cancel"),
        }
    }
}

/// Errors raised by the operation entity itself
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OperationError {
    /// Rejected construction input
    #[error("invalid amount: {0}")]
    InvalidArgument(&'static str),

    /// Requested state change is not allowed from the current status
    #[error("cannot {action} an operation with status {from}")]
    InvalidTransition {
        from: OperationStatus,
        action: Transition,
    },
}

/// An operation moving through the approval lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    id: Uuid,
    amount: Decimal,
    status: OperationStatus,
    created_at: DateTime<Utc>,
    version: i32,
}

impl Operation {
    /// Create a new operation in status `Criada`.
    ///
    /// The amount is rounded to 2 decimal places and validated before any
    /// id or timestamp is assigned.
    pub fn new(amount: Decimal) -> Result<Self, OperationError> {
        let amount = normalize_amount(amount)?;

        Ok(Self {
            id: Uuid::new_v4(),
            amount,
            status: OperationStatus::Created,
            // Postgres keeps microseconds; truncating here keeps store round-trips exact
            created_at: Utc::now().trunc_subsecs(6),
            version: 1,
        })
    }

    /// Rebuild an operation from persisted state.
    pub fn restore(
        id: Uuid,
        amount: Decimal,
        status: OperationStatus,
        created_at: DateTime<Utc>,
        version: i32,
    ) -> Self {
        Self {
            id,
            amount,
            status,
            created_at,
            version,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn status(&self) -> OperationStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Version of the persisted row this instance was loaded from
    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn approve(&mut self) -> Result<(), OperationError> {
        match self.status {
            OperationStatus::Processed | OperationStatus::Cancelled => {
                Err(self.rejected(Transition::Approve))
            }
            OperationStatus::Created | OperationStatus::Approved => {
                self.status = OperationStatus::Approved;
                Ok(())
            }
        }
    }

    pub fn process(&mut self) -> Result<(), OperationError> {
        if self.status != OperationStatus::Approved {
            return Err(self.rejected(Transition::Process));
        }

        self.status = OperationStatus::Processed;
        Ok(())
    }

    /// Cancel the operation. Not reachable through the HTTP API.
    pub fn cancel(&mut self) -> Result<(), OperationError> {
        if self.status == OperationStatus::Processed {
            return Err(self.rejected(Transition::Cancel));
        }

        self.status = OperationStatus::Cancelled;
        Ok(())
    }

    fn rejected(&self, action: Transition) -> OperationError {
        OperationError::InvalidTransition {
            from: self.status,
            action,
        }
    }
}

/// Round to the stored scale (half away from zero, as Postgres `numeric` does)
/// and reject anything that is not positive afterwards or overflows the column.
fn normalize_amount(amount: Decimal) -> Result<Decimal, OperationError> {
    if amount <= Decimal::ZERO {
        return Err(OperationError::InvalidArgument(
            "amount must be greater than zero",
        ));
    }

    let rounded = amount.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        return Err(OperationError::InvalidArgument(
            "amount rounds to zero at 2 decimal places",
        ));
    }

    if rounded.trunc() >= Decimal::from(10_i64.pow(AMOUNT_INTEGER_DIGITS)) {
        return Err(OperationError::InvalidArgument(
            "amount exceeds the maximum supported value",
        ));
    }

    Ok(rounded)
}

/// Request body for `POST /operacoes`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOperationRequest {
    pub amount: Decimal,
}

/// Operation as returned by every use case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResponse {
    pub id: Uuid,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub status: String,
    pub created_at: String,
}

impl From<&Operation> for OperationResponse {
    fn from(operation: &Operation) -> Self {
        Self {
            id: operation.id(),
            amount: operation.amount(),
            status: operation.status().to_string(),
            created_at: operation
                .created_at()
                .to_rfc3339_opts(SecondsFormat::Micros, true),
        }
    }
}
