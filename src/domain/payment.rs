use super::amount::Amount;
use super::description::PaymentDescription;
use super::identifiers::{GatewayName, OrderId, SessionId};
use super::ports::GatewayConfigurator;
use crate::error::{PaymentError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use tracing::{info, warn};

/// Business data shared by every state of one payment.
///
/// Nothing here changes after the payment is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentDetails {
    gateway: GatewayName,
    order_id: OrderId,
    amount: Amount,
    client_ip: IpAddr,
}

impl PaymentDetails {
    pub fn gateway(&self) -> &GatewayName {
        &self.gateway
    }

    pub fn order_id(&self) -> &OrderId {
        &self.order_id
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn client_ip(&self) -> IpAddr {
        self.client_ip
    }
}

/// A payment that has not talked to the gateway yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentNew {
    details: PaymentDetails,
}

macro_rules! session_state {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            details: PaymentDetails,
            session_id: SessionId,
        }

        impl $name {
            pub fn details(&self) -> &PaymentDetails {
                &self.details
            }

            pub fn session_id(&self) -> &SessionId {
                &self.session_id
            }
        }
    };
}

session_state!(
    /// Gateway session opened; funds are being reserved.
    PaymentPrepared
);
session_state!(
    /// Funds are blocked on the payer's account.
    PaymentBlocked
);
session_state!(
    /// Blocked funds were captured.
    PaymentCharged
);
session_state!(
    /// The block was released without capture. Terminal.
    PaymentCancelled
);
session_state!(
    /// Captured funds were returned. Terminal.
    PaymentRefunded
);

fn declined(operation: &str, details: &PaymentDetails) -> PaymentError {
    warn!(
        order_id = %details.order_id,
        gateway = %details.gateway,
        operation,
        "gateway declined"
    );
    PaymentError::GatewayError(format!(
        "{operation} declined for order {}",
        details.order_id
    ))
}

impl PaymentNew {
    pub fn new(
        gateway: impl Into<GatewayName>,
        order_id: impl Into<OrderId>,
        amount: Amount,
        client_ip: IpAddr,
    ) -> Self {
        Self {
            details: PaymentDetails {
                gateway: gateway.into(),
                order_id: order_id.into(),
                amount,
                client_ip,
            },
        }
    }

    pub fn details(&self) -> &PaymentDetails {
        &self.details
    }

    /// Opens a gateway session for this payment.
    ///
    /// The init call uses a blocking session type, so the returned payment already
    /// has its funds reserved on the gateway side.
    pub async fn prepare(
        &self,
        configurator: &dyn GatewayConfigurator,
        description: Option<&PaymentDescription>,
    ) -> Result<PaymentPrepared> {
        let details = &self.details;
        let client = configurator.resolve(&details.gateway)?;
        let session_id = client
            .init(
                details.order_id.as_str(),
                details.amount.minor_units()?,
                details.client_ip,
                description,
            )
            .await?;

        if session_id.is_empty() {
            return Err(PaymentError::GatewayError(format!(
                "gateway returned an empty session id for order {}",
                details.order_id
            )));
        }

        info!(order_id = %details.order_id, session_id = %session_id, "payment prepared");
        Ok(PaymentPrepared {
            details: details.clone(),
            session_id,
        })
    }
}

impl PaymentPrepared {
    /// Relabels the payment as blocked. No gateway call is made.
    pub fn block(&self) -> Result<PaymentBlocked> {
        if self.session_id.is_empty() {
            return Err(PaymentError::InvalidState(format!(
                "prepared payment {} has no session id",
                self.details.order_id
            )));
        }

        Ok(PaymentBlocked {
            details: self.details.clone(),
            session_id: self.session_id.clone(),
        })
    }
}

impl PaymentBlocked {
    pub async fn charge(&self, configurator: &dyn GatewayConfigurator) -> Result<PaymentCharged> {
        let client = configurator.resolve(&self.details.gateway)?;
        if !client
            .charge(self.details.order_id.as_str(), &self.session_id)
            .await?
        {
            return Err(declined("charge", &self.details));
        }

        info!(order_id = %self.details.order_id, "payment charged");
        Ok(PaymentCharged {
            details: self.details.clone(),
            session_id: self.session_id.clone(),
        })
    }

    pub async fn unblock(
        &self,
        configurator: &dyn GatewayConfigurator,
    ) -> Result<PaymentCancelled> {
        let client = configurator.resolve(&self.details.gateway)?;
        if !client
            .unblock(
                self.details.order_id.as_str(),
                self.details.amount.minor_units()?,
            )
            .await?
        {
            return Err(declined("unblock", &self.details));
        }

        info!(order_id = %self.details.order_id, "payment unblocked");
        Ok(PaymentCancelled {
            details: self.details.clone(),
            session_id: self.session_id.clone(),
        })
    }
}

impl PaymentCharged {
    pub async fn refund(&self, configurator: &dyn GatewayConfigurator) -> Result<PaymentRefunded> {
        let client = configurator.resolve(&self.details.gateway)?;
        if !client
            .refund(
                self.details.order_id.as_str(),
                self.details.amount.minor_units()?,
            )
            .await?
        {
            return Err(declined("refund", &self.details));
        }

        info!(order_id = %self.details.order_id, "payment refunded");
        Ok(PaymentRefunded {
            details: self.details.clone(),
            session_id: self.session_id.clone(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    New,
    Prepared,
    Blocked,
    Charged,
    Cancelled,
    Refunded,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PaymentStatus::New => "new",
            PaymentStatus::Prepared => "prepared",
            PaymentStatus::Blocked => "blocked",
            PaymentStatus::Charged => "charged",
            PaymentStatus::Cancelled => "cancelled",
            PaymentStatus::Refunded => "refunded",
        };
        f.write_str(name)
    }
}

/// A payment in any state, as stored between requests.
///
/// Operations that are illegal from the current state fail with
/// [`PaymentError::InvalidState`]. Code that already knows the state should use
/// the per-state types directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Payment {
    New(PaymentNew),
    Prepared(PaymentPrepared),
    Blocked(PaymentBlocked),
    Charged(PaymentCharged),
    Cancelled(PaymentCancelled),
    Refunded(PaymentRefunded),
}

impl Payment {
    pub fn status(&self) -> PaymentStatus {
        match self {
            Payment::New(_) => PaymentStatus::New,
            Payment::Prepared(_) => PaymentStatus::Prepared,
            Payment::Blocked(_) => PaymentStatus::Blocked,
            Payment::Charged(_) => PaymentStatus::Charged,
            Payment::Cancelled(_) => PaymentStatus::Cancelled,
            Payment::Refunded(_) => PaymentStatus::Refunded,
        }
    }

    pub fn details(&self) -> &PaymentDetails {
        match self {
            Payment::New(p) => p.details(),
            Payment::Prepared(p) => p.details(),
            Payment::Blocked(p) => p.details(),
            Payment::Charged(p) => p.details(),
            Payment::Cancelled(p) => p.details(),
            Payment::Refunded(p) => p.details(),
        }
    }

    /// `None` only for new payments.
    pub fn session_id(&self) -> Option<&SessionId> {
        match self {
            Payment::New(_) => None,
            Payment::Prepared(p) => Some(p.session_id()),
            Payment::Blocked(p) => Some(p.session_id()),
            Payment::Charged(p) => Some(p.session_id()),
            Payment::Cancelled(p) => Some(p.session_id()),
            Payment::Refunded(p) => Some(p.session_id()),
        }
    }

    pub async fn prepare(
        &self,
        configurator: &dyn GatewayConfigurator,
        description: Option<&PaymentDescription>,
    ) -> Result<Payment> {
        match self {
            Payment::New(p) => Ok(p.prepare(configurator, description).await?.into()),
            _ => Err(self.invalid_transition("prepare")),
        }
    }

    pub fn block(&self) -> Result<Payment> {
        match self {
            Payment::Prepared(p) => Ok(p.block()?.into()),
            _ => Err(self.invalid_transition("block")),
        }
    }

    pub async fn charge(&self, configurator: &dyn GatewayConfigurator) -> Result<Payment> {
        match self {
            Payment::Blocked(p) => Ok(p.charge(configurator).await?.into()),
            _ => Err(self.invalid_transition("charge")),
        }
    }

    pub async fn unblock(&self, configurator: &dyn GatewayConfigurator) -> Result<Payment> {
        match self {
            Payment::Blocked(p) => Ok(p.unblock(configurator).await?.into()),
            _ => Err(self.invalid_transition("unblock")),
        }
    }

    pub async fn refund(&self, configurator: &dyn GatewayConfigurator) -> Result<Payment> {
        match self {
            Payment::Charged(p) => Ok(p.refund(configurator).await?.into()),
            _ => Err(self.invalid_transition("refund")),
        }
    }

    fn invalid_transition(&self, operation: &str) -> PaymentError {
        PaymentError::InvalidState(format!(
            "cannot {operation} payment {} in state {}",
            self.details().order_id(),
            self.status()
        ))
    }
}

impl From<PaymentNew> for Payment {
    fn from(payment: PaymentNew) -> Self {
        Payment::New(payment)
    }
}

impl From<PaymentPrepared> for Payment {
    fn from(payment: PaymentPrepared) -> Self {
        Payment::Prepared(payment)
    }
}

impl From<PaymentBlocked> for Payment {
    fn from(payment: PaymentBlocked) -> Self {
        Payment::Blocked(payment)
    }
}

impl From<PaymentCharged> for Payment {
    fn from(payment: PaymentCharged) -> Self {
        Payment::Charged(payment)
    }
}

impl From<PaymentCancelled> for Payment {
    fn from(payment: PaymentCancelled) -> Self {
        Payment::Cancelled(payment)
    }
}

impl From<PaymentRefunded> for Payment {
    fn from(payment: PaymentRefunded) -> Self {
        Payment::Refunded(payment)
    }
}
