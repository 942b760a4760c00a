//! Common enums used across the platform

use serde::{Deserialize, Serialize};

/// How a sale or expense was paid
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    Transfer,
    Credit,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Transfer => "transfer",
            PaymentMethod::Credit => "credit",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "cash" => Some(PaymentMethod::Cash),
            "card" => Some(PaymentMethod::Card),
            "transfer" => Some(PaymentMethod::Transfer),
            "credit" => Some(PaymentMethod::Credit),
            _ => None,
        }
    }
}

/// Sale lifecycle status
///
/// Cancelled is terminal; there is no transition back out of it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    Pending,
    #[default]
    Completed,
    Cancelled,
}

impl SaleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaleStatus::Pending => "pending",
            SaleStatus::Completed => "completed",
            SaleStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(SaleStatus::Pending),
            "completed" => Some(SaleStatus::Completed),
            "cancelled" => Some(SaleStatus::Cancelled),
            _ => None,
        }
    }
}

/// Quote lifecycle status
///
/// Expired is reachable only through a time-based policy outside the
/// transition actions; no action produces it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    #[default]
    Draft,
    Sent,
    Accepted,
    Rejected,
    Expired,
}

impl QuoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Draft => "draft",
            QuoteStatus::Sent => "sent",
            QuoteStatus::Accepted => "accepted",
            QuoteStatus::Rejected => "rejected",
            QuoteStatus::Expired => "expired",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(QuoteStatus::Draft),
            "sent" => Some(QuoteStatus::Sent),
            "accepted" => Some(QuoteStatus::Accepted),
            "rejected" => Some(QuoteStatus::Rejected),
            "expired" => Some(QuoteStatus::Expired),
            _ => None,
        }
    }

    /// Whether a status change to `next` is a legal transition.
    ///
    /// Draft/Sent may be (re)sent; only Sent quotes may be accepted or
    /// rejected. Everything else is refused.
    pub fn can_transition_to(&self, next: QuoteStatus) -> bool {
        match next {
            QuoteStatus::Sent => matches!(self, QuoteStatus::Draft | QuoteStatus::Sent),
            QuoteStatus::Accepted | QuoteStatus::Rejected => matches!(self, QuoteStatus::Sent),
            QuoteStatus::Draft | QuoteStatus::Expired => false,
        }
    }
}

/// Action requested on a quote
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QuoteAction {
    Send,
    Accept,
    Reject,
}

impl QuoteAction {
    pub fn target_status(&self) -> QuoteStatus {
        match self {
            QuoteAction::Send => QuoteStatus::Sent,
            QuoteAction::Accept => QuoteStatus::Accepted,
            QuoteAction::Reject => QuoteStatus::Rejected,
        }
    }
}

/// Receipt type issued for a completed sale
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceType {
    #[default]
    Boleta,
    Factura,
    NotaVenta,
}

impl InvoiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceType::Boleta => "boleta",
            InvoiceType::Factura => "factura",
            InvoiceType::NotaVenta => "nota_venta",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "boleta" => Some(InvoiceType::Boleta),
            "factura" => Some(InvoiceType::Factura),
            "nota_venta" => Some(InvoiceType::NotaVenta),
            _ => None,
        }
    }

    /// Fixed series code printed on the document.
    pub fn series(&self) -> &'static str {
        match self {
            InvoiceType::Boleta => "B001",
            InvoiceType::Factura => "F001",
            InvoiceType::NotaVenta => "NV01",
        }
    }
}

/// Kind of inventory movement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    In,
    Out,
    Adjustment,
}

impl MovementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementKind::In => "in",
            MovementKind::Out => "out",
            MovementKind::Adjustment => "adjustment",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "in" => Some(MovementKind::In),
            "out" => Some(MovementKind::Out),
            "adjustment" => Some(MovementKind::Adjustment),
            _ => None,
        }
    }

    /// Quantity after applying a movement of this kind.
    ///
    /// In and Out are relative deltas; Adjustment sets the quantity
    /// outright.
    pub fn apply(&self, previous: i32, quantity: i32) -> i32 {
        match self {
            MovementKind::In => previous + quantity,
            MovementKind::Out => previous - quantity,
            MovementKind::Adjustment => quantity,
        }
    }
}

/// Read-side stock classification, never persisted
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    OutOfStock,
    LowStock,
    InStock,
}

/// Identity document types for clients
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    #[default]
    Dni,
    Ruc,
    Ce,
    Passport,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Dni => "dni",
            DocumentType::Ruc => "ruc",
            DocumentType::Ce => "ce",
            DocumentType::Passport => "passport",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "dni" => Some(DocumentType::Dni),
            "ruc" => Some(DocumentType::Ruc),
            "ce" => Some(DocumentType::Ce),
            "passport" => Some(DocumentType::Passport),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_transitions_follow_lifecycle() {
        assert!(QuoteStatus::Draft.can_transition_to(QuoteStatus::Sent));
        assert!(QuoteStatus::Sent.can_transition_to(QuoteStatus::Sent));
        assert!(QuoteStatus::Sent.can_transition_to(QuoteStatus::Accepted));
        assert!(QuoteStatus::Sent.can_transition_to(QuoteStatus::Rejected));

        assert!(!QuoteStatus::Draft.can_transition_to(QuoteStatus::Accepted));
        assert!(!QuoteStatus::Accepted.can_transition_to(QuoteStatus::Sent));
        assert!(!QuoteStatus::Rejected.can_transition_to(QuoteStatus::Accepted));
        assert!(!QuoteStatus::Expired.can_transition_to(QuoteStatus::Sent));
        assert!(!QuoteStatus::Sent.can_transition_to(QuoteStatus::Draft));
    }

    #[test]
    fn movement_kinds_apply_arithmetic() {
        assert_eq!(MovementKind::In.apply(20, 5), 25);
        assert_eq!(MovementKind::Out.apply(20, 5), 15);
        assert_eq!(MovementKind::Adjustment.apply(20, 5), 5);
        // Oversell is representable; policy lives in the service layer
        assert_eq!(MovementKind::Out.apply(2, 5), -3);
    }

    #[test]
    fn invoice_series_are_fixed_per_type() {
        assert_eq!(InvoiceType::Boleta.series(), "B001");
        assert_eq!(InvoiceType::Factura.series(), "F001");
        assert_eq!(InvoiceType::NotaVenta.series(), "NV01");
    }
}
