// src/models/stock.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// --- Tipo de movimentação ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")] // Banco
#[serde(rename_all = "lowercase")] // JSON
pub enum MovementType {
    In,         // Vira "in"
    Out,        // Vira "out"
    Adjustment, // Vira "adjustment"
}

impl MovementType {
    /// Quanto a movimentação soma ao saldo. Ajustes já vêm com sinal.
    pub fn signed_quantity(self, quantity: i32) -> i32 {
        match self {
            MovementType::In => quantity,
            MovementType::Out => -quantity,
            MovementType::Adjustment => quantity,
        }
    }
}

// --- STOCK MOVEMENT (Histórico, somente inserção) ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct StockMovement {
    pub id: Uuid,
    pub product_id: Uuid,
    pub movement_type: MovementType,
    pub quantity: i32,
    pub movement_date: DateTime<Utc>,
    pub responsible_id: Uuid,
    pub reason: Option<String>,
    pub batch: Option<String>,
    pub expiry_date: Option<NaiveDate>,
}

impl StockMovement {
    pub fn signed_quantity(&self) -> i32 {
        self.movement_type.signed_quantity(self.quantity)
    }
}

/// Saldo segundo o livro-razão: soma das quantidades com sinal.
pub fn ledger_balance<'a, I>(movements: I) -> i64
where
    I: IntoIterator<Item = &'a StockMovement>,
{
    movements
        .into_iter()
        .fold(0i64, |acc, m| acc + i64::from(m.signed_quantity()))
}

// --- Projeção com nomes resolvidos (LEFT JOIN) ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct StockMovementView {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: Option<String>,
    pub movement_type: MovementType,
    pub quantity: i32,
    pub movement_date: DateTime<Utc>,
    pub responsible_id: Uuid,
    pub responsible_name: Option<String>,
    pub reason: Option<String>,
    pub batch: Option<String>,
    pub expiry_date: Option<NaiveDate>,
}

// Comparação entre o contador do produto e o livro-razão. Apenas informativo.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockReconciliation {
    pub product_id: Uuid,
    pub current_stock: i32,
    pub ledger_balance: i64,
}

impl StockReconciliation {
    pub fn difference(&self) -> i64 {
        i64::from(self.current_stock) - self.ledger_balance
    }

    pub fn is_consistent(&self) -> bool {
        self.difference() == 0
    }
}

// ---
// Payload
// ---
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StockMovementPayload {
    pub product_id: Uuid,
    pub movement_type: MovementType,
    pub quantity: i32,
    pub responsible_id: Uuid,
    pub reason: Option<String>,
    #[validate(length(max = 50, message = "O lote deve ter no máximo 50 caracteres."))]
    pub batch: Option<String>,
    pub expiry_date: Option<NaiveDate>,
}

impl StockMovementPayload {
    // Entradas e saídas usam quantidade positiva; o tipo define o sinal.
    pub fn validate_consistency(&self) -> Result<(), ValidationError> {
        match self.movement_type {
            MovementType::In | MovementType::Out if self.quantity <= 0 => {
                let mut err = ValidationError::new("range");
                err.message = Some("A quantidade deve ser maior que zero.".into());
                Err(err)
            }
            MovementType::Adjustment if self.quantity == 0 => {
                let mut err = ValidationError::new("range");
                err.message = Some("Um ajuste precisa alterar o saldo.".into());
                Err(err)
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movement(movement_type: MovementType, quantity: i32) -> StockMovement {
        StockMovement {
            id: Uuid::new_v4(),
            product_id: Uuid::nil(),
            movement_type,
            quantity,
            movement_date: Utc::now(),
            responsible_id: Uuid::nil(),
            reason: None,
            batch: None,
            expiry_date: None,
        }
    }

    fn payload(movement_type: MovementType, quantity: i32) -> StockMovementPayload {
        StockMovementPayload {
            product_id: Uuid::nil(),
            movement_type,
            quantity,
            responsible_id: Uuid::nil(),
            reason: None,
            batch: None,
            expiry_date: None,
        }
    }

    #[test]
    fn out_subtracts_and_adjustment_keeps_its_sign() {
        assert_eq!(MovementType::In.signed_quantity(10), 10);
        assert_eq!(MovementType::Out.signed_quantity(3), -3);
        assert_eq!(MovementType::Adjustment.signed_quantity(-2), -2);
    }

    #[test]
    fn ledger_balance_folds_signed_quantities() {
        let movements = vec![
            movement(MovementType::In, 50),
            movement(MovementType::Out, 8),
            movement(MovementType::Adjustment, -2),
            movement(MovementType::In, 10),
        ];
        assert_eq!(ledger_balance(&movements), 50);
        assert_eq!(ledger_balance(Vec::<StockMovement>::new().iter()), 0);
    }

    #[test]
    fn reconciliation_reports_the_gap() {
        let rec = StockReconciliation { product_id: Uuid::nil(), current_stock: 15, ledger_balance: 10 };
        assert_eq!(rec.difference(), 5);
        assert!(!rec.is_consistent());
    }

    #[test]
    fn consistency_rules_per_movement_type() {
        assert!(payload(MovementType::In, 1).validate_consistency().is_ok());
        assert!(payload(MovementType::In, 0).validate_consistency().is_err());
        assert!(payload(MovementType::Out, -4).validate_consistency().is_err());
        assert!(payload(MovementType::Adjustment, -4).validate_consistency().is_ok());
        assert!(payload(MovementType::Adjustment, 0).validate_consistency().is_err());
    }

    #[test]
    fn movement_type_serializes_lowercase() {
        let json = serde_json::to_string(&MovementType::Adjustment).unwrap();
        assert_eq!(json, "\"adjustment\"");
    }
}
