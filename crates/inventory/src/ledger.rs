//! Ledger steps: one applied stock change and its exact inverse.

use serde::{Deserialize, Serialize};

use stockline_core::{BranchId, ProductId, Quantity};

/// A stock change that has been applied to exactly one product document.
///
/// Multi-item operations record one of these per successful step so a later
/// failure can replay the inverses in reverse order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum StockMutation {
    Decrement {
        branch_id: BranchId,
        product_id: ProductId,
        qty: Quantity,
    },
    Increment {
        branch_id: BranchId,
        product_id: ProductId,
        qty: Quantity,
    },
}

impl StockMutation {
    pub fn decrement(branch_id: BranchId, product_id: ProductId, qty: Quantity) -> Self {
        Self::Decrement {
            branch_id,
            product_id,
            qty,
        }
    }

    pub fn increment(branch_id: BranchId, product_id: ProductId, qty: Quantity) -> Self {
        Self::Increment {
            branch_id,
            product_id,
            qty,
        }
    }

    /// The step that undoes this one.
    pub fn inverse(&self) -> Self {
        match *self {
            StockMutation::Decrement {
                branch_id,
                product_id,
                qty,
            } => StockMutation::increment(branch_id, product_id, qty),
            StockMutation::Increment {
                branch_id,
                product_id,
                qty,
            } => StockMutation::decrement(branch_id, product_id, qty),
        }
    }

    pub fn branch_id(&self) -> BranchId {
        match self {
            StockMutation::Decrement { branch_id, .. } | StockMutation::Increment { branch_id, .. } => {
                *branch_id
            }
        }
    }

    pub fn product_id(&self) -> ProductId {
        match self {
            StockMutation::Decrement { product_id, .. }
            | StockMutation::Increment { product_id, .. } => *product_id,
        }
    }

    pub fn qty(&self) -> Quantity {
        match self {
            StockMutation::Decrement { qty, .. } | StockMutation::Increment { qty, .. } => *qty,
        }
    }

    /// Signed effect on the product's stock.
    pub fn delta(&self) -> i128 {
        match self {
            StockMutation::Decrement { qty, .. } => -(qty.get() as i128),
            StockMutation::Increment { qty, .. } => qty.get() as i128,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverse_flips_direction_only() {
        let m = StockMutation::decrement(BranchId::new(), ProductId::new(), Quantity::new(4).unwrap());
        let inv = m.inverse();

        assert!(matches!(inv, StockMutation::Increment { .. }));
        assert_eq!(inv.branch_id(), m.branch_id());
        assert_eq!(inv.product_id(), m.product_id());
        assert_eq!(inv.qty(), m.qty());
        assert_eq!(inv.inverse(), m);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: a step and its inverse cancel out.
            #[test]
            fn step_plus_inverse_is_zero(qty in 1i64..1_000_000, up in any::<bool>()) {
                let q = Quantity::new(qty).unwrap();
                let (b, p) = (BranchId::new(), ProductId::new());
                let m = if up { StockMutation::increment(b, p, q) } else { StockMutation::decrement(b, p, q) };
                prop_assert_eq!(m.delta() + m.inverse().delta(), 0);
            }
        }
    }
}
