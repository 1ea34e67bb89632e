//! Cart arithmetic.
//!
//! A [`Cart`] is an immutable value: every mutation consumes the cart and
//! returns the next one, so a single owner can hold the current state and
//! swap it atomically.

use std::collections::HashMap;

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Product;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CartLine {
    pub product: Product,
    pub quantity: i32,
}

impl CartLine {
    pub fn subtotal(&self) -> i64 {
        self.product.price * i64::from(self.quantity)
    }
}

/// Order line not yet persisted; the unit price is frozen at conversion time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLineDraft {
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: i64,
}

impl OrderLineDraft {
    pub fn subtotal(&self) -> i64 {
        self.unit_price * i64::from(self.quantity)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// One more unit of `product`; a new line starts at quantity 1.
    #[must_use]
    pub fn add_item(mut self, product: &Product) -> Self {
        match self.lines.iter_mut().find(|l| l.product.id == product.id) {
            Some(line) => line.quantity += 1,
            None => self.lines.push(CartLine {
                product: product.clone(),
                quantity: 1,
            }),
        }
        self
    }

    /// One fewer unit of the product; the line disappears at zero. Absent
    /// products leave the cart untouched.
    #[must_use]
    pub fn remove_item(mut self, product_id: Uuid) -> Self {
        if let Some(pos) = self.lines.iter().position(|l| l.product.id == product_id) {
            if self.lines[pos].quantity > 1 {
                self.lines[pos].quantity -= 1;
            } else {
                self.lines.remove(pos);
            }
        }
        self
    }

    pub fn total(&self) -> i64 {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Units across all lines, shown on the cart badge.
    pub fn item_count(&self) -> i32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn product_ids(&self) -> Vec<Uuid> {
        self.lines.iter().map(|l| l.product.id).collect()
    }

    /// Replaces each line's product with the current catalog copy.
    ///
    /// Returns the id of the first product missing from `catalog`.
    pub fn refreshed(self, catalog: &HashMap<Uuid, Product>) -> Result<Self, Uuid> {
        let lines = self
            .lines
            .into_iter()
            .map(|line| match catalog.get(&line.product.id) {
                Some(current) => Ok(CartLine {
                    product: current.clone(),
                    quantity: line.quantity,
                }),
                None => Err(line.product.id),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { lines })
    }

    pub fn to_order_lines(&self) -> Vec<OrderLineDraft> {
        self.lines
            .iter()
            .map(|l| OrderLineDraft {
                product_id: l.product.id,
                quantity: l.quantity,
                unit_price: l.product.price,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::product;

    #[test]
    fn empty_cart_totals_zero() {
        let cart = Cart::new();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), 0);
        assert_eq!(cart.item_count(), 0);
        assert!(cart.to_order_lines().is_empty());
    }

    #[test]
    fn adding_same_product_bumps_quantity() {
        let sushi = product("Sushi Sakura", "Sushi", 8990);
        let cart = Cart::new().add_item(&sushi).add_item(&sushi);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
    }

    #[test]
    fn adding_raises_total_by_unit_price() {
        let sushi = product("Sushi Sakura", "Sushi", 8990);
        let ramen = product("Ramen Tonkotsu", "Ramen", 11500);
        let cart = Cart::new().add_item(&sushi);
        let before = cart.total();
        let cart = cart.add_item(&ramen);
        assert_eq!(cart.total(), before + ramen.price);
    }

    #[test]
    fn two_line_cart_totals_and_counts() {
        let a = product("Sushi Sakura", "Sushi", 8990);
        let b = product("Ramen Tonkotsu", "Ramen", 11500);
        let cart = Cart::new().add_item(&a).add_item(&a).add_item(&b);

        assert_eq!(cart.total(), 29480);
        assert_eq!(cart.item_count(), 3);
        let expected: i64 = cart.lines().iter().map(|l| l.product.price * l.quantity as i64).sum();
        assert_eq!(cart.total(), expected);
    }

    #[test]
    fn add_then_remove_round_trips_to_empty() {
        let gyoza = product("Gyoza", "Entradas", 5500);
        let cart = Cart::new().add_item(&gyoza).remove_item(gyoza.id);
        assert_eq!(cart, Cart::new());
    }

    #[test]
    fn remove_decrements_before_dropping_line() {
        let gyoza = product("Gyoza", "Entradas", 5500);
        let cart = Cart::new().add_item(&gyoza).add_item(&gyoza).remove_item(gyoza.id);
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn removing_absent_product_is_noop() {
        let gyoza = product("Gyoza", "Entradas", 5500);
        let cart = Cart::new().add_item(&gyoza);
        let same = cart.clone().remove_item(Uuid::new_v4());
        assert_eq!(cart, same);
    }

    #[test]
    fn order_lines_capture_unit_price() {
        let a = product("Sushi Sakura", "Sushi", 8990);
        let b = product("Ramen Tonkotsu", "Ramen", 11500);
        let cart = Cart::new().add_item(&a).add_item(&a).add_item(&b);

        let drafts = cart.to_order_lines();
        assert_eq!(
            drafts,
            vec![
                OrderLineDraft { product_id: a.id, quantity: 2, unit_price: 8990 },
                OrderLineDraft { product_id: b.id, quantity: 1, unit_price: 11500 },
            ]
        );
        assert_eq!(drafts.iter().map(OrderLineDraft::subtotal).sum::<i64>(), cart.total());
    }

    #[test]
    fn refresh_picks_up_new_prices_and_reports_missing() {
        let mut a = product("Sushi Sakura", "Sushi", 8990);
        let cart = Cart::new().add_item(&a);

        a.price = 9990;
        let catalog = HashMap::from([(a.id, a.clone())]);
        let refreshed = cart.clone().refreshed(&catalog).unwrap();
        assert_eq!(refreshed.total(), 9990);

        assert_eq!(cart.refreshed(&HashMap::new()), Err(a.id));
    }
}
