//! Value-proportional partition of the full circle.

use crate::chart::tween::ArcAngles;
use crate::model::expense::{Expense, ExpenseId};
use std::f64::consts::TAU;

/// Target wedge for one expense.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wedge {
    pub id: ExpenseId,
    pub angles: ArcAngles,
}

/// Lays out one wedge per expense in input order, clockwise from 0.
///
/// Non-positive costs get zero width and do not count toward the total.
/// When nothing has positive cost every wedge collapses at angle 0.
pub fn layout(records: &[Expense]) -> Vec<Wedge> {
    let total: f64 = records
        .iter()
        .map(|record| positive_value(record.cost))
        .sum();
    let scale = if total > 0.0 { TAU / total } else { 0.0 };

    let mut cursor = 0.0;
    records
        .iter()
        .map(|record| {
            let start = cursor;
            cursor += positive_value(record.cost) * scale;
            Wedge {
                id: record.id,
                angles: ArcAngles::new(start, cursor),
            }
        })
        .collect()
}

fn positive_value(cost: i64) -> f64 {
    if cost > 0 {
        cost as f64
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::layout;
    use crate::model::expense::Expense;
    use std::f64::consts::{PI, TAU};
    use uuid::Uuid;

    fn expense(n: u128, cost: i64) -> Expense {
        Expense::new(Uuid::from_u128(n), format!("item-{n}"), cost)
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn single_record_takes_the_full_circle() {
        let wedges = layout(&[expense(1, 20)]);
        assert_eq!(wedges.len(), 1);
        assert!(close(wedges[0].angles.start, 0.0));
        assert!(close(wedges[0].angles.end, TAU));
    }

    #[test]
    fn wedges_follow_input_order_not_value_order() {
        let wedges = layout(&[expense(1, 20), expense(2, 80)]);
        assert_eq!(wedges[0].id, Uuid::from_u128(1));
        assert!(close(wedges[0].angles.end, TAU * 0.2));
        assert!(close(wedges[1].angles.start, TAU * 0.2));
        assert!(close(wedges[1].angles.end, TAU));
    }

    #[test]
    fn non_positive_costs_get_zero_width() {
        let wedges = layout(&[expense(1, 10), expense(2, -4), expense(3, 0), expense(4, 10)]);
        assert!(close(wedges[1].angles.width(), 0.0));
        assert!(close(wedges[2].angles.width(), 0.0));
        assert!(close(wedges[1].angles.start, PI));
        assert!(close(wedges[3].angles.end, TAU));
    }

    #[test]
    fn all_zero_total_collapses_every_wedge() {
        let wedges = layout(&[expense(1, 0), expense(2, 0)]);
        assert!(wedges
            .iter()
            .all(|wedge| close(wedge.angles.start, 0.0) && close(wedge.angles.end, 0.0)));
    }

    #[test]
    fn empty_input_yields_no_wedges() {
        assert!(layout(&[]).is_empty());
    }
}
