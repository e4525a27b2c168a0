//! Largest-expense selection.

use std::cmp::Ordering;

use gasto_domain::Amounted;

use crate::statistics::sanitize_amount;

/// Number of entries in the dashboard's "top expenses" list.
pub const TOP_EXPENSES: usize = 5;

/// Returns clones of the `n` largest items, ordered by descending amount.
///
/// The sort is stable, so equal amounts keep their input order. The input
/// slice is left untouched.
pub fn compute_top_n<T: Amounted + Clone>(items: &[T], n: usize) -> Vec<T> {
    let mut ranked: Vec<&T> = items.iter().collect();
    ranked.sort_by(|a, b| descending(a.amount(), b.amount()));
    ranked.into_iter().take(n).cloned().collect()
}

fn descending(a: f64, b: f64) -> Ordering {
    sanitize_amount(b).total_cmp(&sanitize_amount(a))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Entry(&'static str, f64);

    impl Amounted for Entry {
        fn amount(&self) -> f64 {
            self.1
        }
    }

    fn amounts(entries: &[Entry]) -> Vec<f64> {
        entries.iter().map(|entry| entry.1).collect()
    }

    #[test]
    fn picks_largest_in_descending_order() {
        let items: Vec<_> = [5.0, 100.0, 1.0, 50.0, 7.0, 200.0]
            .into_iter()
            .map(|amount| Entry("x", amount))
            .collect();
        assert_eq!(amounts(&compute_top_n(&items, 3)), vec![200.0, 100.0, 50.0]);
        assert_eq!(
            amounts(&compute_top_n(&items, 10)),
            vec![200.0, 100.0, 50.0, 7.0, 5.0, 1.0]
        );
    }

    #[test]
    fn ties_keep_input_order() {
        let items = vec![Entry("a", 10.0), Entry("b", 20.0), Entry("c", 10.0)];
        let top = compute_top_n(&items, 3);
        let names: Vec<_> = top.iter().map(|entry| entry.0).collect();
        assert_eq!(names, ["b", "a", "c"]);
    }

    #[test]
    fn input_is_not_reordered() {
        let items = vec![Entry("a", 1.0), Entry("b", 2.0)];
        let before = items.clone();
        let _ = compute_top_n(&items, 1);
        assert_eq!(items, before);
    }

    #[test]
    fn zero_and_empty() {
        let items = vec![Entry("a", 1.0)];
        assert!(compute_top_n(&items, 0).is_empty());
        assert!(compute_top_n::<Entry>(&[], 5).is_empty());
    }
}
