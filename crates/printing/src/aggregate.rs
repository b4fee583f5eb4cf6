//! Per-style aggregation shared by both layouts.
//!
//! Rows are keyed by (model reference, color). Boxes and models are visited
//! in input order and a row appears where its key is first seen, so totals
//! do not depend on input order but row order does.

use std::collections::HashMap;

use crate::normalize::BoxLine;

/// Aggregated quantities for one (reference, color) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRow<'a> {
    pub style: &'a str,
    /// Description of the first model seen with this key.
    pub description: &'a str,
    pub color: &'a str,
    /// `(display size label, summed quantity)` in first-seen order.
    pub sizes: Vec<(&'a str, u64)>,
    pub total: u64,
}

impl StyleRow<'_> {
    pub fn sizes_text(&self) -> String {
        self.sizes
            .iter()
            .map(|(label, qty)| format!("{label}:{qty}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Style rows plus their grand total.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleSummary<'a> {
    pub rows: Vec<StyleRow<'a>>,
    pub total: u64,
}

impl<'a> StyleSummary<'a> {
    /// Aggregate the models of every box in `boxes`.
    pub fn from_boxes<'b, I>(boxes: I) -> Self
    where
        'a: 'b,
        I: IntoIterator<Item = &'b BoxLine<'a>>,
    {
        let mut rows: Vec<StyleRow<'a>> = Vec::new();
        let mut index: HashMap<(&'a str, &'a str), usize> = HashMap::new();

        for b in boxes {
            for model in &b.models {
                let slot = *index.entry((model.reference, model.color)).or_insert_with(|| {
                    rows.push(StyleRow {
                        style: model.reference,
                        description: model.description,
                        color: model.color,
                        sizes: Vec::new(),
                        total: 0,
                    });
                    rows.len() - 1
                });

                let row = &mut rows[slot];
                for &(label, qty) in &model.sizes {
                    match row.sizes.iter_mut().find(|(l, _)| *l == label) {
                        Some((_, summed)) => *summed += qty,
                        None => row.sizes.push((label, qty)),
                    }
                    row.total += qty;
                }
            }
        }

        let total = rows.iter().map(|r| r.total).sum();
        StyleSummary { rows, total }
    }

    /// Aggregate a single box.
    pub fn for_box(b: &BoxLine<'a>) -> Self {
        Self::from_boxes(std::iter::once(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::ModelLine;
    use lomartex_packing::Dimensions;
    use proptest::prelude::*;

    fn model<'a>(reference: &'a str, color: &'a str, sizes: Vec<(&'a str, u64)>) -> ModelLine<'a> {
        ModelLine {
            reference,
            description: "desc",
            color,
            sizes,
        }
    }

    fn boxed(models: Vec<ModelLine<'_>>) -> BoxLine<'_> {
        BoxLine {
            number: 1,
            gross_weight: 0.0,
            dimensions: Dimensions::default(),
            tracking: None,
            models,
        }
    }

    #[test]
    fn same_reference_and_color_merge_across_boxes() {
        let boxes = vec![
            boxed(vec![model("R1", "Navy", vec![("M", 5), ("L", 1)])]),
            boxed(vec![
                model("R2", "Red", vec![("S", 2)]),
                model("R1", "Navy", vec![("M", 3), ("XL", 4)]),
            ]),
        ];
        let summary = StyleSummary::from_boxes(&boxes);
        assert_eq!(summary.rows.len(), 2);
        assert_eq!(summary.rows[0].style, "R1");
        assert_eq!(summary.rows[0].sizes, vec![("M", 8), ("L", 1), ("XL", 4)]);
        assert_eq!(summary.rows[0].total, 13);
        assert_eq!(summary.rows[0].sizes_text(), "M:8 L:1 XL:4");
        assert_eq!(summary.rows[1].style, "R2");
        assert_eq!(summary.total, 15);
    }

    #[test]
    fn different_colors_are_different_rows() {
        let boxes = vec![boxed(vec![
            model("R1", "Navy", vec![("M", 1)]),
            model("R1", "White", vec![("M", 1)]),
        ])];
        let summary = StyleSummary::from_boxes(&boxes);
        let colors: Vec<_> = summary.rows.iter().map(|r| r.color).collect();
        assert_eq!(colors, vec!["Navy", "White"]);
    }

    #[test]
    fn model_without_sizes_still_gets_a_zero_row() {
        let b = boxed(vec![model("R1", "Navy", vec![])]);
        let summary = StyleSummary::for_box(&b);
        assert_eq!(summary.rows.len(), 1);
        assert_eq!(summary.rows[0].total, 0);
        assert_eq!(summary.rows[0].sizes_text(), "");
    }

    const REFS: [&str; 3] = ["R1", "R2", "R3"];
    const COLORS: [&str; 2] = ["Navy", "Red"];
    const SIZES: [&str; 4] = ["S", "M", "L", "XL"];

    fn arb_boxes() -> impl Strategy<Value = Vec<Vec<(usize, usize, Vec<(usize, u64)>)>>> {
        let model = (0..REFS.len(), 0..COLORS.len(), prop::collection::vec((0..SIZES.len(), 1u64..50), 0..4));
        prop::collection::vec(prop::collection::vec(model, 1..4), 1..6)
    }

    fn build(shape: &[Vec<(usize, usize, Vec<(usize, u64)>)>]) -> Vec<BoxLine<'static>> {
        shape.iter()
            .map(|models| {
                boxed(
                    models
                        .iter()
                        .map(|(r, c, sizes)| {
                            let mut seen: Vec<(&'static str, u64)> = Vec::new();
                            for (s, q) in sizes {
                                if !seen.iter().any(|(l, _)| *l == SIZES[*s]) {
                                    seen.push((SIZES[*s], *q));
                                }
                            }
                            model(REFS[*r], COLORS[*c], seen)
                        })
                        .collect(),
                )
            })
            .collect()
    }

    proptest! {
        #[test]
        fn style_totals_are_order_independent(shape in arb_boxes()) {
            let forward = build(&shape);
            let mut reversed = forward.clone();
            reversed.reverse();

            let a = StyleSummary::from_boxes(&forward);
            let b = StyleSummary::from_boxes(&reversed);

            prop_assert_eq!(a.total, b.total);
            for row in &a.rows {
                let other = b.rows.iter().find(|r| r.style == row.style && r.color == row.color);
                prop_assert!(other.is_some());
                prop_assert_eq!(other.map(|r| r.total), Some(row.total));
            }
        }

        #[test]
        fn style_total_equals_sum_of_matching_quantities(shape in arb_boxes()) {
            let boxes = build(&shape);
            let summary = StyleSummary::from_boxes(&boxes);
            for row in &summary.rows {
                let expected: u64 = boxes
                    .iter()
                    .flat_map(|b| b.models.iter())
                    .filter(|m| m.reference == row.style && m.color == row.color)
                    .map(|m| m.total())
                    .sum();
                prop_assert_eq!(row.total, expected);
                prop_assert_eq!(row.sizes.iter().map(|(_, q)| q).sum::<u64>(), row.total);
            }
            prop_assert_eq!(summary.total, boxes.iter().map(|b| b.total()).sum::<u64>());
        }
    }
}
